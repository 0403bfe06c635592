//! Inline `**bold**` / `*italic*` run parsing.
//!
//! Two passes: every bold span is substituted out first, then italic spans
//! are matched against whatever remains. Markers inside an already extracted
//! bold span are never re-parsed, so bold and italic cannot nest or overlap.
//! That non-nesting behavior is a compatibility contract, not an accident.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// One contiguous span of text sharing a single formatting state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextRun {
    fn plain(text: String) -> Self {
        Self {
            text,
            bold: false,
            italic: false,
        }
    }
}

const BOLD_MARK: char = '\u{1}';
const ITALIC_MARK: char = '\u{2}';

fn bold_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold pattern"))
}

fn italic_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Excludes the sentinel characters so an italic span can never swallow a
    // bold token produced by the first pass.
    RE.get_or_init(|| Regex::new(r"\*([^*\x01\x02]+?)\*").expect("valid italic pattern"))
}

/// Parse a block's text into formatted runs. Text without any markers passes
/// through as a single unformatted run; unmatched asterisks stay literal.
pub fn parse_inline_runs(text: &str) -> Vec<TextRun> {
    let mut bold_spans: Vec<String> = Vec::new();
    let pass1 = bold_pattern().replace_all(text, |caps: &Captures| {
        bold_spans.push(caps[1].to_string());
        format!("{BOLD_MARK}{}{BOLD_MARK}", bold_spans.len() - 1)
    });

    let mut italic_spans: Vec<String> = Vec::new();
    let pass2 = italic_pattern().replace_all(&pass1, |caps: &Captures| {
        italic_spans.push(caps[1].to_string());
        format!("{ITALIC_MARK}{}{ITALIC_MARK}", italic_spans.len() - 1)
    });

    let mut runs: Vec<TextRun> = Vec::new();
    let mut literal = String::new();
    let mut chars = pass2.chars().peekable();

    while let Some(c) = chars.next() {
        if c != BOLD_MARK && c != ITALIC_MARK {
            literal.push(c);
            continue;
        }

        if !literal.is_empty() {
            runs.push(TextRun::plain(std::mem::take(&mut literal)));
        }

        // Read the span index between the matching pair of sentinels.
        let mut index = String::new();
        for next in chars.by_ref() {
            if next == c {
                break;
            }
            index.push(next);
        }

        let (table, bold) = if c == BOLD_MARK {
            (&bold_spans, true)
        } else {
            (&italic_spans, false)
        };
        if let Some(span) = index.parse::<usize>().ok().and_then(|i| table.get(i)) {
            runs.push(TextRun {
                text: span.clone(),
                bold,
                italic: !bold,
            });
        }
    }

    if !literal.is_empty() {
        runs.push(TextRun::plain(literal));
    }
    if runs.is_empty() && !text.is_empty() {
        runs.push(TextRun::plain(text.to_string()));
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(text: &str) -> TextRun {
        TextRun {
            text: text.to_string(),
            bold: true,
            italic: false,
        }
    }

    fn italic(text: &str) -> TextRun {
        TextRun {
            text: text.to_string(),
            bold: false,
            italic: true,
        }
    }

    fn plain(text: &str) -> TextRun {
        TextRun::plain(text.to_string())
    }

    #[test]
    fn test_mixed_bold_and_italic_run_boundaries() {
        let runs =
            parse_inline_runs("**Q3 was strong.** Revenue grew *significantly* this quarter.");
        assert_eq!(
            runs,
            vec![
                bold("Q3 was strong."),
                plain(" Revenue grew "),
                italic("significantly"),
                plain(" this quarter."),
            ]
        );
    }

    #[test]
    fn test_plain_text_is_a_single_unformatted_run() {
        assert_eq!(
            parse_inline_runs("No markers at all."),
            vec![plain("No markers at all.")]
        );
    }

    #[test]
    fn test_unmatched_asterisks_stay_literal() {
        assert_eq!(
            parse_inline_runs("a stray * end"),
            vec![plain("a stray * end")]
        );
        assert_eq!(
            parse_inline_runs("trailing **"),
            vec![plain("trailing **")]
        );
    }

    #[test]
    fn test_italic_inside_bold_is_not_reparsed() {
        // Bold spans are consumed first; markers inside them stay literal.
        assert_eq!(
            parse_inline_runs("**a *b* c**"),
            vec![bold("a *b* c")]
        );
    }

    #[test]
    fn test_adjacent_spans() {
        assert_eq!(
            parse_inline_runs("**one***two*"),
            vec![bold("one"), italic("two")]
        );
    }

    #[test]
    fn test_empty_input_yields_no_runs() {
        assert!(parse_inline_runs("").is_empty());
    }
}
