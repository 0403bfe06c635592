//! Parses generated free text into the ordered list of canonical sections.
//!
//! The text is split on `"## "` at line start; anything before the first
//! marker is discarded. Each chunk's first line is its title, the rest is
//! content with nested `### ` sub-headers and all other markdown left intact.
//! A chunk survives only if its title maps to a canonical id and that id's
//! toggle is enabled.

use crate::models::{NarrativeSection, SectionId, SectionToggles};

pub fn extract_sections(text: &str, toggles: &SectionToggles) -> Vec<NarrativeSection> {
    split_on_headings(text)
        .into_iter()
        .filter_map(|(title, content)| {
            let id = match_section_id(&title)?;
            if !toggles.is_enabled(id) {
                return None;
            }
            Some(NarrativeSection { id, title, content })
        })
        .collect()
}

/// Split into (title, content) chunks on line-initial `## ` markers.
/// Returns an empty vec when no markers exist; callers treat an empty
/// section list as a failure to render, not a parse error.
fn split_on_headings(text: &str) -> Vec<(String, String)> {
    let mut chunks: Vec<(String, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("## ") {
            chunks.push((rest.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = chunks.last_mut() {
            body.push(line);
        }
        // Lines before the first marker fall through and are discarded.
    }

    chunks
        .into_iter()
        .map(|(title, body)| (title, body.join("\n").trim().to_string()))
        .collect()
}

/// Map a generated heading to a canonical id by its first word. Deliberately
/// brittle: the generation prompt pins the exact heading phrasing, and the
/// first-word rule is a documented compatibility contract.
fn match_section_id(title: &str) -> Option<SectionId> {
    let first_word = title.split_whitespace().next()?.to_lowercase();
    SectionId::ALL
        .into_iter()
        .find(|id| id.match_word() == first_word)
}
