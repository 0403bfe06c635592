/// One styled block of section content, carrying its prefix-stripped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    SubHeading(String),
    Bullet(String),
    Quote(String),
    Paragraph(String),
}

/// Classify each non-empty trimmed line of section content independently by
/// prefix. There is no multi-line merging: consecutive bullets stay separate
/// blocks, and a quote spanning two source lines becomes two quote blocks.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            Some(if let Some(rest) = line.strip_prefix("### ") {
                Block::SubHeading(rest.to_string())
            } else if let Some(rest) = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
            {
                Block::Bullet(rest.to_string())
            } else if let Some(rest) = line.strip_prefix("> ") {
                Block::Quote(rest.to_string())
            } else {
                Block::Paragraph(line.to_string())
            })
        })
        .collect()
}
