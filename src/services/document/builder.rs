//! DOCX assembly: cover block, themed section headings, per-block body
//! paragraphs, and a running header/footer with live page-number fields.

use std::io::Cursor;

use chrono::Utc;
use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, FieldCharType, Footer, Header, IndentLevel,
    InstrNUMPAGES, InstrPAGE, InstrText, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, ParagraphBorder, ParagraphBorderPosition, ParagraphBorders, Run, Start,
};

use crate::errors::AppError;
use crate::models::{BrandSettings, EditedContent, GeneratedNarrative, GenerationSettings};

use super::blocks::{parse_blocks, Block};
use super::color::resolve_color;
use super::inline::parse_inline_runs;

// Font sizes in half-points.
const TITLE_SIZE: usize = 56;
const SUBTITLE_SIZE: usize = 24;
const HEADING_SIZE: usize = 32;
const SUB_HEADING_SIZE: usize = 26;
const RUNNING_SIZE: usize = 18;

const BULLET_NUMBERING: usize = 1;
const QUOTE_INDENT: i32 = 720;

/// Compile the narrative into DOCX bytes. Edited overrides are applied per
/// section before block parsing; the narrative itself is never mutated.
pub fn build_document(
    narrative: &GeneratedNarrative,
    settings: &GenerationSettings,
    brand: Option<&BrandSettings>,
    edited: Option<&EditedContent>,
) -> Result<Vec<u8>, AppError> {
    let accent = resolve_color(brand.and_then(|b| b.primary_color.as_deref()));

    let mut docx = Docx::new()
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("•"),
            LevelJc::new("left"),
        )))
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
        .header(running_header(settings))
        .footer(running_footer());

    // Cover block.
    docx = docx
        .add_paragraph(Paragraph::new())
        .add_paragraph(centered(
            Run::new()
                .add_text(settings.fund_name.clone())
                .size(TITLE_SIZE)
                .bold()
                .color(accent.clone()),
        ))
        .add_paragraph(centered(
            Run::new()
                .add_text(settings.fund_type.clone())
                .size(SUBTITLE_SIZE),
        ))
        .add_paragraph(centered(
            Run::new()
                .add_text(settings.reporting_period.clone())
                .size(SUBTITLE_SIZE),
        ))
        .add_paragraph(centered(
            Run::new()
                .add_text(Utc::now().format("%B %-d, %Y").to_string())
                .size(SUBTITLE_SIZE),
        ))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));

    for section in &narrative.sections {
        let content = edited
            .and_then(|e| e.get(&section.id))
            .map(String::as_str)
            .unwrap_or(&section.content);

        docx = docx.add_paragraph(section_heading(&section.title, &accent));
        for block in parse_blocks(content) {
            docx = docx.add_paragraph(block_paragraph(&block, &accent));
        }
        docx = docx.add_paragraph(Paragraph::new());
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| AppError::Assembly(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn centered(run: Run) -> Paragraph {
    Paragraph::new().add_run(run).align(AlignmentType::Center)
}

fn section_heading(title: &str, accent: &str) -> Paragraph {
    let heading = Paragraph::new().add_run(
        Run::new()
            .add_text(title.to_string())
            .size(HEADING_SIZE)
            .bold()
            .color(accent.to_string()),
    );
    with_border(heading, ParagraphBorderPosition::Bottom, accent, 8)
}

fn with_border(
    mut paragraph: Paragraph,
    position: ParagraphBorderPosition,
    accent: &str,
    size: usize,
) -> Paragraph {
    paragraph.property = paragraph.property.set_borders(
        ParagraphBorders::with_empty().set(
            ParagraphBorder::new(position)
                .color(accent.to_string())
                .size(size),
        ),
    );
    paragraph
}

fn block_paragraph(block: &Block, accent: &str) -> Paragraph {
    match block {
        Block::SubHeading(text) => Paragraph::new().add_run(
            Run::new()
                .add_text(text.clone())
                .size(SUB_HEADING_SIZE)
                .bold(),
        ),
        Block::Bullet(text) => formatted_runs(Paragraph::new(), text, false)
            .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0)),
        Block::Quote(text) => {
            let quote = formatted_runs(Paragraph::new(), text, true)
                .indent(Some(QUOTE_INDENT), None, None, None);
            with_border(quote, ParagraphBorderPosition::Left, accent, 16)
        }
        Block::Paragraph(text) => formatted_runs(Paragraph::new(), text, false),
    }
}

fn formatted_runs(mut paragraph: Paragraph, text: &str, force_italic: bool) -> Paragraph {
    for text_run in parse_inline_runs(text) {
        let mut run = Run::new().add_text(text_run.text);
        if text_run.bold {
            run = run.bold();
        }
        if text_run.italic || force_italic {
            run = run.italic();
        }
        paragraph = paragraph.add_run(run);
    }
    paragraph
}

fn running_header(settings: &GenerationSettings) -> Header {
    Header::new().add_paragraph(
        Paragraph::new().align(AlignmentType::Right).add_run(
            Run::new()
                .add_text(format!(
                    "{} | {}",
                    settings.fund_name, settings.reporting_period
                ))
                .size(RUNNING_SIZE),
        ),
    )
}

fn running_footer() -> Footer {
    Footer::new().add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(
                Run::new()
                    .add_text("Confidential - For Investor Use Only | Page ")
                    .size(RUNNING_SIZE),
            )
            .add_run(page_field(InstrText::PAGE(InstrPAGE::new())))
            .add_run(Run::new().add_text(" of ").size(RUNNING_SIZE))
            .add_run(page_field(InstrText::NUMPAGES(InstrNUMPAGES::new()))),
    )
}

/// A live field (recomputed by the word processor) with "1" as the cached
/// placeholder result.
fn page_field(instruction: InstrText) -> Run {
    Run::new()
        .size(RUNNING_SIZE)
        .add_field_char(FieldCharType::Begin, false)
        .add_instr_text(instruction)
        .add_field_char(FieldCharType::Separate, false)
        .add_text("1")
        .add_field_char(FieldCharType::End, false)
}
