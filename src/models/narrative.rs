use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::settings::{GenerationSettings, SectionId};

/// One canonical section of a generated letter. `content` is the markdown
/// body with its `## ` heading stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub id: SectionId,
    pub title: String,
    pub content: String,
}

/// Sparse per-section overrides held by the caller and applied only at
/// export time, last write wins per id. Never mutates the narrative itself.
pub type EditedContent = HashMap<SectionId, String>;

/// One draft of an investor letter. Sections are kept in generation order,
/// not toggle-declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNarrative {
    pub sections: Vec<NarrativeSection>,
    pub full_text: String,
    pub generated_at: DateTime<Utc>,
    pub settings: GenerationSettings,
}

impl GeneratedNarrative {
    /// Canonical reconstruction of the letter text. `full_text` is always
    /// derived from this; it is never an independent source of truth.
    pub fn rejoin(sections: &[NarrativeSection]) -> String {
        sections
            .iter()
            .map(|s| format!("## {}\n\n{}", s.title, s.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn from_sections(sections: Vec<NarrativeSection>, settings: GenerationSettings) -> Self {
        Self {
            full_text: Self::rejoin(&sections),
            sections,
            generated_at: Utc::now(),
            settings,
        }
    }

    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LetterFormat, SectionToggles, Tone};

    fn settings() -> GenerationSettings {
        GenerationSettings {
            fund_name: "Granite Peak Partners".to_string(),
            fund_type: "long-short equity".to_string(),
            reporting_period: "Q3 2025".to_string(),
            tone: Tone::Neutral,
            format: LetterFormat::FullLetter,
            user_context: None,
            sections: SectionToggles::default(),
        }
    }

    #[test]
    fn test_full_text_matches_rejoined_sections() {
        let sections = vec![
            NarrativeSection {
                id: SectionId::PerformanceOverview,
                title: "Performance Overview".to_string(),
                content: "We returned 4.2%.".to_string(),
            },
            NarrativeSection {
                id: SectionId::ForwardOutlook,
                title: "Forward-Looking Outlook".to_string(),
                content: "We remain constructive.".to_string(),
            },
        ];

        let narrative = GeneratedNarrative::from_sections(sections, settings());
        assert_eq!(
            narrative.full_text,
            GeneratedNarrative::rejoin(&narrative.sections)
        );
        assert_eq!(
            narrative.full_text,
            "## Performance Overview\n\nWe returned 4.2%.\n\n\
             ## Forward-Looking Outlook\n\nWe remain constructive."
        );
    }

    #[test]
    fn test_edited_content_survives_json_round_trip() {
        let mut edited = EditedContent::new();
        edited.insert(SectionId::KeyEvents, "Rewritten.".to_string());

        let json = serde_json::to_string(&edited).unwrap();
        assert!(json.contains("keyEvents"));
        let back: EditedContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&SectionId::KeyEvents).unwrap(), "Rewritten.");
    }
}
