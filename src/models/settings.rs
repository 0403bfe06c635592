use serde::{Deserialize, Serialize};

/// The four canonical investor-letter sections.
///
/// The whole pipeline is closed over these ids: the prompt compiler emits one
/// instruction block per enabled id, the extractor drops any generated heading
/// that does not map to one, and refinement may only rewrite content for ids
/// already present in a narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    PerformanceOverview,
    AttributionAnalysis,
    KeyEvents,
    ForwardOutlook,
}

impl SectionId {
    pub const ALL: [SectionId; 4] = [
        SectionId::PerformanceOverview,
        SectionId::AttributionAnalysis,
        SectionId::KeyEvents,
        SectionId::ForwardOutlook,
    ];

    /// The heading the generation prompt asks for, verbatim.
    pub fn canonical_title(self) -> &'static str {
        match self {
            SectionId::PerformanceOverview => "Performance Overview",
            SectionId::AttributionAnalysis => "Attribution Analysis",
            SectionId::KeyEvents => "Key Events & Portfolio Updates",
            SectionId::ForwardOutlook => "Forward-Looking Outlook",
        }
    }

    /// First word of the canonical title, lowercased. Generated headings are
    /// mapped back to an id by comparing their first word against this, so
    /// "Performance & Risk Overview" still resolves but "Overview of
    /// Performance" does not.
    pub fn match_word(self) -> &'static str {
        match self {
            SectionId::PerformanceOverview => "performance",
            SectionId::AttributionAnalysis => "attribution",
            SectionId::KeyEvents => "key",
            SectionId::ForwardOutlook => "forward-looking",
        }
    }

    /// Wire-format key, identical to the serde rename.
    pub fn as_key(self) -> &'static str {
        match self {
            SectionId::PerformanceOverview => "performanceOverview",
            SectionId::AttributionAnalysis => "attributionAnalysis",
            SectionId::KeyEvents => "keyEvents",
            SectionId::ForwardOutlook => "forwardOutlook",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_key() == key)
    }
}

/// Which canonical sections the caller wants generated and kept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionToggles {
    pub performance_overview: bool,
    pub attribution_analysis: bool,
    pub key_events: bool,
    pub forward_outlook: bool,
}

impl Default for SectionToggles {
    fn default() -> Self {
        Self {
            performance_overview: true,
            attribution_analysis: true,
            key_events: true,
            forward_outlook: true,
        }
    }
}

impl SectionToggles {
    /// Toggles with exactly one section enabled, used by targeted
    /// regeneration to override the settings map for a single call.
    pub fn only(id: SectionId) -> Self {
        Self {
            performance_overview: id == SectionId::PerformanceOverview,
            attribution_analysis: id == SectionId::AttributionAnalysis,
            key_events: id == SectionId::KeyEvents,
            forward_outlook: id == SectionId::ForwardOutlook,
        }
    }

    pub fn is_enabled(&self, id: SectionId) -> bool {
        match id {
            SectionId::PerformanceOverview => self.performance_overview,
            SectionId::AttributionAnalysis => self.attribution_analysis,
            SectionId::KeyEvents => self.key_events,
            SectionId::ForwardOutlook => self.forward_outlook,
        }
    }

    /// Enabled ids in declaration order.
    pub fn enabled_ids(&self) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|id| self.is_enabled(*id))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Conservative,
    Neutral,
    Optimistic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LetterFormat {
    ExecutiveSummary,
    FullLetter,
}

/// Single source of truth for what the prompt compiler requests and what the
/// section extractor is allowed to keep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub fund_name: String,
    pub fund_type: String,
    pub reporting_period: String,
    pub tone: Tone,
    pub format: LetterFormat,
    #[serde(default)]
    pub user_context: Option<String>,
    #[serde(default)]
    pub sections: SectionToggles,
}
