use serde::{Deserialize, Serialize};

/// Headline performance figures parsed from one uploaded source file.
/// All values are percentages. Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceData {
    pub period: String,
    pub fund_return: f64,
    pub benchmark_return: f64,
    pub alpha: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharpe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_drawdown: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ytd_return: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since_inception: Option<f64>,
}

/// One holding's contribution to the period return, signed percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionItem {
    pub name: String,
    pub contribution: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub is_contributor: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(default)]
    pub contributors: Vec<AttributionItem>,
    #[serde(default)]
    pub detractors: Vec<AttributionItem>,
}

impl Attribution {
    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty() && self.detractors.is_empty()
    }
}

/// Everything extracted from a single uploaded source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInputData {
    #[serde(default)]
    pub performance: Option<PerformanceData>,
    #[serde(default)]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

/// Inputs folded across every uploaded file: the first non-empty performance
/// and attribution win, commentary is concatenated in file order. Files
/// without structured commentary fall back to their raw text.
#[derive(Debug, Clone, Default)]
pub struct AggregatedInputs {
    pub performance: Option<PerformanceData>,
    pub attribution: Option<Attribution>,
    pub commentary: String,
}

impl AggregatedInputs {
    pub fn from_parsed(parsed: &[ParsedInputData]) -> Self {
        let mut aggregated = Self::default();
        let mut notes: Vec<String> = Vec::new();

        for input in parsed {
            if aggregated.performance.is_none() {
                if let Some(performance) = &input.performance {
                    aggregated.performance = Some(performance.clone());
                }
            }
            if aggregated.attribution.is_none() {
                if let Some(attribution) = &input.attribution {
                    if !attribution.is_empty() {
                        aggregated.attribution = Some(attribution.clone());
                    }
                }
            }
            match (&input.commentary, &input.raw_text) {
                (Some(commentary), _) if !commentary.trim().is_empty() => {
                    notes.push(commentary.trim().to_string());
                }
                (_, Some(raw)) if !raw.trim().is_empty() => {
                    notes.push(raw.trim().to_string());
                }
                _ => {}
            }
        }

        aggregated.commentary = notes.join("\n\n");
        aggregated
    }

    pub fn has_reference_data(&self) -> bool {
        self.performance.is_some() || self.attribution.is_some()
    }
}
