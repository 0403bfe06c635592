use std::sync::Arc;

use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{
    GeneratedNarrative, GenerationSettings, ParsedInputData, SectionId, SectionToggles,
};
use crate::services::extractor::extract_sections;
use crate::services::llm_service::LlmService;
use crate::services::prompt::build_generation_prompt;

/// Generate a narrative from aggregated input data and settings.
///
/// With `regenerate` set, only that section's toggle is honored for this
/// call; the returned narrative contains just that section and the caller
/// replaces its copy wholesale. The stored settings snapshot is always the
/// caller's settings, not the per-call override.
pub async fn generate_narrative(
    llm_service: Arc<LlmService>,
    parsed: &[ParsedInputData],
    settings: &GenerationSettings,
    regenerate: Option<SectionId>,
) -> Result<GeneratedNarrative, AppError> {
    let toggles = match regenerate {
        Some(id) => SectionToggles::only(id),
        None => settings.sections,
    };
    if toggles.enabled_ids().is_empty() {
        return Err(AppError::Validation(
            "at least one section must be enabled".to_string(),
        ));
    }

    info!(
        "Generating narrative for \"{}\" ({} sections requested)",
        settings.fund_name,
        toggles.enabled_ids().len()
    );

    let prompt = build_generation_prompt(parsed, settings, regenerate);
    let text = llm_service.generate_completion(prompt).await?;

    let sections = extract_sections(&text, &toggles);
    if sections.is_empty() {
        error!("Generated text contained no recognizable \"## \" sections");
        return Err(AppError::Upstream(
            "generated text contained no sections".to_string(),
        ));
    }

    Ok(GeneratedNarrative::from_sections(
        sections,
        settings.clone(),
    ))
}
