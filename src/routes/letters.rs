use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{
    BrandSettings, ChatMessage, EditedContent, GeneratedNarrative, GenerationSettings,
    ParsedInputData, SectionId,
};
use crate::services::document::{build_document, sanitize_filename};
use crate::services::generation_service;
use crate::services::refinement_service::{self, RefineOutcome};
use crate::state::AppState;

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate_letter))
        .route("/refine", post(refine_letter))
        .route("/export", post(export_letter))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub parsed_data: Vec<ParsedInputData>,
    pub settings: GenerationSettings,
    #[serde(default)]
    pub regenerate_section: Option<SectionId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub narrative: GeneratedNarrative,
}

/// POST /api/letters/generate
/// Generate a full letter, or a single section when regenerateSection is set.
#[axum::debug_handler]
pub async fn generate_letter(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    info!(
        "POST /api/letters/generate - fund: {}, regenerate: {:?}",
        request.settings.fund_name, request.regenerate_section
    );

    let narrative = generation_service::generate_narrative(
        state.llm_service.clone(),
        &request.parsed_data,
        &request.settings,
        request.regenerate_section,
    )
    .await
    .map_err(|e| {
        error!("Letter generation failed: {}", e);
        e
    })?;

    Ok(Json(GenerateResponse {
        success: true,
        narrative,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    pub current_narrative: GeneratedNarrative,
    pub user_message: String,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    #[serde(default)]
    pub parsed_data: Vec<ParsedInputData>,
    pub settings: GenerationSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_narrative: Option<GeneratedNarrative>,
    pub assistant_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_sections: Option<Vec<SectionId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/letters/refine
/// Apply a conversational edit to an existing letter. An unparseable model
/// reply is reported as success: false with an apology, not as an HTTP error.
#[axum::debug_handler]
pub async fn refine_letter(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<RefineResponse>, AppError> {
    info!(
        "POST /api/letters/refine - sections: {}, history: {}",
        request.current_narrative.sections.len(),
        request.chat_history.len()
    );

    if request.current_narrative.sections.is_empty() {
        return Err(AppError::Validation(
            "narrative has no sections to refine".to_string(),
        ));
    }
    if request.user_message.trim().is_empty() {
        return Err(AppError::Validation(
            "userMessage must not be empty".to_string(),
        ));
    }

    let outcome = refinement_service::refine_narrative(
        state.llm_service.clone(),
        &request.current_narrative,
        &request.chat_history,
        &request.user_message,
        &request.parsed_data,
        &request.settings,
    )
    .await
    .map_err(|e| {
        error!("Letter refinement failed: {}", e);
        e
    })?;

    let response = match outcome {
        RefineOutcome::Applied {
            narrative,
            assistant_message,
            affected_sections,
        } => RefineResponse {
            success: true,
            updated_narrative: Some(narrative),
            assistant_message,
            affected_sections: Some(affected_sections),
            error: None,
        },
        RefineOutcome::ParseFailure { assistant_message } => RefineResponse {
            success: false,
            updated_narrative: None,
            assistant_message,
            affected_sections: None,
            error: Some("could not parse the model's edit instructions".to_string()),
        },
    };

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub narrative: Option<GeneratedNarrative>,
    pub settings: Option<GenerationSettings>,
    #[serde(default)]
    pub brand_settings: Option<BrandSettings>,
    #[serde(default)]
    pub edited_content: Option<EditedContent>,
}

/// POST /api/letters/export
/// Compile the letter into a DOCX attachment.
#[axum::debug_handler]
pub async fn export_letter(
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let narrative = request
        .narrative
        .ok_or_else(|| AppError::Validation("narrative is required".to_string()))?;
    let settings = request
        .settings
        .ok_or_else(|| AppError::Validation("settings is required".to_string()))?;

    info!(
        "POST /api/letters/export - fund: {}, sections: {}",
        settings.fund_name,
        narrative.sections.len()
    );

    let bytes = build_document(
        &narrative,
        &settings,
        request.brand_settings.as_ref(),
        request.edited_content.as_ref(),
    )
    .map_err(|e| {
        error!("DOCX export failed: {}", e);
        e
    })?;

    let filename = sanitize_filename(&settings.fund_name);
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.docx\"", filename),
            ),
        ],
        bytes,
    ))
}
