//! End-to-end tests for the letters API, driven through the full router with
//! a scripted LLM provider so no network calls are made.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use letterforge_backend::app::create_app;
use letterforge_backend::errors::LlmError;
use letterforge_backend::models::{
    GeneratedNarrative, GenerationSettings, LetterFormat, NarrativeSection, SectionId,
    SectionToggles, Tone,
};
use letterforge_backend::services::llm_service::{LlmConfig, LlmProvider, LlmService};
use letterforge_backend::services::refinement_service::REFINE_APOLOGY;
use letterforge_backend::state::AppState;

struct ScriptedProvider {
    response: String,
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate_completion(&self, _prompt: String) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

fn app_with_response(response: &str) -> Router {
    let llm_service = LlmService::with_provider(Arc::new(ScriptedProvider {
        response: response.to_string(),
    }));
    create_app(AppState {
        llm_service: Arc::new(llm_service),
    })
}

/// No API key configured, so every completion fails with MissingApiKey.
fn app_without_provider() -> Router {
    create_app(AppState {
        llm_service: Arc::new(LlmService::new(LlmConfig {
            api_key: None,
            ..Default::default()
        })),
    })
}

fn settings() -> GenerationSettings {
    GenerationSettings {
        fund_name: "Granite Peak Partners".to_string(),
        fund_type: "long-short equity hedge fund".to_string(),
        reporting_period: "Q3 2025".to_string(),
        tone: Tone::Neutral,
        format: LetterFormat::FullLetter,
        user_context: None,
        sections: SectionToggles::default(),
    }
}

fn narrative() -> GeneratedNarrative {
    GeneratedNarrative::from_sections(
        vec![
            NarrativeSection {
                id: SectionId::PerformanceOverview,
                title: "Performance Overview".to_string(),
                content: "The fund returned 4.2% this quarter.".to_string(),
            },
            NarrativeSection {
                id: SectionId::ForwardOutlook,
                title: "Forward-Looking Outlook".to_string(),
                content: "We remain constructive on the portfolio.".to_string(),
            },
        ],
        settings(),
    )
}

fn full_letter_response() -> String {
    [
        "## Performance Overview",
        "The fund returned 4.2% against a benchmark return of 3.1%.",
        "## Attribution Analysis",
        "Technology holdings led contribution.",
        "## Key Events & Portfolio Updates",
        "We initiated two new positions.",
        "## Forward-Looking Outlook",
        "We expect continued volatility.",
    ]
    .join("\n\n")
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_generate_returns_all_enabled_sections() {
    let app = app_with_response(&full_letter_response());
    let payload = json!({ "settings": settings() });

    let (status, body) = post_json(app, "/api/letters/generate", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let sections = body["narrative"]["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 4);
    assert_eq!(sections[0]["id"], "performanceOverview");
    assert_eq!(sections[3]["id"], "forwardOutlook");

    // fullText must be the deterministic rejoin of the kept sections.
    let narrative: GeneratedNarrative =
        serde_json::from_value(body["narrative"].clone()).unwrap();
    assert_eq!(
        narrative.full_text,
        GeneratedNarrative::rejoin(&narrative.sections)
    );
}

#[tokio::test]
async fn test_generate_with_regenerate_section_returns_single_section() {
    let app = app_with_response("## Key Events & Portfolio Updates\n\nWe exited one position.");
    let payload = json!({
        "settings": settings(),
        "regenerateSection": "keyEvents",
    });

    let (status, body) = post_json(app, "/api/letters/generate", payload).await;

    assert_eq!(status, StatusCode::OK);
    let sections = body["narrative"]["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["id"], "keyEvents");
}

#[tokio::test]
async fn test_generate_without_api_key_is_a_configuration_error() {
    let app = app_without_provider();
    let payload = json!({ "settings": settings() });

    let (status, body) = post_json(app, "/api/letters/generate", payload).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_refine_applies_update_from_prose_prefixed_json() {
    let reply = format!(
        "Sure, here is the update. {}",
        json!({
            "message": "I tightened the performance section.",
            "affectedSections": ["performanceOverview"],
            "updatedSections": {
                "performanceOverview": "The fund returned a net 4.2% this quarter."
            }
        })
    );
    let app = app_with_response(&reply);
    // Full wire shape, every documented request field present by name.
    let payload = json!({
        "currentNarrative": narrative(),
        "userMessage": "Make the performance section tighter.",
        "chatHistory": [],
        "parsedData": [],
        "settings": settings(),
    });

    let (status, body) = post_json(app, "/api/letters/refine", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["affectedSections"], json!(["performanceOverview"]));
    assert_eq!(
        body["assistantMessage"],
        json!("I tightened the performance section.")
    );

    let sections = body["updatedNarrative"]["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(
        sections[0]["content"],
        json!("The fund returned a net 4.2% this quarter.")
    );
    // Untouched sections are preserved verbatim.
    assert_eq!(
        sections[1]["content"],
        json!("We remain constructive on the portfolio.")
    );
}

#[tokio::test]
async fn test_refine_parse_failure_is_reported_not_raised() {
    let app = app_with_response("I am not able to format that as requested.");
    let payload = json!({
        "currentNarrative": narrative(),
        "userMessage": "Shorten everything.",
        "settings": settings(),
    });

    let (status, body) = post_json(app, "/api/letters/refine", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["assistantMessage"], json!(REFINE_APOLOGY));
    assert!(body["error"].is_string());
    assert!(body.get("updatedNarrative").is_none());
}

#[tokio::test]
async fn test_refine_rejects_blank_user_message() {
    let app = app_with_response("unused");
    let payload = json!({
        "currentNarrative": narrative(),
        "userMessage": "   ",
        "settings": settings(),
    });

    let (status, body) = post_json(app, "/api/letters/refine", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_export_returns_docx_attachment() {
    let mut export_settings = settings();
    export_settings.fund_name = "Granite: Peak/Partners".to_string();

    let app = app_with_response("unused");
    let payload = json!({
        "narrative": narrative(),
        "settings": export_settings,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/letters/export")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    // Filename is sanitized before landing in the header.
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Granite PeakPartners.docx\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn test_export_without_narrative_is_rejected() {
    let app = app_with_response("unused");
    let payload = json!({ "settings": settings() });

    let (status, body) = post_json(app, "/api/letters/export", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app_with_response("unused");
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}
