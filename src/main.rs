use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use letterforge_backend::app::create_app;
use letterforge_backend::logging::{init_logging, LoggingConfig};
use letterforge_backend::services::llm_service::{LlmConfig, LlmService};
use letterforge_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env());

    let llm_config = LlmConfig::from_env();
    if llm_config.api_key.is_none() {
        tracing::warn!(
            "OPENAI_API_KEY is not set; generate/refine will return a configuration error"
        );
    }

    let state = AppState {
        llm_service: Arc::new(LlmService::new(llm_config)),
    };
    let app = create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Letterforge backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
