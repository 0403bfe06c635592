use std::sync::Arc;

use crate::services::llm_service::LlmService;

#[derive(Clone)]
pub struct AppState {
    pub llm_service: Arc<LlmService>,
}
