pub mod classifier;
pub mod document;
pub mod extractor;
pub mod generation_service;
pub mod llm_service;
pub mod prompt;
pub mod refinement_service;
