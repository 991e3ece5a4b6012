use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::AiProvider;
use crate::resume::extractor::ResumeFieldExtractor;
use crate::resume::text::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Optional AI enhancement. `HeuristicOnly` when no API key is configured.
    pub ai: Arc<dyn AiProvider>,
    pub text_extractor: Arc<dyn TextExtractor>,
    /// Compiled once; regex construction is not free.
    pub resume_parser: Arc<ResumeFieldExtractor>,
}
