use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

use services::analysis::ReportAnalyzer;

// Application state
pub struct AppState {
    pub config: config::Config,
    pub analyzer: ReportAnalyzer,
}

impl AppState {
    pub fn new(config: config::Config, analyzer: ReportAnalyzer) -> Self {
        Self { config, analyzer }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .merge(routes::analysis::routes(state.config.max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
