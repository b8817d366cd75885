use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use report_services::{
    build_router,
    config,
    logging,
    services::{analysis::ReportAnalyzer, llm_client::HttpLlmClient},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::load_config()?;

    // One HTTP client for the whole process, shared by every request
    let client = HttpLlmClient::from_config(&config)?;
    let analyzer = ReportAnalyzer::new(Arc::new(client));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        "LLM endpoint: {}, timeout: {:?}, default model: {}",
        config.llm_api_url,
        config.request_timeout(),
        config.model_name
    );

    // Build our application state
    let state = Arc::new(AppState::new(config, analyzer));
    let app = build_router(state);

    // Run it
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
