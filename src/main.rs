use std::sync::Arc;

use amby_agent::api::{build_router, AppState};
use amby_agent::config::Config;
use amby_agent::llm::GeminiClient;
use amby_agent::tools::{CreateMarketTool, SearchEventsTool};
use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    amby_agent::init_tracing();

    info!("Starting Amby agent HTTP API...");

    let config = Config::from_env();
    info!("{:?}", config);

    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
    );
    let state = Arc::new(AppState {
        search_events: SearchEventsTool::new(Arc::new(gemini)),
        create_market: CreateMarketTool::new(config.market.clone()),
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
