use std::sync::Arc;

use amby_agent::config::Config;
use amby_agent::llm::GeminiClient;
use amby_agent::server::{self, ToolRegistry};
use amby_agent::tools::{CreateMarketTool, SearchEventsTool};
use dotenv::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    amby_agent::init_tracing();

    info!("Starting Amby tool server...");

    let config = Config::from_env();
    let gemini = GeminiClient::new(
        config.gemini_api_key,
        config.gemini_base_url,
        config.gemini_model,
    );

    let mut tools = ToolRegistry::new();
    tools.register(SearchEventsTool::new(Arc::new(gemini)));
    tools.register(CreateMarketTool::new(config.market));

    server::run(tools).await?;

    Ok(())
}
