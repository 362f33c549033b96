use std::sync::Arc;

use amby_agent::agent::search_and_create_markets;
use amby_agent::config::Config;
use amby_agent::llm::GeminiClient;
use amby_agent::tools::{CreateMarketTool, SearchEventsTool};
use dotenv::dotenv;

const USAGE: &str = "usage: event_agent [--create-markets] [KEYWORD]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    amby_agent::init_tracing();

    let mut keyword = String::from("web3");
    let mut create_markets = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--create-markets" => create_markets = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => keyword = arg,
        }
    }

    let config = Config::from_env();
    let gemini = GeminiClient::new(
        config.gemini_api_key,
        config.gemini_base_url,
        config.gemini_model,
    );
    let search = SearchEventsTool::new(Arc::new(gemini));

    if !create_markets {
        let events = search.search(&keyword).await?;
        println!("\n=== EVENT SEARCH RESULT ===");
        println!("{events}");
        println!("============================\n");
        return Ok(());
    }

    let create = CreateMarketTool::new(config.market);
    for market in search_and_create_markets(&search, &create, &keyword).await? {
        println!("\n=== {} (ends {}) ===", market.event.title, market.event.end_time);
        println!("{}", market.tx);
    }

    Ok(())
}
