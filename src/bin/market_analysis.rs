use amby_agent::agent::run_market_analysis;
use amby_agent::config::Config;
use amby_agent::llm::{ChatProvider, GeminiClient, OpenAiClient};
use amby_agent::market_data::BinanceClient;
use anyhow::bail;
use dotenv::dotenv;

const USAGE: &str = "usage: market_analysis [--provider gemini|openai] [SYMBOL]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    amby_agent::init_tracing();

    let mut provider_name = String::from("gemini");
    let mut symbol = String::from("BTCUSDT");
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--provider" => match args.next() {
                Some(name) => provider_name = name,
                None => bail!("{USAGE}"),
            },
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => symbol = arg.to_uppercase(),
        }
    }

    let config = Config::from_env();
    let provider: Box<dyn ChatProvider> = match provider_name.as_str() {
        "gemini" => Box::new(GeminiClient::new(
            config.gemini_api_key,
            config.gemini_base_url,
            config.gemini_model,
        )),
        "openai" => Box::new(OpenAiClient::new(
            config.openai_api_key,
            config.openai_base_url,
            config.openai_model,
        )),
        other => bail!("unknown provider '{other}'\n{USAGE}"),
    };
    let market = BinanceClient::new(config.binance_base_url);

    let analysis = run_market_analysis(provider.as_ref(), &market, &symbol).await?;

    println!("\n=== {symbol} MARKET ANALYSIS ===");
    println!("{analysis}");
    println!("============================\n");

    Ok(())
}
