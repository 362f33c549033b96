//! Pipelines behind the command-line drivers.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm::{ChatProvider, Message};
use crate::market_data::BinanceClient;
use crate::tools::{CreateMarketTool, SearchEventsTool};

pub const ANALYST_SYSTEM_PROMPT: &str = "You are a crypto market analysis expert.";

/// Ordered message history for one conversation.
#[derive(Debug, Default, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Sends the history and records the reply as an assistant turn.
    pub async fn ask(&mut self, provider: &dyn ChatProvider, system: &str) -> Result<String> {
        let reply = provider.ask(&self.messages, system).await?;
        self.messages.push(Message::assistant(reply.clone()));
        Ok(reply)
    }
}

/// An event as the model is asked to describe it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCandidate {
    pub title: String,
    pub description: String,
    pub end_time: i64,
}

/// Parses a model reply into event candidates.
///
/// Accepts a bare JSON array or one wrapped in a Markdown code fence.
pub fn parse_event_candidates(raw: &str) -> Result<Vec<EventCandidate>> {
    let body = strip_code_fence(raw.trim());
    serde_json::from_str(body).context("model reply is not a JSON array of events")
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

const QUOTE_ASSETS: [&str; 5] = ["USDT", "USDC", "FDUSD", "BUSD", "USD"];

/// Base asset of a spot pair, e.g. `ETH` for `ETHUSDT`.
pub fn base_asset(symbol: &str) -> &str {
    QUOTE_ASSETS
        .iter()
        .find_map(|quote| symbol.strip_suffix(*quote).filter(|base| !base.is_empty()))
        .unwrap_or(symbol)
}

pub fn market_analysis_prompt(symbol: &str, price: Decimal) -> String {
    let asset = base_asset(symbol);
    format!(
        "Provide a technical analysis of {asset} based on the current price:\n\
         - Pair: {symbol}\n\
         - Current Price: {price}\n\
         \n\
         Analyse the short-term trend and give your outlook for today."
    )
}

/// Fetches the live quote for `symbol` and asks the provider for an analysis.
pub async fn run_market_analysis(
    provider: &dyn ChatProvider,
    market: &BinanceClient,
    symbol: &str,
) -> Result<String> {
    let price = market.ticker_price(symbol).await?;
    info!(symbol, %price, "fetched ticker");

    let mut session = ChatSession::new();
    session.add_message(Message::user(market_analysis_prompt(symbol, price)));
    session.ask(provider, ANALYST_SYSTEM_PROMPT).await
}

/// Result of pushing one event candidate through market creation.
#[derive(Debug)]
pub struct CreatedMarket {
    pub event: EventCandidate,
    pub tx: String,
}

/// Searches events for `keyword`, then creates a market for each one returned.
pub async fn search_and_create_markets(
    search: &SearchEventsTool,
    create: &CreateMarketTool,
    keyword: &str,
) -> Result<Vec<CreatedMarket>> {
    let raw = search.search(keyword).await?;
    let events = parse_event_candidates(&raw)?;
    info!(count = events.len(), "creating markets for events");

    let mut created = Vec::with_capacity(events.len());
    for event in events {
        let tx = create
            .create_market(&event.title, &event.description, event.end_time)
            .await?;
        created.push(CreatedMarket { event, tx });
    }
    Ok(created)
}
