use super::Tool;
use crate::llm::{ChatProvider, Message};
use anyhow::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub const SYSTEM_INSTRUCTION: &str =
    "You are a system that generates a list of hot Web3 quests/events.";

/// Builds the single user turn asking for a JSON array of event candidates.
pub fn event_prompt(keyword: &str) -> String {
    format!(
        "Generate a list of hot Web3/Blockchain events or quests related to '{keyword}'. \
         Examples: BTC > 100k before December, Ethereum hardfork XYZ, etc. \
         Return ONLY JSON as a list of objects with fields {{title, description, endTime}} \
         where endTime is an integer timestamp in the future, in milliseconds (UTC)."
    )
}

/// Asks the chat provider for speculative Web3 events. The reply is returned as-is.
pub struct SearchEventsTool {
    provider: Arc<dyn ChatProvider>,
}

impl SearchEventsTool {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub async fn search(&self, keyword: &str) -> Result<String> {
        info!(provider = self.provider.name(), keyword, "searching events");
        let messages = [Message::user(event_prompt(keyword))];
        let text = self.provider.ask(&messages, SYSTEM_INSTRUCTION).await?;
        Ok(text)
    }
}

#[async_trait::async_trait]
impl Tool for SearchEventsTool {
    fn name(&self) -> &'static str {
        "search_events"
    }

    fn description(&self) -> &'static str {
        "Search latest Web3 hot quests using Gemini"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "keyword": {
                    "type": "string",
                    "description": "Topic to generate events for (e.g., web3, bitcoin)"
                }
            },
            "required": ["keyword"]
        })
    }

    async fn call(&self, args: Value) -> Result<Value> {
        let keyword = args["keyword"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing keyword"))?;

        let events = self.search(keyword).await?;
        Ok(json!({ "events": events }))
    }
}
