pub mod create_market;
pub mod search_events;

use serde_json::Value;

pub use create_market::{CreateMarketTool, MISSING_CONFIG_MESSAGE};
pub use search_events::SearchEventsTool;

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    async fn call(&self, args: Value) -> anyhow::Result<Value>;
}
