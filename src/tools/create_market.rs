use super::Tool;
use crate::config::MarketConfig;
use crate::neo::{ContractParam, NeoRpcClient};
use anyhow::Result;
use serde_json::{json, Value};
use tracing::{info, warn};

pub const MISSING_CONFIG_MESSAGE: &str = "Missing NEO_RPC_ENDPOINT / CONTRACT_HASH / WALLET_ADDRESS.";

pub const CREATE_MARKET_OPERATION: &str = "createMarket";

/// Invokes `createMarket(title, description, endTime)` on the NEO contract.
///
/// This goes through `invokefunction`, which the node executes without a
/// signed transaction, so no state is committed on chain.
pub struct CreateMarketTool {
    config: MarketConfig,
}

impl CreateMarketTool {
    pub fn new(config: MarketConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub async fn create_market(&self, title: &str, description: &str, end_time: i64) -> Result<String> {
        let Some((rpc_endpoint, contract_hash, _wallet)) = self.config.complete() else {
            warn!("market configuration incomplete, skipping RPC call");
            return Ok(MISSING_CONFIG_MESSAGE.to_string());
        };

        info!(title, end_time, "invoking {CREATE_MARKET_OPERATION}");
        let client = NeoRpcClient::new(rpc_endpoint)?;
        let args = [
            ContractParam::String(title.to_string()),
            ContractParam::String(description.to_string()),
            ContractParam::Integer(end_time),
        ];
        let result = client
            .invoke_function(contract_hash, CREATE_MARKET_OPERATION, &args)
            .await?;

        Ok(serde_json::to_string_pretty(&result)?)
    }
}

#[async_trait::async_trait]
impl Tool for CreateMarketTool {
    fn name(&self) -> &'static str {
        "create_market"
    }

    fn description(&self) -> &'static str {
        "Call createMarket(title, description, endTime) on NEO smart contract"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "description": { "type": "string" },
                "endTime": {
                    "type": "integer",
                    "description": "Market close time in milliseconds since the Unix epoch (UTC)"
                }
            },
            "required": ["title", "description", "endTime"]
        })
    }

    async fn call(&self, args: Value) -> Result<Value> {
        let title = args["title"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing title"))?;
        let description = args["description"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing description"))?;
        let end_time = args["endTime"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("Missing or non-integer endTime"))?;

        let tx = self.create_market(title, description, end_time).await?;
        Ok(json!({ "tx": tx }))
    }
}
