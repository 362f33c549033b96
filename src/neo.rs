use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

/// A typed argument for a NEO contract invocation.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "value")]
pub enum ContractParam {
    String(String),
    Integer(i64),
}

/// Builds the `invokefunction` JSON-RPC 2.0 envelope.
pub fn invoke_function_payload(contract_hash: &str, operation: &str, args: &[ContractParam]) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "invokefunction",
        "params": [contract_hash, operation, args],
        "id": 1
    })
}

#[derive(Clone, Debug)]
pub struct NeoRpcClient {
    url: Url,
    http: reqwest::Client,
}

impl NeoRpcClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = Url::parse(rpc_url).with_context(|| format!("invalid RPC endpoint: {rpc_url}"))?;
        Ok(Self {
            url,
            http: reqwest::Client::new(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Posts an `invokefunction` call and returns the node's JSON response untouched.
    pub async fn invoke_function(
        &self,
        contract_hash: &str,
        operation: &str,
        args: &[ContractParam],
    ) -> Result<Value> {
        let payload = invoke_function_payload(contract_hash, operation, args);
        debug!("Sending invokefunction to {}: {}", self.url, payload);

        let response: Value = self
            .http
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        debug!("RPC response: {}", response);
        Ok(response)
    }
}
