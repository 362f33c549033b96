use std::env;

/// Environment variable the RPC endpoint is read from.
///
/// This is the node URL itself rather than a variable name, so in a normal
/// environment the lookup finds nothing and market creation reports missing
/// configuration.
pub const RPC_ENDPOINT_VAR: &str = "http://seed3t5.neo.org:20332";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Settings needed to reach the prediction-market contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarketConfig {
    pub rpc_endpoint: Option<String>,
    pub contract_hash: Option<String>,
    pub wallet_address: Option<String>,
}

impl MarketConfig {
    pub fn from_env() -> Self {
        Self {
            rpc_endpoint: non_empty_var(RPC_ENDPOINT_VAR),
            contract_hash: non_empty_var("CONTRACT_HASH"),
            wallet_address: non_empty_var("WALLET_ADDRESS"),
        }
    }

    /// Returns `(endpoint, contract_hash, wallet_address)` when all three are set.
    pub fn complete(&self) -> Option<(&str, &str, &str)> {
        match (&self.rpc_endpoint, &self.contract_hash, &self.wallet_address) {
            (Some(rpc), Some(contract), Some(wallet)) => {
                Some((rpc.as_str(), contract.as_str(), wallet.as_str()))
            }
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub binance_base_url: String,
    pub bind_addr: String,
    pub market: MarketConfig,
}

impl Config {
    /// Missing API keys are left empty; the provider call rejects them.
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: var_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            openai_api_key: non_empty_var("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: var_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            openai_base_url: var_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            binance_base_url: var_or("BINANCE_BASE_URL", DEFAULT_BINANCE_BASE_URL),
            bind_addr: var_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            market: MarketConfig::from_env(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("binance_base_url", &self.binance_base_url)
            .field("bind_addr", &self.bind_addr)
            .field("market", &self.market)
            .finish_non_exhaustive()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_string())
}
