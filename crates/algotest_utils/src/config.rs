//! Client configuration from the environment, with localnet defaults.

use std::env;
use std::time::Duration;

const DEFAULT_ALGOD_ADDRESS: &str = "http://localhost:4001";
const DEFAULT_ALGOD_TOKEN: &str =
    "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const DEFAULT_INDEXER_ADDRESS: &str = "http://localhost:8980";
const DEFAULT_INDEXER_TIMEOUT_SECS: u64 = 61;

/// Connection settings for the algod and indexer services.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub algod_address: String,
    pub algod_token: String,
    pub indexer_address: String,
    pub indexer_token: String,
    /// Deadline for the query-tier lag retry loop.
    pub indexer_timeout: Duration,
}

impl ClientConfig {
    /// The standard localnet sandbox endpoints.
    pub fn localnet() -> Self {
        ClientConfig {
            algod_address: DEFAULT_ALGOD_ADDRESS.to_string(),
            algod_token: DEFAULT_ALGOD_TOKEN.to_string(),
            indexer_address: DEFAULT_INDEXER_ADDRESS.to_string(),
            indexer_token: String::new(),
            indexer_timeout: Duration::from_secs(DEFAULT_INDEXER_TIMEOUT_SECS),
        }
    }

    /// Reads `ALGOD_ADDRESS`, `ALGOD_TOKEN`, `INDEXER_ADDRESS`,
    /// `INDEXER_TOKEN`, and `INDEXER_TIMEOUT` (seconds), falling back to the
    /// localnet defaults for anything unset. A `.env` file is honored when
    /// present.
    pub fn from_env_or_localnet() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = Self::localnet();
        let indexer_timeout = env::var("INDEXER_TIMEOUT")
            .ok()
            .and_then(|t| t.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.indexer_timeout);

        ClientConfig {
            algod_address: env_or("ALGOD_ADDRESS", defaults.algod_address),
            algod_token: env_or("ALGOD_TOKEN", defaults.algod_token),
            indexer_address: env_or("INDEXER_ADDRESS", defaults.indexer_address),
            indexer_token: env_or("INDEXER_TOKEN", defaults.indexer_token),
            indexer_timeout,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::localnet()
    }
}

fn env_or(key: &str, fallback: String) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => fallback,
    }
}
