//! The indexer facade: read-only state queries served by the query tier.

use super::ClientError;
use crate::config::ClientConfig;
use algotest_transact::Address;
use serde::{Deserialize, Serialize};

/// An account as the indexer reports it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AccountInfo {
    pub address: String,
    /// Balance in microALGO.
    pub amount: u64,
    /// Participation status, e.g. "Online" or "Offline".
    pub status: String,
    pub created_at_round: Option<u64>,
}

/// One entry of an application's global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TealKeyValue {
    /// Base64-encoded key bytes.
    pub key: String,
    pub value: TealValue,
}

/// A TEAL value: type 1 is bytes, type 2 is uint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TealValue {
    #[serde(rename = "type")]
    pub value_type: u64,
    pub bytes: String,
    pub uint: u64,
}

/// An application as the indexer reports it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationInfo {
    pub id: u64,
    pub params: ApplicationParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ApplicationParams {
    pub creator: String,
    pub global_state: Option<Vec<TealKeyValue>>,
}

/// An asset as the indexer reports it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRecord {
    pub index: u64,
    pub params: AssetRecordParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AssetRecordParams {
    pub creator: String,
    pub name: Option<String>,
    pub unit_name: Option<String>,
    pub url: Option<String>,
    pub total: u64,
    pub decimals: u64,
    pub default_frozen: Option<bool>,
    pub manager: Option<String>,
    pub reserve: Option<String>,
    pub freeze: Option<String>,
    pub clawback: Option<String>,
}

/// The narrow interface the query layer consumes from the indexer.
pub trait IndexerApi {
    fn account_info(&self, address: &Address) -> Result<AccountInfo, ClientError>;

    fn application_info(&self, app_id: u64) -> Result<ApplicationInfo, ClientError>;

    fn asset_info(&self, asset_id: u64) -> Result<AssetRecord, ClientError>;

    fn transaction_info(&self, txn_id: &str) -> Result<serde_json::Value, ClientError>;

    /// All accounts known to the indexer, used to locate the genesis
    /// funding account.
    fn accounts(&self) -> Result<Vec<AccountInfo>, ClientError>;
}

/// Blocking REST client for an indexer.
pub struct IndexerClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl IndexerClient {
    pub fn new(address: &str, token: &str) -> Self {
        IndexerClient {
            http: reqwest::blocking::Client::new(),
            base_url: address.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.indexer_address, &config.indexer_token)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let mut request = self.http.get(format!("{}{}", self.base_url, path));
        if !self.token.is_empty() {
            request = request.header("X-Indexer-API-Token", &self.token);
        }
        let response = request.send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        serde_json::from_str(&body).map_err(|e| ClientError::decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    account: AccountInfo,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    #[serde(default)]
    accounts: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
struct ApplicationResponse {
    application: ApplicationInfo,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    asset: AssetRecord,
}

impl IndexerApi for IndexerClient {
    fn account_info(&self, address: &Address) -> Result<AccountInfo, ClientError> {
        let response: AccountResponse = self.get_json(&format!("/v2/accounts/{address}"))?;
        Ok(response.account)
    }

    fn application_info(&self, app_id: u64) -> Result<ApplicationInfo, ClientError> {
        let response: ApplicationResponse =
            self.get_json(&format!("/v2/applications/{app_id}"))?;
        Ok(response.application)
    }

    fn asset_info(&self, asset_id: u64) -> Result<AssetRecord, ClientError> {
        let response: AssetResponse = self.get_json(&format!("/v2/assets/{asset_id}"))?;
        Ok(response.asset)
    }

    fn transaction_info(&self, txn_id: &str) -> Result<serde_json::Value, ClientError> {
        self.get_json(&format!("/v2/transactions/{txn_id}"))
    }

    fn accounts(&self) -> Result<Vec<AccountInfo>, ClientError> {
        let response: AccountsResponse = self.get_json("/v2/accounts")?;
        Ok(response.accounts)
    }
}
