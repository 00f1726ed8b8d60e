//! The algod facade: fee parameters, submission, confirmation polling, and
//! TEAL compilation.

use super::ClientError;
use crate::config::ClientConfig;
use algotest_transact::{AlgorandMsgpack, Byte32, SignedTransaction};
use base64::{prelude::BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Ephemeral fee/validity fields the network expects on every transaction.
///
/// With `flat_fee` set, `fee` is the total fee in microALGO; otherwise it is
/// a per-byte rate floored at `min_fee`.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestedParams {
    pub fee: u64,
    pub min_fee: u64,
    pub flat_fee: bool,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: Byte32,
}

/// The pending/confirmed record algod keeps per transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PendingTransaction {
    /// Non-empty when the pool kicked the transaction out.
    pub pool_error: String,
    /// The round the transaction was confirmed in, once it has been.
    pub confirmed_round: Option<u64>,
    /// Id of the application created by this transaction, if any.
    pub application_index: Option<u64>,
    /// Id of the asset created by this transaction, if any.
    pub asset_index: Option<u64>,
    /// The signed transaction body as algod reports it.
    pub txn: Option<serde_json::Value>,
}

impl PendingTransaction {
    /// Reads a numeric field out of the embedded transaction body, e.g.
    /// `apid` for the application an app call addressed.
    pub fn txn_field_u64(&self, key: &str) -> Option<u64> {
        self.txn
            .as_ref()?
            .pointer(&format!("/txn/{key}"))?
            .as_u64()
    }
}

/// Node sync status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeStatus {
    pub last_round: u64,
}

/// The narrow interface the pipeline consumes from an Algorand node.
pub trait AlgodApi {
    /// Fetches suggested fee/validity parameters.
    fn suggested_params(&self) -> Result<SuggestedParams, ClientError>;

    /// Submits one or more signed transactions as a single payload and
    /// returns the id of the first.
    fn send_transactions(&self, signed: &[SignedTransaction]) -> Result<String, ClientError>;

    /// Looks up the pending/confirmed record of a transaction.
    fn pending_transaction_info(&self, txn_id: &str) -> Result<PendingTransaction, ClientError>;

    /// Current node status.
    fn status(&self) -> Result<NodeStatus, ClientError>;

    /// Blocks until the node has seen a block after the given round.
    fn status_after_round(&self, round: u64) -> Result<NodeStatus, ClientError>;

    /// Compiles TEAL source to program bytecode.
    fn compile_teal(&self, source: &str) -> Result<Vec<u8>, ClientError>;
}

/// Blocking REST client for an algod node.
pub struct AlgodClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl AlgodClient {
    pub fn new(address: &str, token: &str) -> Self {
        AlgodClient {
            http: reqwest::blocking::Client::new(),
            base_url: address.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.algod_address, &config.algod_token)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("X-Algo-API-Token", &self.token)
            .send()?;
        Self::read_json(response)
    }

    fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("X-Algo-API-Token", &self.token)
            .header("Content-Type", content_type)
            .body(body)
            .send()?;
        Self::read_json(response)
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, ClientError> {
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

// Raw response of GET /v2/transactions/params.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TransactionParamsResponse {
    fee: u64,
    min_fee: u64,
    genesis_id: String,
    genesis_hash: String,
    last_round: u64,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Debug, Deserialize)]
struct CompileResponse {
    result: String,
}

// Validity window granted to transactions built from suggested params.
const DEFAULT_VALIDITY_WINDOW: u64 = 1000;

impl AlgodApi for AlgodClient {
    fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
        let raw: TransactionParamsResponse = self.get_json("/v2/transactions/params")?;

        let genesis_hash: Byte32 = BASE64_STANDARD
            .decode(&raw.genesis_hash)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| ClientError::decode("genesis hash is not 32 base64 bytes"))?;

        Ok(SuggestedParams {
            fee: raw.fee,
            min_fee: raw.min_fee,
            flat_fee: false,
            first_valid: raw.last_round,
            last_valid: raw.last_round + DEFAULT_VALIDITY_WINDOW,
            genesis_id: raw.genesis_id,
            genesis_hash,
        })
    }

    fn send_transactions(&self, signed: &[SignedTransaction]) -> Result<String, ClientError> {
        let mut body = Vec::new();
        for txn in signed {
            let encoded = txn.encode().map_err(|e| ClientError::Encoding {
                message: e.to_string(),
            })?;
            body.extend_from_slice(&encoded);
        }

        let response: SubmitResponse =
            self.post_json("/v2/transactions", body, "application/x-binary")?;
        Ok(response.tx_id)
    }

    fn pending_transaction_info(&self, txn_id: &str) -> Result<PendingTransaction, ClientError> {
        self.get_json(&format!("/v2/transactions/pending/{txn_id}"))
    }

    fn status(&self) -> Result<NodeStatus, ClientError> {
        self.get_json("/v2/status")
    }

    fn status_after_round(&self, round: u64) -> Result<NodeStatus, ClientError> {
        self.get_json(&format!("/v2/status/wait-for-block-after/{round}"))
    }

    fn compile_teal(&self, source: &str) -> Result<Vec<u8>, ClientError> {
        let response: CompileResponse = self.post_json(
            "/v2/teal/compile",
            source.as_bytes().to_vec(),
            "text/plain",
        )?;
        BASE64_STANDARD
            .decode(&response.result)
            .map_err(|e| ClientError::decode(e.to_string()))
    }
}
