//! Read-only state queries, each retried against query-tier lag.

use crate::clients::{AssetRecord, ClientError, IndexerApi, TealKeyValue};
use crate::error::TxnError;
use crate::retry::{with_retry, RetryPolicy};
use algotest_transact::{Address, PUBLIC_KEY_BYTE_LENGTH};
use base64::{prelude::BASE64_STANDARD, Engine};
use std::collections::BTreeMap;

/// A decoded TEAL state value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    Uint(u64),
    Bytes(Vec<u8>),
}

impl StateValue {
    /// Reinterprets a 32-byte value as an address, the way contracts store
    /// account references in global state.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            StateValue::Bytes(bytes) if bytes.len() == PUBLIC_KEY_BYTE_LENGTH => {
                let mut raw = [0u8; PUBLIC_KEY_BYTE_LENGTH];
                raw.copy_from_slice(bytes);
                Some(Address(raw))
            }
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            StateValue::Uint(value) => Some(*value),
            _ => None,
        }
    }
}

/// Balance of an account, in microALGO.
pub fn account_balance(
    indexer: &dyn IndexerApi,
    address: &Address,
    policy: &RetryPolicy,
) -> Result<u64, TxnError> {
    let account = with_retry(policy, || indexer.account_info(address))?;
    Ok(account.amount)
}

/// The decoded global state of an application, keyed by raw key bytes.
pub fn application_global_state(
    indexer: &dyn IndexerApi,
    app_id: u64,
    policy: &RetryPolicy,
) -> Result<BTreeMap<Vec<u8>, StateValue>, TxnError> {
    let app = with_retry(policy, || indexer.application_info(app_id))?;
    decode_global_state(app.params.global_state.as_deref().unwrap_or_default())
}

/// The indexer's record of an asset.
pub fn asset_info(
    indexer: &dyn IndexerApi,
    asset_id: u64,
    policy: &RetryPolicy,
) -> Result<AssetRecord, TxnError> {
    with_retry(policy, || indexer.asset_info(asset_id))
}

/// The indexer's record of a confirmed transaction.
pub fn transaction_info(
    indexer: &dyn IndexerApi,
    txn_id: &str,
    policy: &RetryPolicy,
) -> Result<serde_json::Value, TxnError> {
    with_retry(policy, || indexer.transaction_info(txn_id))
}

fn decode_global_state(
    entries: &[TealKeyValue],
) -> Result<BTreeMap<Vec<u8>, StateValue>, TxnError> {
    let mut state = BTreeMap::new();

    for entry in entries {
        let key = BASE64_STANDARD
            .decode(&entry.key)
            .map_err(|e| decode_error(format!("global state key is not valid base64: {e}")))?;

        let value = match entry.value.value_type {
            1 => StateValue::Bytes(BASE64_STANDARD.decode(&entry.value.bytes).map_err(|e| {
                decode_error(format!("global state value is not valid base64: {e}"))
            })?),
            2 => StateValue::Uint(entry.value.uint),
            other => {
                return Err(decode_error(format!(
                    "unknown global state value type {other}"
                )))
            }
        };

        state.insert(key, value);
    }

    Ok(state)
}

fn decode_error(message: String) -> TxnError {
    TxnError::Client {
        source: ClientError::Decode { message },
    }
}
