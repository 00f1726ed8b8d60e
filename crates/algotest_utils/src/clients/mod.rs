//! Network access: the algod and indexer facades plus their default
//! blocking HTTP implementations.
//!
//! The pipeline only ever talks to [`AlgodApi`] and [`IndexerApi`], so tests
//! can swap in the scripted stubs from [`crate::testing`].

mod algod;
mod indexer;

pub use algod::{AlgodApi, AlgodClient, NodeStatus, PendingTransaction, SuggestedParams};
pub use indexer::{
    AccountInfo, ApplicationInfo, AssetRecord, AssetRecordParams, IndexerApi, IndexerClient,
    TealKeyValue, TealValue,
};

use snafu::Snafu;

/// Transport-level failures from either client.
#[derive(Debug, Snafu)]
pub enum ClientError {
    #[snafu(display("Request failed: {message}"))]
    Transport { message: String },

    #[snafu(display("Service responded with status {status}: {message}"))]
    Api { status: u16, message: String },

    #[snafu(display("Could not decode response: {message}"))]
    Decode { message: String },

    #[snafu(display("Could not encode request: {message}"))]
    Encoding { message: String },
}

impl ClientError {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode {
            message: message.into(),
        }
    }

    /// Whether the failure is plausibly a query-tier lag artifact worth
    /// retrying: connection trouble, not-found-yet, throttling, or a 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport { .. } => true,
            ClientError::Api { status, .. } => {
                *status == 404 || *status == 429 || *status >= 500
            }
            _ => false,
        }
    }

    /// Whether the failure is a plain not-found response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport {
            message: err.to_string(),
        }
    }
}
