//! The error taxonomy of the transaction pipeline.
//!
//! Every failure surfaces to the caller as one of these typed variants;
//! nothing is silently suppressed. The only internal retry loop is the
//! query-tier lag handling in [`crate::retry`], which is invisible on
//! success and surfaces as [`TxnError::QueryTimeout`] when exhausted.

use crate::clients::ClientError;
use algotest_transact::TransactError;
use snafu::Snafu;
use std::time::Duration;

#[derive(Debug, Snafu)]
pub enum TxnError {
    /// The builder could not produce a valid transaction payload.
    #[snafu(display("Failed to construct transaction: {message}"))]
    Construction { message: String },

    /// A credential was missing or the signing operation rejected the payload.
    #[snafu(display("Failed to sign transaction: {message}"))]
    Signing { message: String },

    /// The network explicitly rejected the transaction.
    #[snafu(display("Transaction {txn_id} was rejected; pool error: {reason}"))]
    PoolRejection { txn_id: String, reason: String },

    /// No confirmation arrived within the round budget.
    #[snafu(display("Transaction {txn_id} unconfirmed after {rounds} rounds"))]
    ConfirmationTimeout { txn_id: String, rounds: u32 },

    /// A read query kept failing past its configured deadline.
    #[snafu(display("Query gave no result within {}s: {message}", timeout.as_secs()))]
    QueryTimeout { timeout: Duration, message: String },

    /// Required setup could not be located; fatal to the calling test.
    #[snafu(display("{message}"))]
    Configuration { message: String },

    /// A network client call failed outright.
    #[snafu(display("Client error: {source}"))]
    Client { source: ClientError },

    /// A wire-model operation failed.
    #[snafu(display("Transact error: {source}"))]
    Transact { source: TransactError },
}

impl TxnError {
    pub(crate) fn construction(message: impl Into<String>) -> Self {
        TxnError::Construction {
            message: message.into(),
        }
    }

    pub(crate) fn signing(message: impl Into<String>) -> Self {
        TxnError::Signing {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        TxnError::Configuration {
            message: message.into(),
        }
    }
}

impl From<ClientError> for TxnError {
    fn from(source: ClientError) -> Self {
        TxnError::Client { source }
    }
}

impl From<TransactError> for TxnError {
    fn from(source: TransactError) -> Self {
        TxnError::Transact { source }
    }
}
