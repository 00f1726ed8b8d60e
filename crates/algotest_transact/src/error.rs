//! Error types for the transaction wire model.
//!
//! Covers canonical msgpack encoding/decoding failures, malformed addresses,
//! and invalid transaction or multisignature input.

use snafu::Snafu;

/// Represents errors that can occur while building, encoding, or decoding
/// Algorand transactions and their signature envelopes.
#[derive(Debug, Snafu)]
pub enum TransactError {
    #[snafu(display("Error occurred during encoding: {source}"))]
    EncodingError { source: rmp_serde::encode::Error },

    #[snafu(display("Error occurred during decoding: {source}"))]
    DecodingError { source: rmp_serde::decode::Error },

    #[snafu(display("Error occurred during msgpack writing: {source}"))]
    MsgpackWriteError { source: rmpv::encode::Error },

    #[snafu(display("{message}"))]
    InputError { message: String },

    #[snafu(display("{message}"))]
    InvalidAddress { message: String },

    #[snafu(display("Invalid multisig signature: {message}"))]
    InvalidMultisigSignature { message: String },
}

impl TransactError {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        TransactError::InputError {
            message: message.into(),
        }
    }
}

impl From<rmp_serde::encode::Error> for TransactError {
    fn from(source: rmp_serde::encode::Error) -> Self {
        TransactError::EncodingError { source }
    }
}

impl From<rmp_serde::decode::Error> for TransactError {
    fn from(source: rmp_serde::decode::Error) -> Self {
        TransactError::DecodingError { source }
    }
}

impl From<rmpv::encode::Error> for TransactError {
    fn from(source: rmpv::encode::Error) -> Self {
        TransactError::MsgpackWriteError { source }
    }
}
