//! Transaction variants, signed envelopes, fee assignment, and grouping.
//!
//! [`Transaction`] is the closed set of payload types this crate can build
//! and encode. [`SignedTransaction`] is the submittable envelope, pairing a
//! payload with exactly one authorization: an Ed25519 signature, an
//! accumulated multisignature, or a logic signature.

mod application_call;
mod asset_config;
mod asset_freeze;
mod asset_transfer;
mod common;
mod payment;

pub use application_call::{
    ApplicationCallTransactionBuilder, ApplicationCallTransactionFields, OnApplicationComplete,
    StateSchema,
};
pub use asset_config::{
    AssetConfigTransactionBuilder, AssetConfigTransactionFields, AssetParams, AssetParamsBuilder,
};
pub use asset_freeze::{AssetFreezeTransactionBuilder, AssetFreezeTransactionFields};
pub use asset_transfer::{AssetTransferTransactionBuilder, AssetTransferTransactionFields};
pub use common::{TransactionHeader, TransactionHeaderBuilder};
pub use payment::{PaymentTransactionBuilder, PaymentTransactionFields};

use crate::constants::{
    HASH_BYTES_LENGTH, SIGNATURE_BYTE_LENGTH, SIGNATURE_ENCODING_INCR,
};
use crate::error::TransactError;
use crate::logicsig::LogicSignature;
use crate::multisig::MultisigSignature;
use crate::traits::{AlgorandMsgpack, EstimateTransactionSize, TransactionId, Transactions};
use crate::utils::{compute_group, is_zero_addr_opt};
use crate::Address;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, Bytes};

/// The transaction payload types supported by this crate.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(tag = "type")]
pub enum Transaction {
    #[serde(rename = "pay")]
    Payment(PaymentTransactionFields),

    #[serde(rename = "axfer")]
    AssetTransfer(AssetTransferTransactionFields),

    #[serde(rename = "acfg")]
    AssetConfig(AssetConfigTransactionFields),

    #[serde(rename = "afrz")]
    AssetFreeze(AssetFreezeTransactionFields),

    #[serde(rename = "appl")]
    ApplicationCall(ApplicationCallTransactionFields),
}

/// Inputs to [`Transaction::assign_fee`].
pub struct FeeParams {
    pub fee_per_byte: u64,
    pub min_fee: u64,
    pub extra_fee: Option<u64>,
    pub max_fee: Option<u64>,
}

impl Transaction {
    pub fn header(&self) -> &TransactionHeader {
        match self {
            Transaction::Payment(p) => &p.header,
            Transaction::AssetTransfer(a) => &a.header,
            Transaction::AssetConfig(a) => &a.header,
            Transaction::AssetFreeze(a) => &a.header,
            Transaction::ApplicationCall(a) => &a.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut TransactionHeader {
        match self {
            Transaction::Payment(p) => &mut p.header,
            Transaction::AssetTransfer(a) => &mut a.header,
            Transaction::AssetConfig(a) => &mut a.header,
            Transaction::AssetFreeze(a) => &mut a.header,
            Transaction::ApplicationCall(a) => &mut a.header,
        }
    }

    /// Returns a copy of the transaction with its fee set from the given
    /// parameters: size-proportional when `fee_per_byte` is nonzero, floored
    /// at `min_fee`, raised by `extra_fee`, and rejected above `max_fee`.
    pub fn assign_fee(&self, request: FeeParams) -> Result<Transaction, TransactError> {
        let mut tx = self.clone();
        let mut calculated_fee: u64 = 0;

        if request.fee_per_byte > 0 {
            let estimated_size = tx.estimate_size()?;
            calculated_fee = request.fee_per_byte * estimated_size as u64;
        }

        if calculated_fee < request.min_fee {
            calculated_fee = request.min_fee;
        }

        if let Some(extra_fee) = request.extra_fee {
            calculated_fee += extra_fee;
        }

        if let Some(max_fee) = request.max_fee {
            if calculated_fee > max_fee {
                return Err(TransactError::input(format!(
                    "Transaction fee {} µALGO is greater than max fee {} µALGO",
                    calculated_fee, max_fee
                )));
            }
        }

        tx.header_mut().fee = Some(calculated_fee);
        Ok(tx)
    }
}

impl AlgorandMsgpack for Transaction {
    const PREFIX: &'static [u8] = b"TX";
}

impl TransactionId for Transaction {}

impl EstimateTransactionSize for Transaction {
    fn estimate_size(&self) -> Result<usize, TransactError> {
        Ok(self.encode_raw()?.len() + SIGNATURE_ENCODING_INCR)
    }
}

/// A transaction paired with its authorization, ready for submission.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct SignedTransaction {
    /// The signed payload.
    #[serde(rename = "txn")]
    pub transaction: Transaction,

    /// Ed25519 signature of a keypair sender.
    #[serde(rename = "sig")]
    #[serde_as(as = "Option<Bytes>")]
    #[serde(default)]
    pub signature: Option<[u8; SIGNATURE_BYTE_LENGTH]>,

    /// Accumulated multisignature of a multisig sender.
    #[serde(rename = "msig")]
    #[serde(default)]
    pub multisignature: Option<MultisigSignature>,

    /// Logic signature of a program-controlled sender.
    #[serde(rename = "lsig")]
    #[serde(default)]
    pub logic_signature: Option<LogicSignature>,

    /// Authorizing address when the sender has been rekeyed.
    #[serde(rename = "sgnr")]
    #[serde(skip_serializing_if = "is_zero_addr_opt")]
    #[serde(default)]
    pub auth_address: Option<Address>,
}

impl SignedTransaction {
    /// An envelope carrying a plain Ed25519 signature.
    pub fn from_signature(
        transaction: Transaction,
        signature: [u8; SIGNATURE_BYTE_LENGTH],
    ) -> Self {
        SignedTransaction {
            transaction,
            signature: Some(signature),
            multisignature: None,
            logic_signature: None,
            auth_address: None,
        }
    }

    /// An envelope authorized by an accumulated multisignature.
    pub fn from_multisignature(transaction: Transaction, msig: MultisigSignature) -> Self {
        SignedTransaction {
            transaction,
            signature: None,
            multisignature: Some(msig),
            logic_signature: None,
            auth_address: None,
        }
    }

    /// An envelope authorized by a logic signature.
    pub fn from_logic_signature(transaction: Transaction, lsig: LogicSignature) -> Self {
        SignedTransaction {
            transaction,
            signature: None,
            multisignature: None,
            logic_signature: Some(lsig),
            auth_address: None,
        }
    }
}

impl AlgorandMsgpack for SignedTransaction {
    // The inner transaction is internally tagged by its "type" field, which a
    // blanket map decode would lose track of. Pull the "txn" entry out and
    // decode it through Transaction::decode, then fill in the rest.
    fn decode(bytes: &[u8]) -> Result<Self, TransactError> {
        let value: rmpv::Value = rmp_serde::from_slice(bytes)?;

        match value {
            rmpv::Value::Map(ref entries) => {
                let txn_value = entries
                    .iter()
                    .find(|(k, _)| k.as_str() == Some("txn"))
                    .map(|(_, v)| v)
                    .ok_or_else(|| {
                        TransactError::input("signed transaction is missing the txn field")
                    })?;

                let mut txn_buf = Vec::new();
                rmpv::encode::write_value(&mut txn_buf, txn_value)?;

                Ok(SignedTransaction {
                    transaction: Transaction::decode(&txn_buf)?,
                    ..rmp_serde::from_slice(bytes)?
                })
            }
            other => Err(TransactError::input(format!(
                "expected signed transaction to be a map, but got: {:?}",
                other
            ))),
        }
    }
}

impl TransactionId for SignedTransaction {
    /// A signed envelope shares the id of the transaction it carries.
    fn id_raw(&self) -> Result<[u8; HASH_BYTES_LENGTH], TransactError> {
        self.transaction.id_raw()
    }
}

impl EstimateTransactionSize for SignedTransaction {
    fn estimate_size(&self) -> Result<usize, TransactError> {
        Ok(self.encode()?.len())
    }
}

impl Transactions for &[Transaction] {
    fn assign_group(self) -> Result<Vec<Transaction>, TransactError> {
        let group_id = compute_group(self)?;
        Ok(self
            .iter()
            .map(|tx| {
                let mut tx = tx.clone();
                tx.header_mut().group = Some(group_id);
                tx
            })
            .collect())
    }
}

impl Transactions for Vec<Transaction> {
    fn assign_group(self) -> Result<Vec<Transaction>, TransactError> {
        self.as_slice().assign_group()
    }
}
