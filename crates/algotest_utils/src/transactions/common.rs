//! Shared optional arguments and header assembly for the typed operations.

use crate::accounts::AlgoAccount;
use crate::clients::SuggestedParams;
use crate::error::TxnError;
use algotest_transact::{
    Byte32, FeeParams, Transaction, TransactionHeader, TransactionHeaderBuilder,
};

/// Optional arguments every operation accepts.
///
/// `params` bypasses suggested-parameter injection; the address-valued
/// options default to the null account, so the header builder always sees a
/// concrete (possibly zero, hence omitted) address.
#[derive(Debug, Default, Clone)]
pub struct CommonParams {
    /// Explicit fee/validity parameters; fetched from the node when absent.
    pub params: Option<SuggestedParams>,
    /// Arbitrary note bytes attached to the transaction.
    pub note: Option<Vec<u8>>,
    /// Mutual-exclusion lease.
    pub lease: Option<Byte32>,
    /// Account to hand the sender's authorization over to.
    pub rekey_to: Option<AlgoAccount>,
}

impl CommonParams {
    pub fn with_note(note: impl Into<Vec<u8>>) -> Self {
        CommonParams {
            note: Some(note.into()),
            ..Default::default()
        }
    }
}

/// The suggested parameters the builder was (or was not) given; absence is
/// a construction error for operations that need them.
pub(crate) fn require_params(
    params: Option<SuggestedParams>,
) -> Result<SuggestedParams, TxnError> {
    params.ok_or_else(|| {
        TxnError::construction(
            "no suggested parameters available; supply params explicitly when injection is off",
        )
    })
}

/// Assembles the transaction header shared by every operation.
pub(crate) fn header_for(
    sender: &AlgoAccount,
    params: &SuggestedParams,
    common: &CommonParams,
) -> Result<TransactionHeader, TxnError> {
    let mut builder = TransactionHeaderBuilder::default();
    builder
        .sender(sender.address().clone())
        .first_valid(params.first_valid)
        .last_valid(params.last_valid)
        .genesis_id(params.genesis_id.clone())
        .genesis_hash(params.genesis_hash);

    if params.flat_fee {
        builder.fee(params.fee);
    }
    if let Some(note) = &common.note {
        builder.note(note.clone());
    }
    if let Some(lease) = common.lease {
        builder.lease(lease);
    }
    if let Some(rekey_to) = &common.rekey_to {
        builder.rekey_to(rekey_to.address().clone());
    }

    builder
        .build()
        .map_err(|e| TxnError::construction(e.to_string()))
}

/// Settles the fee on a built payload: flat fees were already written into
/// the header; per-byte fees are assigned from the encoded size.
pub(crate) fn finalize_fee(
    txn: Transaction,
    params: &SuggestedParams,
) -> Result<Transaction, TxnError> {
    if params.flat_fee {
        return Ok(txn);
    }

    txn.assign_fee(FeeParams {
        fee_per_byte: params.fee,
        min_fee: params.min_fee,
        extra_fee: None,
        max_fee: None,
    })
    .map_err(|e| TxnError::construction(e.to_string()))
}
