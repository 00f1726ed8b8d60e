//! The payment operation.

use crate::accounts::AlgoAccount;
use crate::clients::AlgodApi;
use crate::error::TxnError;
use crate::transactions::common::{finalize_fee, header_for, require_params, CommonParams};
use crate::transactions::composites::TxnElement;
use crate::transactions::pipeline::{run_transaction, TxnOptions, TxnOutcome};
use algotest_transact::PaymentTransactionBuilder;

/// Optional arguments of [`payment_transaction`].
#[derive(Debug, Default, Clone)]
pub struct PaymentExtras {
    pub common: CommonParams,
    /// Close the sender and move its remaining balance here.
    pub close_remainder_to: Option<AlgoAccount>,
}

/// Sends `amount` microALGO from `sender` to `receiver`.
pub fn payment_transaction(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    receiver: &AlgoAccount,
    amount: u64,
    extras: &PaymentExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    let options = TxnOptions::default();
    let explicit_params = extras.common.params.clone();
    let sender = sender.clone();
    let receiver = receiver.address().clone();
    let extras = extras.clone();

    run_transaction(
        algod,
        "payment_transaction",
        &options,
        explicit_params,
        move |params| {
            let params = require_params(params)?;
            let header = header_for(&sender, &params, &extras.common)?;

            let mut builder = PaymentTransactionBuilder::default();
            builder.header(header).receiver(receiver).amount(amount);
            if let Some(close_to) = &extras.close_remainder_to {
                builder.close_remainder_to(close_to.address().clone());
            }
            let txn = builder
                .build()
                .map_err(|e| TxnError::construction(e.to_string()))?;

            Ok(TxnElement::plain(sender, finalize_fee(txn, &params)?))
        },
    )
}
