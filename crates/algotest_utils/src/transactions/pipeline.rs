//! The transaction lifecycle pipeline.
//!
//! Every typed operation is a builder closure handed to [`run_transaction`]
//! together with a declarative [`TxnOptions`]. The pipeline uniformly
//! handles switch resolution, progress logging, suggested-parameter
//! injection, construction, the defer-send escape hatch, signing or
//! defer-sign pass-through, submission, the bounded confirmation wait, and
//! result shaping, so no operation re-implements any of it.

use crate::clients::{AlgodApi, PendingTransaction, SuggestedParams};
use crate::error::TxnError;
use crate::transactions::composites::TxnElement;
use crate::transactions::switches;
use log::info;

/// Flat fee stamped onto injected suggested parameters, in microALGO.
pub const FLAT_FEE: u64 = 1000;

/// Rounds the confirmation wait is allowed to span before timing out.
pub const CONFIRMATION_ROUNDS: u32 = 4;

/// Declarative per-operation pipeline configuration.
///
/// The five switches are defaults; an active scope on the calling thread
/// (see [`crate::transactions::TxnElemsScope`] and
/// [`crate::transactions::TxnIdScope`]) takes precedence.
pub struct TxnOptions<R> {
    /// Emit no progress lines.
    pub no_log: bool,
    /// Never inject suggested parameters; the caller supplies them.
    pub no_params: bool,
    /// Stop after building and return the unsent element.
    pub no_send: bool,
    /// Submit the payload as-is; it is already fully signed.
    pub no_sign: bool,
    /// Report the submitted transaction id alongside the result.
    pub with_txn_id: bool,
    /// Renders the confirmed record into the finish log line.
    pub format_finish: Option<fn(&PendingTransaction) -> String>,
    /// Extracts the operation's typed result from the confirmed record.
    pub extract: Option<fn(&PendingTransaction) -> R>,
}

impl<R> Default for TxnOptions<R> {
    fn default() -> Self {
        TxnOptions {
            no_log: false,
            no_params: false,
            no_send: false,
            no_sign: false,
            with_txn_id: false,
            format_finish: None,
            extract: None,
        }
    }
}

/// What a pipeline invocation produced.
#[derive(Debug)]
pub enum TxnOutcome<R> {
    /// Defer-send was active: the unsubmitted (signer, payload) element.
    Unsent(TxnElement),
    /// The confirmed operation's typed result.
    Confirmed(R),
    /// The confirmed result together with the submitted transaction id.
    ConfirmedWithId { txn_id: String, result: R },
}

impl<R> TxnOutcome<R> {
    /// The unsent element, failing when the operation was actually sent.
    pub fn into_element(self) -> Result<TxnElement, TxnError> {
        match self {
            TxnOutcome::Unsent(element) => Ok(element),
            _ => Err(TxnError::construction(
                "operation was submitted; enter a TxnElemsScope to collect unsent elements",
            )),
        }
    }

    /// The typed result, failing when the operation was deferred.
    pub fn into_result(self) -> Result<R, TxnError> {
        match self {
            TxnOutcome::Confirmed(result) => Ok(result),
            TxnOutcome::ConfirmedWithId { result, .. } => Ok(result),
            TxnOutcome::Unsent(_) => Err(TxnError::construction(
                "operation was deferred and holds no result",
            )),
        }
    }

    /// The submitted transaction id, when one was requested.
    pub fn txn_id(&self) -> Option<&str> {
        match self {
            TxnOutcome::ConfirmedWithId { txn_id, .. } => Some(txn_id),
            _ => None,
        }
    }
}

/// Runs one operation through the full lifecycle.
///
/// `build` maps the (possibly injected) suggested parameters to an unsent
/// (signer, payload) element; everything around it is handled here.
pub fn run_transaction<R, B>(
    algod: &dyn AlgodApi,
    op_name: &str,
    options: &TxnOptions<R>,
    explicit_params: Option<SuggestedParams>,
    build: B,
) -> Result<TxnOutcome<R>, TxnError>
where
    R: Default,
    B: FnOnce(Option<SuggestedParams>) -> Result<TxnElement, TxnError>,
{
    // An active scope on this thread wins over the operation's defaults.
    let active = switches::overrides();
    let no_log = active.no_log.unwrap_or(options.no_log);
    let no_params = active.no_params.unwrap_or(options.no_params);
    let no_send = active.no_send.unwrap_or(options.no_send);
    let no_sign = active.no_sign.unwrap_or(options.no_sign);
    let with_txn_id = active.with_txn_id.unwrap_or(options.with_txn_id);

    if !no_log {
        info!("Running {op_name}");
    }

    let params = match explicit_params {
        Some(params) => Some(params),
        None if !no_params => Some(flat_fee_params(algod)?),
        None => None,
    };

    let element = build(params).map_err(|e| match e {
        TxnError::Construction { .. } => e,
        other => TxnError::Construction {
            message: other.to_string(),
        },
    })?;

    if no_send {
        return Ok(TxnOutcome::Unsent(element));
    }

    let submittable = if no_sign {
        element.txn.presigned()?
    } else {
        element.txn.sign(&element.signer)?
    };

    let txn_id = algod.send_transactions(&submittable)?;
    wait_for_confirmation(algod, &txn_id, CONFIRMATION_ROUNDS)?;

    let info = algod.pending_transaction_info(&txn_id)?;
    if !no_log {
        match options.format_finish {
            Some(format) => info!("Finished {op_name} with: {}", format(&info)),
            None => info!("Finished {op_name}"),
        }
    }

    let result = match options.extract {
        Some(extract) => extract(&info),
        None => R::default(),
    };

    if with_txn_id {
        Ok(TxnOutcome::ConfirmedWithId { txn_id, result })
    } else {
        Ok(TxnOutcome::Confirmed(result))
    }
}

/// Suggested parameters with the fee pinned to the fixed flat fee.
fn flat_fee_params(algod: &dyn AlgodApi) -> Result<SuggestedParams, TxnError> {
    let mut params = algod.suggested_params()?;
    params.flat_fee = true;
    params.fee = FLAT_FEE;
    Ok(params)
}

/// Polls for confirmation once per round until the payload confirms, the
/// pool rejects it, or the round budget runs out.
fn wait_for_confirmation(
    algod: &dyn AlgodApi,
    txn_id: &str,
    max_rounds: u32,
) -> Result<PendingTransaction, TxnError> {
    let status = algod.status()?;
    let start_round = status.last_round + 1;
    let mut current_round = start_round;

    while current_round < start_round + max_rounds as u64 {
        match algod.pending_transaction_info(txn_id) {
            Ok(info) => {
                if !info.pool_error.is_empty() {
                    return Err(TxnError::PoolRejection {
                        txn_id: txn_id.to_string(),
                        reason: info.pool_error,
                    });
                }
                if info.confirmed_round.is_some() {
                    return Ok(info);
                }
            }
            // The pool may simply not know the id yet; keep waiting.
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(TxnError::Client { source: err }),
        }

        let _ = algod.status_after_round(current_round);
        current_round += 1;
    }

    Err(TxnError::ConfirmationTimeout {
        txn_id: txn_id.to_string(),
        rounds: max_rounds,
    })
}
