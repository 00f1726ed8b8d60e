//! Application operations: deploy, update, delete, and the four ways of
//! calling a smart contract.

use crate::accounts::AlgoAccount;
use crate::clients::AlgodApi;
use crate::error::TxnError;
use crate::transactions::common::{finalize_fee, header_for, require_params, CommonParams};
use crate::transactions::composites::TxnElement;
use crate::transactions::pipeline::{run_transaction, TxnOptions, TxnOutcome};
use algotest_transact::{
    ApplicationCallTransactionBuilder, MsgPackEmpty, OnApplicationComplete, StateSchema,
};

/// Optional arguments shared by the application operations.
#[derive(Debug, Default, Clone)]
pub struct AppCallExtras {
    pub common: CommonParams,
    /// Arguments handed to the program.
    pub app_args: Vec<Vec<u8>>,
    /// Accounts whose state the program may read.
    pub accounts: Vec<AlgoAccount>,
    /// Other applications the program may read.
    pub foreign_apps: Vec<u64>,
    /// Assets the program may read.
    pub foreign_assets: Vec<u64>,
}

/// Optional arguments of the two deployment operations.
#[derive(Debug, Default, Clone)]
pub struct AppCreateExtras {
    pub call: AppCallExtras,
    /// Additional program pages for large programs.
    pub extra_pages: u32,
}

/// Compiles the TEAL sources and deploys the application, returning its id.
pub fn create_app(
    algod: &dyn AlgodApi,
    owner: &AlgoAccount,
    approval_source: &str,
    clear_source: &str,
    global_schema: StateSchema,
    local_schema: StateSchema,
    extras: &AppCreateExtras,
) -> Result<TxnOutcome<u64>, TxnError> {
    let approval = algod.compile_teal(approval_source)?;
    let clear = algod.compile_teal(clear_source)?;
    create_compiled_app(
        algod,
        owner,
        approval,
        clear,
        global_schema,
        local_schema,
        extras,
    )
}

/// Deploys an already-compiled application, returning its id.
pub fn create_compiled_app(
    algod: &dyn AlgodApi,
    owner: &AlgoAccount,
    approval_compiled: Vec<u8>,
    clear_compiled: Vec<u8>,
    global_schema: StateSchema,
    local_schema: StateSchema,
    extras: &AppCreateExtras,
) -> Result<TxnOutcome<u64>, TxnError> {
    let options = TxnOptions {
        format_finish: Some(|info| {
            format!("app-id={}", info.application_index.unwrap_or_default())
        }),
        extract: Some(|info| info.application_index.unwrap_or_default()),
        ..Default::default()
    };
    let explicit_params = extras.call.common.params.clone();
    let owner = owner.clone();
    let extras = extras.clone();

    run_transaction(
        algod,
        "create_compiled_app",
        &options,
        explicit_params,
        move |params| {
            let params = require_params(params)?;
            let header = header_for(&owner, &params, &extras.call.common)?;

            let mut builder = ApplicationCallTransactionBuilder::default();
            builder
                .header(header)
                .approval_program(approval_compiled)
                .clear_state_program(clear_compiled);
            // Empty schemas are omitted from the wire form; keep the built
            // payload consistent with what would decode back.
            if !global_schema.is_empty() {
                builder.global_schema(global_schema);
            }
            if !local_schema.is_empty() {
                builder.local_schema(local_schema);
            }
            if extras.extra_pages > 0 {
                builder.extra_pages(extras.extra_pages);
            }
            apply_references(&mut builder, &extras.call);

            let txn = builder
                .build()
                .map_err(|e| TxnError::construction(e.to_string()))?;
            Ok(TxnElement::plain(owner, finalize_fee(txn, &params)?))
        },
    )
}

/// Replaces a deployed application's programs.
pub fn update_app(
    algod: &dyn AlgodApi,
    owner: &AlgoAccount,
    app_id: u64,
    approval_compiled: Vec<u8>,
    clear_compiled: Vec<u8>,
    extras: &AppCallExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    app_call_with(
        algod,
        "update_app",
        owner,
        app_id,
        OnApplicationComplete::UpdateApplication,
        Some((approval_compiled, clear_compiled)),
        extras,
    )
}

/// Deletes a deployed application.
pub fn delete_app(
    algod: &dyn AlgodApi,
    owner: &AlgoAccount,
    app_id: u64,
    extras: &AppCallExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    app_call_with(
        algod,
        "delete_app",
        owner,
        app_id,
        OnApplicationComplete::DeleteApplication,
        None,
        extras,
    )
}

/// Opts the sender in to an application.
pub fn opt_in_app(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    app_id: u64,
    extras: &AppCallExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    app_call_with(
        algod,
        "opt_in_app",
        sender,
        app_id,
        OnApplicationComplete::OptIn,
        None,
        extras,
    )
}

/// Closes the sender out of an application through its approval program.
pub fn close_out_app(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    app_id: u64,
    extras: &AppCallExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    app_call_with(
        algod,
        "close_out_app",
        sender,
        app_id,
        OnApplicationComplete::CloseOut,
        None,
        extras,
    )
}

/// Clears the sender's local state unconditionally.
pub fn clear_app(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    app_id: u64,
    extras: &AppCallExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    app_call_with(
        algod,
        "clear_app",
        sender,
        app_id,
        OnApplicationComplete::ClearState,
        None,
        extras,
    )
}

/// Performs a plain application call.
pub fn call_app(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    app_id: u64,
    extras: &AppCallExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    app_call_with(
        algod,
        "call_app",
        sender,
        app_id,
        OnApplicationComplete::NoOp,
        None,
        extras,
    )
}

fn app_call_with(
    algod: &dyn AlgodApi,
    op_name: &'static str,
    sender: &AlgoAccount,
    app_id: u64,
    on_complete: OnApplicationComplete,
    programs: Option<(Vec<u8>, Vec<u8>)>,
    extras: &AppCallExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    let options = TxnOptions {
        format_finish: Some(|info| {
            format!("app-id={}", info.txn_field_u64("apid").unwrap_or_default())
        }),
        ..Default::default()
    };
    let explicit_params = extras.common.params.clone();
    let sender = sender.clone();
    let extras = extras.clone();

    run_transaction(algod, op_name, &options, explicit_params, move |params| {
        let params = require_params(params)?;
        let header = header_for(&sender, &params, &extras.common)?;

        let mut builder = ApplicationCallTransactionBuilder::default();
        builder.header(header).app_id(app_id).on_complete(on_complete);
        if let Some((approval, clear)) = programs {
            builder.approval_program(approval).clear_state_program(clear);
        }
        apply_references(&mut builder, &extras);

        let txn = builder
            .build()
            .map_err(|e| TxnError::construction(e.to_string()))?;
        Ok(TxnElement::plain(sender, finalize_fee(txn, &params)?))
    })
}

fn apply_references(builder: &mut ApplicationCallTransactionBuilder, extras: &AppCallExtras) {
    if !extras.app_args.is_empty() {
        builder.args(extras.app_args.clone());
    }
    if !extras.accounts.is_empty() {
        builder.account_references(
            extras
                .accounts
                .iter()
                .map(|account| account.address().clone())
                .collect(),
        );
    }
    if !extras.foreign_apps.is_empty() {
        builder.app_references(extras.foreign_apps.clone());
    }
    if !extras.foreign_assets.is_empty() {
        builder.asset_references(extras.foreign_assets.clone());
    }
}
