//! The transaction pipeline, its behavior switches, the composite payload
//! types, and the typed operations built on top of them.

mod application;
mod asset;
mod common;
mod composites;
mod payment;
mod pipeline;
mod switches;

pub use application::{
    call_app, clear_app, close_out_app, create_app, create_compiled_app, delete_app, opt_in_app,
    update_app, AppCallExtras, AppCreateExtras,
};
pub use asset::{
    close_out_asset, create_asset, destroy_asset, freeze_asset, opt_in_asset, transfer_asset,
    update_asset, AssetRoles, AssetSpec, AssetTransferExtras,
};
pub use common::CommonParams;
pub use composites::{
    group_transaction, multisig_transaction, smart_signature_transaction, GroupMember,
    GroupTransaction, LogicSigTransaction, MultisigTransaction, Signable, TxnElement,
};
pub use payment::{payment_transaction, PaymentExtras};
pub use pipeline::{
    run_transaction, TxnOptions, TxnOutcome, CONFIRMATION_ROUNDS, FLAT_FEE,
};
pub use switches::{TxnElemsScope, TxnIdScope};
