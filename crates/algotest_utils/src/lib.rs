pub mod accounts;
pub mod clients;
pub mod config;
mod error;
pub mod queries;
pub mod retry;
pub mod testing;
pub mod transactions;

pub use accounts::{AlgoAccount, MultisigAccount};
pub use clients::{
    AccountInfo, AlgodApi, AlgodClient, ApplicationInfo, AssetRecord, ClientError, IndexerApi,
    IndexerClient, NodeStatus, PendingTransaction, SuggestedParams,
};
pub use config::ClientConfig;
pub use error::TxnError;
pub use queries::{
    account_balance, application_global_state, asset_info, transaction_info, StateValue,
};
pub use retry::{with_retry, RetryPolicy};
pub use testing::{AppGuard, AssetGuard, DeployedApp, DeployedAsset, TestFixture};
pub use transactions::{
    call_app, clear_app, close_out_app, close_out_asset, create_app, create_asset,
    create_compiled_app, delete_app, destroy_asset, freeze_asset, group_transaction,
    multisig_transaction, opt_in_app, opt_in_asset, payment_transaction,
    smart_signature_transaction, transfer_asset, update_app, update_asset, AppCallExtras,
    AppCreateExtras, AssetRoles, AssetSpec, AssetTransferExtras, CommonParams, GroupTransaction,
    LogicSigTransaction, MultisigTransaction, PaymentExtras, Signable, TxnElement, TxnElemsScope,
    TxnIdScope, TxnOptions, TxnOutcome, CONFIRMATION_ROUNDS, FLAT_FEE,
};
