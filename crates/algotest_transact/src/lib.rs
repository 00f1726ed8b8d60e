mod address;
pub mod constants;
mod error;
mod keypair_account;
mod logicsig;
pub mod multisig;
mod traits;
mod transactions;
mod utils;

// Re-export all the public items
pub use address::Address;
pub use constants::*;
pub use error::TransactError;
pub use keypair_account::KeyPairAccount;
pub use logicsig::LogicSignature;
pub use multisig::*;
pub use traits::{
    AlgorandMsgpack, EstimateTransactionSize, MsgPackEmpty, TransactionId, Transactions,
};
pub use transactions::{
    ApplicationCallTransactionBuilder, ApplicationCallTransactionFields,
    AssetConfigTransactionBuilder, AssetConfigTransactionFields, AssetFreezeTransactionBuilder,
    AssetFreezeTransactionFields, AssetParams, AssetParamsBuilder,
    AssetTransferTransactionBuilder, AssetTransferTransactionFields, FeeParams,
    OnApplicationComplete, PaymentTransactionBuilder, PaymentTransactionFields, SignedTransaction,
    StateSchema, Transaction, TransactionHeader, TransactionHeaderBuilder,
};
pub use utils::compute_group;

#[cfg(test)]
mod tests;

#[cfg(feature = "test_utils")]
pub mod test_utils;
