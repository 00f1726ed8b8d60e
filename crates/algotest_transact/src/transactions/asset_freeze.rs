//! Asset freeze transactions.

use crate::transactions::common::TransactionHeader;
use crate::utils::{is_false_opt, is_zero, is_zero_addr};
use crate::{Address, Transaction};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none};

/// Freezes or unfreezes one account's holding of an asset. Only the asset's
/// freeze address may send this.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Builder)]
#[builder(
    name = "AssetFreezeTransactionBuilder",
    setter(strip_option),
    build_fn(name = "build_fields", validate = "Self::validate")
)]
pub struct AssetFreezeTransactionFields {
    /// Common transaction header fields.
    #[serde(flatten)]
    pub header: TransactionHeader,

    /// The asset whose holding is being frozen or unfrozen.
    #[serde(rename = "faid")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub asset_id: u64,

    /// The account whose holding is affected.
    #[serde(rename = "fadd")]
    #[serde(skip_serializing_if = "is_zero_addr")]
    #[serde(default)]
    pub freeze_target: Address,

    /// The new freeze state.
    #[serde(rename = "afrz")]
    #[serde(skip_serializing_if = "is_false_opt")]
    #[serde(default)]
    #[builder(default)]
    pub frozen: Option<bool>,
}

impl AssetFreezeTransactionBuilder {
    fn validate(&self) -> Result<(), String> {
        if matches!(self.asset_id, Some(0)) {
            return Err("Asset ID must not be 0".into());
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Transaction, AssetFreezeTransactionBuilderError> {
        self.build_fields().map(Transaction::AssetFreeze)
    }
}
