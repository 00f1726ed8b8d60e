//! Asset configuration transactions: creation, reconfiguration, and
//! destruction of Algorand Standard Assets.
//!
//! The three operations share one wire shape: a zero `caid` with params
//! creates a new asset, a nonzero `caid` with params rewrites the mutable
//! role addresses, and a nonzero `caid` without params destroys the asset.

use crate::traits::MsgPackEmpty;
use crate::transactions::common::TransactionHeader;
use crate::utils::{
    is_empty_bytes32_opt, is_empty_string_opt, is_empty_struct_opt, is_false_opt, is_zero,
    is_zero_addr_opt,
};
use crate::{Address, Byte32, Transaction};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, Bytes};

/// The nested asset parameter block (`apar`).
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default, Builder)]
#[builder(name = "AssetParamsBuilder", setter(strip_option), default)]
pub struct AssetParams {
    /// Total number of base units minted. Immutable after creation.
    #[serde(rename = "t")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub total: u64,

    /// Degree of divisibility: base units per displayed unit is 10^decimals.
    #[serde(rename = "dc")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub decimals: u32,

    /// Whether holdings start out frozen.
    #[serde(rename = "df")]
    #[serde(skip_serializing_if = "is_false_opt")]
    #[serde(default)]
    pub default_frozen: Option<bool>,

    /// Name of one unit of the asset.
    #[serde(rename = "un")]
    #[serde(skip_serializing_if = "is_empty_string_opt")]
    #[serde(default)]
    pub unit_name: Option<String>,

    /// Full asset name.
    #[serde(rename = "an")]
    #[serde(skip_serializing_if = "is_empty_string_opt")]
    #[serde(default)]
    pub asset_name: Option<String>,

    /// URL with further asset information.
    #[serde(rename = "au")]
    #[serde(skip_serializing_if = "is_empty_string_opt")]
    #[serde(default)]
    pub url: Option<String>,

    /// 32-byte commitment to asset metadata.
    #[serde(rename = "am")]
    #[serde(skip_serializing_if = "is_empty_bytes32_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Bytes>")]
    pub metadata_hash: Option<Byte32>,

    /// Account allowed to reconfigure or destroy the asset.
    #[serde(rename = "m")]
    #[serde(skip_serializing_if = "is_zero_addr_opt")]
    #[serde(default)]
    pub manager: Option<Address>,

    /// Account holding non-circulating units.
    #[serde(rename = "r")]
    #[serde(skip_serializing_if = "is_zero_addr_opt")]
    #[serde(default)]
    pub reserve: Option<Address>,

    /// Account allowed to freeze and unfreeze holdings.
    #[serde(rename = "f")]
    #[serde(skip_serializing_if = "is_zero_addr_opt")]
    #[serde(default)]
    pub freeze: Option<Address>,

    /// Account allowed to move units out of any holding.
    #[serde(rename = "c")]
    #[serde(skip_serializing_if = "is_zero_addr_opt")]
    #[serde(default)]
    pub clawback: Option<Address>,
}

impl MsgPackEmpty for AssetParams {
    fn is_empty(&self) -> bool {
        self == &AssetParams::default()
    }
}

/// Creates, reconfigures, or destroys an asset, depending on which of
/// `asset_id` and `params` are present.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Builder)]
#[builder(
    name = "AssetConfigTransactionBuilder",
    setter(strip_option),
    build_fn(name = "build_fields", validate = "Self::validate")
)]
pub struct AssetConfigTransactionFields {
    /// Common transaction header fields.
    #[serde(flatten)]
    pub header: TransactionHeader,

    /// The asset being configured; zero when creating a new asset.
    #[serde(rename = "caid")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    #[builder(default)]
    pub asset_id: u64,

    /// The asset parameter block; absent when destroying.
    #[serde(rename = "apar")]
    #[serde(skip_serializing_if = "is_empty_struct_opt")]
    #[serde(default)]
    #[builder(default)]
    pub params: Option<AssetParams>,
}

impl AssetConfigTransactionBuilder {
    fn validate(&self) -> Result<(), String> {
        let creating = matches!(self.asset_id, None | Some(0));
        let has_params = matches!(&self.params, Some(Some(p)) if !p.is_empty());
        if creating && !has_params {
            return Err("Asset creation requires asset params".into());
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Transaction, AssetConfigTransactionBuilderError> {
        self.build_fields().map(Transaction::AssetConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TransactionHeaderMother;

    #[test]
    fn test_create_without_params_is_rejected() {
        let result = AssetConfigTransactionBuilder::default()
            .header(TransactionHeaderMother::example().build().unwrap())
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Asset creation requires asset params"));
    }

    #[test]
    fn test_destroy_shape() {
        let txn = AssetConfigTransactionBuilder::default()
            .header(TransactionHeaderMother::example().build().unwrap())
            .asset_id(99)
            .build()
            .unwrap();

        match txn {
            Transaction::AssetConfig(fields) => {
                assert_eq!(fields.asset_id, 99);
                assert!(fields.params.is_none());
            }
            other => panic!("expected an asset config, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_params_are_omitted_from_the_wire_form() {
        use crate::AlgorandMsgpack;

        let destroy = AssetConfigTransactionBuilder::default()
            .header(TransactionHeaderMother::example().build().unwrap())
            .asset_id(99)
            .params(AssetParams::default())
            .build()
            .unwrap();

        let bytes = destroy.encode_raw().unwrap();
        assert!(!bytes.windows(4).any(|w| w == b"apar"));
    }
}
