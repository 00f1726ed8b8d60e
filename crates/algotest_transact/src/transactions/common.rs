//! Fields shared by every transaction type.

use crate::address::Address;
use crate::constants::Byte32;
use crate::utils::{
    is_empty_bytes32_opt, is_empty_string_opt, is_empty_vec_opt, is_zero, is_zero_addr,
    is_zero_addr_opt, is_zero_opt,
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, Bytes};

/// The header carried by all Algorand transactions: sender, fee, validity
/// window, network identity, and the optional note/lease/rekey/group fields.
///
/// Optional fields holding their zero value are omitted from the canonical
/// encoding, which is why the zero address works as a "not set" marker.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Builder)]
#[builder(name = "TransactionHeaderBuilder", setter(strip_option))]
pub struct TransactionHeader {
    /// The account paying the fee and authorizing the transaction.
    #[serde(rename = "snd")]
    #[serde(skip_serializing_if = "is_zero_addr")]
    #[serde(default)]
    pub sender: Address,

    /// Fee in microALGO.
    #[serde(rename = "fee")]
    #[serde(skip_serializing_if = "is_zero_opt")]
    #[serde(default)]
    #[builder(default)]
    pub fee: Option<u64>,

    /// First round during which the transaction is valid.
    #[serde(rename = "fv")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub first_valid: u64,

    /// Last round during which the transaction is valid.
    #[serde(rename = "lv")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub last_valid: u64,

    /// Genesis hash of the target network.
    #[serde(rename = "gh")]
    #[serde(skip_serializing_if = "is_empty_bytes32_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Bytes>")]
    #[builder(default)]
    pub genesis_hash: Option<Byte32>,

    /// Genesis id of the target network.
    #[serde(rename = "gen")]
    #[serde(skip_serializing_if = "is_empty_string_opt")]
    #[serde(default)]
    #[builder(default)]
    pub genesis_id: Option<String>,

    /// Arbitrary caller-supplied bytes.
    #[serde(rename = "note")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Bytes>")]
    #[builder(default)]
    pub note: Option<Vec<u8>>,

    /// Account the sender's authorization is handed over to.
    #[serde(rename = "rekey")]
    #[serde(skip_serializing_if = "is_zero_addr_opt")]
    #[serde(default)]
    #[builder(default)]
    pub rekey_to: Option<Address>,

    /// Mutual-exclusion tag: no two confirmed transactions may share a
    /// sender and lease within their validity windows.
    #[serde(rename = "lx")]
    #[serde(skip_serializing_if = "is_empty_bytes32_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Bytes>")]
    #[builder(default)]
    pub lease: Option<Byte32>,

    /// Shared group id, set once when the transaction joins an atomic group.
    #[serde(rename = "grp")]
    #[serde(skip_serializing_if = "is_empty_bytes32_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Bytes>")]
    #[builder(default)]
    pub group: Option<Byte32>,
}
