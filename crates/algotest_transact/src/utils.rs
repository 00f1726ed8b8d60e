use crate::constants::{Byte32, HASH_BYTES_LENGTH, MAX_TX_GROUP_SIZE, PUBLIC_KEY_BYTE_LENGTH};
use crate::error::TransactError;
use crate::traits::{AlgorandMsgpack, MsgPackEmpty, TransactionId};
use crate::transactions::Transaction;
use crate::Address;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, Bytes};
use sha2::{Digest, Sha512_256};
use std::collections::BTreeMap;

/// Recursively sorts all map keys so the encoding is canonical.
pub fn sort_msgpack_value(value: rmpv::Value) -> rmpv::Value {
    match value {
        rmpv::Value::Map(entries) => {
            let mut sorted: BTreeMap<String, rmpv::Value> = BTreeMap::new();
            for (key, val) in entries {
                if let rmpv::Value::String(key) = key {
                    sorted.insert(key.into_str().unwrap_or_default(), sort_msgpack_value(val));
                }
            }

            rmpv::Value::Map(
                sorted
                    .into_iter()
                    .map(|(key, val)| (rmpv::Value::String(key.into()), val))
                    .collect(),
            )
        }
        rmpv::Value::Array(items) => {
            rmpv::Value::Array(items.into_iter().map(sort_msgpack_value).collect())
        }
        other => other,
    }
}

pub fn is_zero<T>(n: &T) -> bool
where
    T: PartialEq + From<u8>,
{
    *n == T::from(0u8)
}

pub fn is_zero_opt<T>(n: &Option<T>) -> bool
where
    T: PartialEq + From<u8>,
{
    n.as_ref().is_none_or(is_zero)
}

pub fn is_zero_addr(addr: &Address) -> bool {
    addr.as_bytes() == &[0u8; PUBLIC_KEY_BYTE_LENGTH]
}

pub fn is_zero_addr_opt(addr: &Option<Address>) -> bool {
    addr.as_ref().is_none_or(is_zero_addr)
}

pub fn is_empty_bytes32_opt(bytes: &Option<Byte32>) -> bool {
    bytes.as_ref().is_none_or(|b| b == &[0u8; 32])
}

pub fn is_empty_string_opt(string: &Option<String>) -> bool {
    string.as_ref().is_none_or(String::is_empty)
}

pub fn is_empty_vec_opt<T>(vec: &Option<Vec<T>>) -> bool {
    vec.as_ref().is_none_or(Vec::is_empty)
}

pub fn is_empty_struct_opt<T>(val: &Option<T>) -> bool
where
    T: MsgPackEmpty,
{
    val.as_ref().is_none_or(|v| v.is_empty())
}

pub fn is_false_opt(flag: &Option<bool>) -> bool {
    flag.as_ref().is_none_or(|b| !b)
}

/// Sha512-256 digest, the hash every Algorand id and checksum is built on.
pub fn hash(bytes: &[u8]) -> Byte32 {
    let mut hasher = Sha512_256::new();
    hasher.update(bytes);

    let mut digest = [0u8; HASH_BYTES_LENGTH];
    digest.copy_from_slice(&hasher.finalize()[..HASH_BYTES_LENGTH]);
    digest
}

/// Computes the shared group id over an ordered list of transactions.
///
/// The id is a pure function of (payload content, order): the raw id of each
/// member is collected into a `TG`-prefixed digest list and hashed. Members
/// must not already carry a group assignment.
pub fn compute_group(txs: &[Transaction]) -> Result<Byte32, TransactError> {
    if txs.is_empty() {
        return Err(TransactError::input("Transaction group size cannot be 0"));
    }

    if txs.len() > MAX_TX_GROUP_SIZE {
        return Err(TransactError::input(format!(
            "Transaction group size exceeds the max limit of {}",
            MAX_TX_GROUP_SIZE
        )));
    }

    let tx_hashes: Result<Vec<Byte32>, TransactError> = txs
        .iter()
        .map(|tx| {
            if tx.header().group.is_some() {
                return Err(TransactError::input(
                    "Transactions must not already be grouped",
                ));
            }
            tx.id_raw()
        })
        .collect();

    let digest_list = GroupDigests {
        tx_hashes: tx_hashes?,
    };
    Ok(hash(&digest_list.encode()?))
}

// Internal carrier for the ordered member digests that feed the group hash.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct GroupDigests {
    #[serde(rename = "txlist")]
    #[serde_as(as = "Vec<Bytes>")]
    pub tx_hashes: Vec<Byte32>,
}

impl AlgorandMsgpack for GroupDigests {
    const PREFIX: &'static [u8] = b"TG";
}
