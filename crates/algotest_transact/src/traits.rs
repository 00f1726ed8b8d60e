//! Core traits shared by every wire-level type in this crate.
//!
//! Algorand encodes transactions as canonical msgpack: maps use string keys
//! sorted lexicographically, zero/empty fields are omitted entirely, and
//! hashable encodings carry a domain-separation prefix (`TX` for
//! transactions, `TG` for group digests). [`AlgorandMsgpack`] captures that
//! contract; [`TransactionId`] derives ids from it.

use crate::constants::HASH_BYTES_LENGTH;
use crate::error::TransactError;
use crate::transactions::Transaction;
use crate::utils::{hash, sort_msgpack_value};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Canonical msgpack encoding and decoding.
///
/// `encode_raw` produces the sorted, zero-stripped map; `encode` prepends the
/// type's domain prefix so the bytes are safe to hash or sign.
pub trait AlgorandMsgpack: Serialize + DeserializeOwned {
    /// Domain-separation prefix prepended by [`AlgorandMsgpack::encode`].
    const PREFIX: &'static [u8] = b"";

    /// Encodes the value to canonical msgpack without the domain prefix.
    fn encode_raw(&self) -> Result<Vec<u8>, TransactError> {
        let named = rmp_serde::to_vec_named(self)?;
        let value: rmpv::Value = rmp_serde::from_slice(&named)?;

        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &sort_msgpack_value(value))?;
        Ok(buf)
    }

    /// Encodes the value to canonical msgpack with the domain prefix.
    fn encode(&self) -> Result<Vec<u8>, TransactError> {
        let raw = self.encode_raw()?;
        if Self::PREFIX.is_empty() {
            return Ok(raw);
        }

        let mut bytes = Vec::with_capacity(Self::PREFIX.len() + raw.len());
        bytes.extend_from_slice(Self::PREFIX);
        bytes.extend_from_slice(&raw);
        Ok(bytes)
    }

    /// Decodes a value from msgpack bytes, tolerating a leading domain prefix.
    fn decode(bytes: &[u8]) -> Result<Self, TransactError> {
        if bytes.is_empty() {
            return Err(TransactError::input(
                "attempted to decode 0 bytes, input must not be empty",
            ));
        }

        let raw = bytes.strip_prefix(Self::PREFIX).unwrap_or(bytes);
        Ok(rmp_serde::from_slice(raw)?)
    }
}

/// Transaction id derivation: the Sha512-256 digest of the prefixed canonical
/// encoding, displayed as unpadded base32.
pub trait TransactionId: AlgorandMsgpack {
    fn id_raw(&self) -> Result<[u8; HASH_BYTES_LENGTH], TransactError> {
        Ok(hash(&self.encode()?))
    }

    fn id(&self) -> Result<String, TransactError> {
        Ok(base32::encode(
            base32::Alphabet::Rfc4648 { padding: false },
            &self.id_raw()?,
        ))
    }
}

/// Size estimation for fee calculation, accounting for the signature the
/// final envelope will carry.
pub trait EstimateTransactionSize {
    fn estimate_size(&self) -> Result<usize, TransactError>;
}

/// Group assignment over an ordered set of transactions.
pub trait Transactions {
    /// Computes the shared group id and stamps it onto every member,
    /// preserving order.
    fn assign_group(self) -> Result<Vec<Transaction>, TransactError>;
}

/// Types whose canonical encoding collapses to nothing when all fields hold
/// their zero values. Used to decide whether an optional nested struct should
/// be omitted from the wire form.
pub trait MsgPackEmpty {
    fn is_empty(&self) -> bool;
}
