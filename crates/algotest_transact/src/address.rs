//! Algorand address parsing, validation, and derivation.
//!
//! An address is 32 bytes of key material (or a hash digest, for multisig,
//! logic-signature, and application accounts) rendered as a 58-character
//! base32 string with a trailing 4-byte Sha512-256 checksum.

use crate::constants::{
    APP_ID_DOMAIN_SEPARATOR, ADDRESS_LENGTH, Byte32, CHECKSUM_BYTE_LENGTH, HASH_BYTES_LENGTH,
    PUBLIC_KEY_BYTE_LENGTH,
};
use crate::error::TransactError;
use crate::utils::hash;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A 32-byte Algorand address, stored without its checksum.
///
/// Parsing validates length, base32 alphabet, and checksum; formatting
/// recomputes the checksum and re-encodes. The zero address doubles as the
/// "absent" value in canonical encodings, which omit zero fields.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Address(#[serde_as(as = "Bytes")] pub Byte32);

impl Address {
    /// Returns the raw 32 bytes of the address.
    pub fn as_bytes(&self) -> &Byte32 {
        &self.0
    }

    /// Derives the escrow address owned by an application id.
    pub fn from_app_id(app_id: &u64) -> Self {
        let mut to_hash = APP_ID_DOMAIN_SEPARATOR.as_bytes().to_vec();
        to_hash.extend_from_slice(&app_id.to_be_bytes());
        Address(hash(&to_hash))
    }

    /// Renders the address as its 58-character base32 form with checksum.
    pub fn as_str(&self) -> String {
        let mut buffer = [0u8; PUBLIC_KEY_BYTE_LENGTH + CHECKSUM_BYTE_LENGTH];
        buffer[..PUBLIC_KEY_BYTE_LENGTH].copy_from_slice(&self.0);
        buffer[PUBLIC_KEY_BYTE_LENGTH..].copy_from_slice(&self.checksum());

        base32::encode(base32::Alphabet::Rfc4648 { padding: false }, &buffer)
    }

    /// Computes the 4-byte checksum: the tail of the Sha512-256 digest of
    /// the address bytes.
    pub fn checksum(&self) -> [u8; CHECKSUM_BYTE_LENGTH] {
        checksum_of(&self.0)
    }
}

fn checksum_of(bytes: &Byte32) -> [u8; CHECKSUM_BYTE_LENGTH] {
    let digest = hash(bytes);
    let mut checksum = [0u8; CHECKSUM_BYTE_LENGTH];
    checksum.copy_from_slice(&digest[(HASH_BYTES_LENGTH - CHECKSUM_BYTE_LENGTH)..]);
    checksum
}

impl FromStr for Address {
    type Err = TransactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_LENGTH {
            return Err(TransactError::InvalidAddress {
                message: "Algorand address must be exactly 58 characters".into(),
            });
        }

        let decoded = base32::decode(base32::Alphabet::Rfc4648 { padding: false }, s).ok_or_else(
            || TransactError::InvalidAddress {
                message: "Invalid base32 encoding for Algorand address".into(),
            },
        )?;

        let key_bytes: Byte32 = decoded[..PUBLIC_KEY_BYTE_LENGTH].try_into().map_err(|_| {
            TransactError::InvalidAddress {
                message: "Could not decode address into 32 bytes of key material".into(),
            }
        })?;
        let checksum: [u8; CHECKSUM_BYTE_LENGTH] = decoded[PUBLIC_KEY_BYTE_LENGTH..]
            .try_into()
            .map_err(|_| TransactError::InvalidAddress {
                message: "Could not get 4-byte checksum from decoded address".into(),
            })?;

        if checksum_of(&key_bytes) != checksum {
            return Err(TransactError::InvalidAddress {
                message: "Checksum is invalid".into(),
            });
        }

        Ok(Address(key_bytes))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
