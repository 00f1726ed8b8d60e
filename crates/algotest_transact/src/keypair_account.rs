//! Ed25519 keypair account representation.
//!
//! A keypair account is fully described by its 32-byte public key; the
//! address is that key plus a checksum. Conversions to and from [`Address`]
//! are lossless.

use crate::address::Address;
use crate::constants::Byte32;
use crate::error::TransactError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A single-signature Algorand account identified by its Ed25519 public key.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(transparent)]
pub struct KeyPairAccount {
    /// The 32-byte Ed25519 public key.
    #[serde_as(as = "Bytes")]
    pub pub_key: Byte32,
}

impl KeyPairAccount {
    /// Wraps a 32-byte public key into an account.
    pub fn from_pubkey(pub_key: &Byte32) -> Self {
        KeyPairAccount { pub_key: *pub_key }
    }

    /// The address derived from this account's public key.
    pub fn address(&self) -> Address {
        Address(self.pub_key)
    }
}

impl From<Address> for KeyPairAccount {
    fn from(addr: Address) -> Self {
        KeyPairAccount::from_pubkey(addr.as_bytes())
    }
}

impl From<KeyPairAccount> for Address {
    fn from(account: KeyPairAccount) -> Address {
        Address(account.pub_key)
    }
}

impl FromStr for KeyPairAccount {
    type Err = TransactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Address>().map(Into::into)
    }
}

impl Display for KeyPairAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.address().as_str())
    }
}
