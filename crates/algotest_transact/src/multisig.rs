//! Multisignature envelopes.
//!
//! A multisignature is described by a version, a signing threshold, and an
//! ordered list of participant addresses. The account address is derived by
//! hashing the domain separator together with the version, threshold, and
//! the concatenated participant keys, so changing any of the three yields a
//! different account.
//!
//! Signatures accumulate onto the subsignature slots one participant at a
//! time via [`MultisigSignature::apply_subsignature`]. Whether enough
//! subsignatures were gathered to satisfy the threshold is validated by the
//! network, not here.

use crate::address::Address;
use crate::constants::{
    MULTISIG_DOMAIN_SEPARATOR, PUBLIC_KEY_BYTE_LENGTH, SIGNATURE_BYTE_LENGTH,
};
use crate::error::TransactError;
use crate::utils::hash;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// An Algorand multisignature: version, threshold, and ordered subsignatures.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct MultisigSignature {
    /// Multisig protocol version.
    #[serde(rename = "v")]
    pub version: u8,
    /// Minimum number of subsignatures the network requires.
    #[serde(rename = "thr")]
    pub threshold: u8,
    /// One slot per participant, in the order that defines the account.
    #[serde(rename = "subsig")]
    pub subsignatures: Vec<MultisigSubsignature>,
}

/// A single participant slot in a multisignature.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct MultisigSubsignature {
    /// Address of the participant keypair account.
    #[serde(rename = "pk")]
    pub address: Address,
    /// The participant's signature, once applied.
    #[serde(rename = "s")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    #[serde_as(as = "Option<Bytes>")]
    pub signature: Option<[u8; SIGNATURE_BYTE_LENGTH]>,
}

impl MultisigSignature {
    /// Builds an empty (unsigned) multisignature from its participants.
    pub fn from_participants(
        version: u8,
        threshold: u8,
        participants: Vec<Address>,
    ) -> Result<Self, TransactError> {
        if participants.is_empty() {
            return Err(TransactError::InvalidMultisigSignature {
                message: "participant list must not be empty".into(),
            });
        }
        if threshold == 0 || threshold as usize > participants.len() {
            return Err(TransactError::InvalidMultisigSignature {
                message: format!(
                    "threshold {} is out of range for {} participants",
                    threshold,
                    participants.len()
                ),
            });
        }

        let subsignatures = participants
            .into_iter()
            .map(|address| MultisigSubsignature {
                address,
                signature: None,
            })
            .collect();
        Ok(Self {
            version,
            threshold,
            subsignatures,
        })
    }

    /// The participant addresses in account-defining order.
    pub fn participants(&self) -> Vec<Address> {
        self.subsignatures
            .iter()
            .map(|subsig| subsig.address.clone())
            .collect()
    }

    /// Records a participant's signature in its slot, replacing any earlier
    /// one. The participant must be part of this multisignature.
    pub fn apply_subsignature(
        &mut self,
        participant: &Address,
        signature: [u8; SIGNATURE_BYTE_LENGTH],
    ) -> Result<(), TransactError> {
        let slot = self
            .subsignatures
            .iter_mut()
            .find(|subsig| &subsig.address == participant)
            .ok_or_else(|| TransactError::InvalidMultisigSignature {
                message: format!("{participant} is not a participant of this multisig account"),
            })?;

        slot.signature = Some(signature);
        Ok(())
    }

    /// Counts the subsignature slots that currently hold a signature.
    pub fn applied_signatures(&self) -> usize {
        self.subsignatures
            .iter()
            .filter(|subsig| subsig.signature.is_some())
            .count()
    }

    /// Derives the multisignature account address.
    pub fn address(&self) -> Address {
        let mut buffer = Vec::with_capacity(
            MULTISIG_DOMAIN_SEPARATOR.len() + 2 + self.subsignatures.len() * PUBLIC_KEY_BYTE_LENGTH,
        );
        buffer.extend_from_slice(MULTISIG_DOMAIN_SEPARATOR.as_bytes());
        buffer.push(self.version);
        buffer.push(self.threshold);
        for subsig in &self.subsignatures {
            buffer.extend_from_slice(subsig.address.as_bytes());
        }

        Address(hash(&buffer))
    }
}

impl From<MultisigSignature> for Address {
    fn from(msig: MultisigSignature) -> Address {
        msig.address()
    }
}

impl Display for MultisigSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.address().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::AccountMother;

    fn participants() -> Vec<Address> {
        vec![
            AccountMother::account().address(),
            AccountMother::example().address(),
        ]
    }

    #[test]
    fn test_address_is_deterministic() {
        let a = MultisigSignature::from_participants(1, 2, participants()).unwrap();
        let b = MultisigSignature::from_participants(1, 2, participants()).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_address_depends_on_version_threshold_and_order() {
        let base = MultisigSignature::from_participants(1, 2, participants()).unwrap();

        let other_version = MultisigSignature::from_participants(2, 2, participants()).unwrap();
        assert_ne!(base.address(), other_version.address());

        let other_threshold = MultisigSignature::from_participants(1, 1, participants()).unwrap();
        assert_ne!(base.address(), other_threshold.address());

        let mut reversed = participants();
        reversed.reverse();
        let other_order = MultisigSignature::from_participants(1, 2, reversed).unwrap();
        assert_ne!(base.address(), other_order.address());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        assert!(MultisigSignature::from_participants(1, 0, participants()).is_err());
        assert!(MultisigSignature::from_participants(1, 3, participants()).is_err());
        assert!(MultisigSignature::from_participants(1, 1, vec![]).is_err());
    }

    #[test]
    fn test_apply_subsignature_unknown_participant() {
        let mut msig = MultisigSignature::from_participants(1, 2, participants()).unwrap();
        let outsider = AccountMother::neil().address();

        let result = msig.apply_subsignature(&outsider, [7u8; SIGNATURE_BYTE_LENGTH]);
        assert!(result.is_err());
        assert_eq!(msig.applied_signatures(), 0);
    }

    #[test]
    fn test_apply_below_threshold_succeeds_locally() {
        // The threshold is a network-side rule: one of two signatures is
        // accepted here and only rejected on submission.
        let mut msig = MultisigSignature::from_participants(1, 2, participants()).unwrap();
        msig.apply_subsignature(
            &AccountMother::account().address(),
            [7u8; SIGNATURE_BYTE_LENGTH],
        )
        .unwrap();

        assert_eq!(msig.applied_signatures(), 1);
        assert!(msig.applied_signatures() < msig.threshold as usize);
    }
}
