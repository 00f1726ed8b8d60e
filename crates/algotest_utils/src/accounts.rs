//! The account model: keypair accounts, the null placeholder, derived
//! multisig accounts, and derived application accounts.

use crate::error::TxnError;
use algotest_transact::{
    Address, Byte32, MultisigSignature, SignedTransaction, Transaction,
    SECRET_KEY_BYTE_LENGTH, SIGNATURE_BYTE_LENGTH,
};
use algotest_transact::AlgorandMsgpack;
use derive_more::Debug;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

/// A participant in tests: an addressable, potentially-signing entity.
///
/// Accounts without a signing key (the null placeholder, application escrow
/// accounts, plain watched addresses) can receive funds and be referenced,
/// but can never sign. Identity is the address; two accounts holding the
/// same address compare equal.
#[derive(Debug, Clone)]
pub struct AlgoAccount {
    address: Address,
    #[debug(skip)]
    signing_key: Option<SigningKey>,
    /// Human label used only for diagnostics.
    pub name: Option<String>,
}

impl AlgoAccount {
    /// Generates a fresh keypair account.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let address = Address(signing_key.verifying_key().to_bytes());
        AlgoAccount {
            address,
            signing_key: Some(signing_key),
            name: None,
        }
    }

    /// Rebuilds a keypair account from its 32-byte seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_BYTE_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let address = Address(signing_key.verifying_key().to_bytes());
        AlgoAccount {
            address,
            signing_key: Some(signing_key),
            name: None,
        }
    }

    /// A keyless account for an address you only reference or pay.
    pub fn watcher(address: Address) -> Self {
        AlgoAccount {
            address,
            signing_key: None,
            name: None,
        }
    }

    /// The well-known placeholder with the zero address and no key. Used as
    /// the default for optional address parameters so builders always see a
    /// concrete (possibly zero, hence omitted) address.
    pub fn null() -> Self {
        AlgoAccount {
            address: Address::default(),
            signing_key: None,
            name: Some("null".to_string()),
        }
    }

    /// The keyless escrow account owned by an application.
    pub fn for_application(app_id: u64) -> Self {
        AlgoAccount {
            address: Address::from_app_id(&app_id),
            signing_key: None,
            name: Some(format!("app-{app_id}")),
        }
    }

    /// Attaches a diagnostic label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn has_signing_key(&self) -> bool {
        self.signing_key.is_some()
    }

    /// The signing seed, for harnesses that persist accounts across runs.
    pub fn seed(&self) -> Option<Byte32> {
        self.signing_key.as_ref().map(|key| key.to_bytes())
    }

    /// Signs arbitrary bytes, e.g. a multisig envelope's canonical encoding.
    pub fn raw_signature(
        &self,
        bytes: &[u8],
    ) -> Result<[u8; SIGNATURE_BYTE_LENGTH], TxnError> {
        let key = self.signing_key.as_ref().ok_or_else(|| {
            TxnError::signing(format!("account {} has no signing key", self.address))
        })?;
        Ok(key.sign(bytes).to_bytes())
    }

    /// Signs a transaction payload into its submittable envelope.
    pub fn sign_transaction(&self, txn: &Transaction) -> Result<SignedTransaction, TxnError> {
        let bytes = txn.encode()?;
        let signature = self.raw_signature(&bytes)?;
        Ok(SignedTransaction::from_signature(txn.clone(), signature))
    }
}

impl PartialEq for AlgoAccount {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for AlgoAccount {}

impl std::fmt::Display for AlgoAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.address, name),
            None => write!(f, "{}", self.address),
        }
    }
}

/// A multi-signature account derived from (version, threshold, owners).
///
/// The derived address changes when any of the three change. Signing state
/// never lives here: [`MultisigAccount::signature_template`] hands out a
/// fresh descriptor on every call, so two multisig transactions can never
/// alias accumulated signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigAccount {
    version: u8,
    threshold: u8,
    owners: Vec<Address>,
}

impl MultisigAccount {
    pub fn new(version: u8, threshold: u8, owners: Vec<Address>) -> Result<Self, TxnError> {
        // Validates the structural invariants by deriving a template once.
        MultisigSignature::from_participants(version, threshold, owners.clone())?;
        Ok(MultisigAccount {
            version,
            threshold,
            owners,
        })
    }

    /// Convenience constructor from owner accounts.
    pub fn of_accounts(
        version: u8,
        threshold: u8,
        owners: &[AlgoAccount],
    ) -> Result<Self, TxnError> {
        Self::new(
            version,
            threshold,
            owners.iter().map(|a| a.address().clone()).collect(),
        )
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    /// The derived multisig account address.
    pub fn address(&self) -> Address {
        self.signature_template().address()
    }

    /// A fresh, unsigned multisignature descriptor.
    pub fn signature_template(&self) -> MultisigSignature {
        MultisigSignature::from_participants(self.version, self.threshold, self.owners.clone())
            .unwrap_or_else(|_| unreachable!("validated at construction"))
    }

    /// A keyless pipeline account addressed at this multisig account.
    pub fn as_account(&self) -> AlgoAccount {
        AlgoAccount::watcher(self.address()).named("multisig")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_accounts_are_distinct() {
        let a = AlgoAccount::generate();
        let b = AlgoAccount::generate();
        assert_ne!(a.address(), b.address());
        assert!(a.has_signing_key());
    }

    #[test]
    fn test_seed_round_trip() {
        let account = AlgoAccount::generate();
        let seed = account.seed().unwrap();
        let rebuilt = AlgoAccount::from_seed(&seed);
        assert_eq!(account, rebuilt);
    }

    #[test]
    fn test_null_account_cannot_sign() {
        let null = AlgoAccount::null();
        assert!(!null.has_signing_key());
        assert!(null.raw_signature(b"anything").is_err());
        assert_eq!(null.address(), &Address::default());
    }

    #[test]
    fn test_application_account_is_keyless_and_deterministic() {
        let a = AlgoAccount::for_application(123);
        let b = AlgoAccount::for_application(123);
        assert_eq!(a.address(), b.address());
        assert!(!a.has_signing_key());
        assert_eq!(
            a.address().to_string(),
            "WRBMNT66ECE2AOYKM76YVWIJMBW6Z3XCQZOKG5BL7NISAQC2LBGEKTZLRM"
        );
    }

    #[test]
    fn test_multisig_account_address_is_order_sensitive() {
        let owners = vec![AlgoAccount::generate(), AlgoAccount::generate()];
        let forward = MultisigAccount::of_accounts(1, 2, &owners).unwrap();
        let reversed: Vec<AlgoAccount> = owners.iter().rev().cloned().collect();
        let backward = MultisigAccount::of_accounts(1, 2, &reversed).unwrap();
        assert_ne!(forward.address(), backward.address());
    }

    #[test]
    fn test_signature_template_is_fresh_per_call() {
        let owners = vec![AlgoAccount::generate(), AlgoAccount::generate()];
        let account = MultisigAccount::of_accounts(1, 2, &owners).unwrap();

        let mut first = account.signature_template();
        first
            .apply_subsignature(owners[0].address(), [9u8; 64])
            .unwrap();

        // A later template must not carry the earlier accumulation.
        let second = account.signature_template();
        assert_eq!(second.applied_signatures(), 0);
    }

    #[test]
    fn test_signed_transaction_verifies() {
        use algotest_transact::test_utils::TransactionMother;
        use ed25519_dalek::{Verifier, VerifyingKey};

        let account = AlgoAccount::generate();
        let txn = TransactionMother::simple_payment().build().unwrap();
        let signed = account.sign_transaction(&txn).unwrap();

        let verifying_key = VerifyingKey::from_bytes(account.address().as_bytes()).unwrap();
        let signature = ed25519_dalek::Signature::from_bytes(&signed.signature.unwrap());
        assert!(verifying_key
            .verify(&txn.encode().unwrap(), &signature)
            .is_ok());
    }
}
