//! Composite transaction types: the closed set of signable payload shapes
//! the pipeline can carry.
//!
//! A [`Signable`] is either a plain payload, a logic-signature wrapper, a
//! multisig wrapper, or an ordered group of the first three. All of them
//! produce submittable envelopes through one contract, so the pipeline
//! cannot tell a simple transaction from a composite at the call site.

use crate::accounts::{AlgoAccount, MultisigAccount};
use crate::clients::AlgodApi;
use crate::error::TxnError;
use crate::transactions::pipeline::{run_transaction, TxnOptions, TxnOutcome};
use algotest_transact::{
    compute_group, AlgorandMsgpack, Byte32, LogicSignature, MultisigSignature,
    SignedTransaction, Transaction,
};

/// An unsent (signer, payload) pair: the unit the pipeline builds, defers,
/// groups, and signs.
#[derive(Debug, Clone)]
pub struct TxnElement {
    pub signer: AlgoAccount,
    pub txn: Signable,
}

impl TxnElement {
    /// Pairs a plain payload with the account that will sign it.
    pub fn plain(signer: AlgoAccount, txn: Transaction) -> Self {
        TxnElement {
            signer,
            txn: Signable::Plain(txn),
        }
    }

    /// The underlying plain payload, when this element wraps exactly one.
    pub fn payload(&self) -> Option<&Transaction> {
        match &self.txn {
            Signable::Plain(txn) => Some(txn),
            Signable::LogicSig(lsig) => Some(&lsig.transaction),
            Signable::Multisig(msig) => Some(msig.transaction()),
            Signable::Group(_) => None,
        }
    }
}

/// The signable payload shapes.
#[derive(Debug, Clone)]
pub enum Signable {
    Plain(Transaction),
    LogicSig(LogicSigTransaction),
    Multisig(MultisigTransaction),
    Group(GroupTransaction),
}

impl Signable {
    /// Produces the ordered submittable envelopes, signing where needed with
    /// the paired signer's credential.
    pub fn sign(&self, signer: &AlgoAccount) -> Result<Vec<SignedTransaction>, TxnError> {
        match self {
            Signable::Plain(txn) => Ok(vec![signer.sign_transaction(txn)?]),
            Signable::LogicSig(lsig) => Ok(vec![lsig.to_signed()]),
            Signable::Multisig(msig) => Ok(vec![msig.sign()?]),
            Signable::Group(group) => group.sign(),
        }
    }

    /// Produces the envelopes of an already-signed payload without touching
    /// any credential. Only logic-signature shapes qualify.
    pub fn presigned(&self) -> Result<Vec<SignedTransaction>, TxnError> {
        match self {
            Signable::LogicSig(lsig) => Ok(vec![lsig.to_signed()]),
            Signable::Group(group) => group.presigned(),
            Signable::Plain(_) => Err(TxnError::signing(
                "a plain payload is not pre-signed; disable defer-sign or wrap it in a logic signature",
            )),
            Signable::Multisig(_) => Err(TxnError::signing(
                "a multisig payload accumulates signatures on sign, it is not pre-signed",
            )),
        }
    }
}

/// A payload authorized by a compiled program instead of a credential.
/// Fully signed from the moment it is constructed.
#[derive(Debug, Clone)]
pub struct LogicSigTransaction {
    pub transaction: Transaction,
    pub lsig: LogicSignature,
}

impl LogicSigTransaction {
    pub fn new(transaction: Transaction, lsig: LogicSignature) -> Self {
        LogicSigTransaction { transaction, lsig }
    }

    /// The submittable envelope; a pass-through, no signing happens here.
    pub fn to_signed(&self) -> SignedTransaction {
        SignedTransaction::from_logic_signature(self.transaction.clone(), self.lsig.clone())
    }
}

/// One logical payload accumulating signatures from a subset of a multisig
/// account's owners.
#[derive(Debug, Clone)]
pub struct MultisigTransaction {
    transaction: Transaction,
    template: MultisigSignature,
    signers: Vec<AlgoAccount>,
}

impl MultisigTransaction {
    /// Wraps a payload for signing by `signers` on behalf of `account`.
    ///
    /// The descriptor is taken fresh from the account here, so no two
    /// multisig transactions ever share accumulated-signature state.
    pub fn new(
        transaction: Transaction,
        signers: Vec<AlgoAccount>,
        account: &MultisigAccount,
    ) -> Self {
        MultisigTransaction {
            transaction,
            template: account.signature_template(),
            signers,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub(crate) fn transaction_mut(&mut self) -> &mut Transaction {
        &mut self.transaction
    }

    /// Applies each signer's credential to the envelope, in order.
    ///
    /// Signatures cover the payload as it stands after any group
    /// assignment, and whether enough were gathered to meet the threshold
    /// is left to the network to judge.
    pub fn sign(&self) -> Result<SignedTransaction, TxnError> {
        let bytes = self.transaction.encode()?;
        let mut msig = self.template.clone();

        for signer in &self.signers {
            let signature = signer.raw_signature(&bytes)?;
            msig.apply_subsignature(signer.address(), signature)?;
        }

        Ok(SignedTransaction::from_multisignature(
            self.transaction.clone(),
            msig,
        ))
    }
}

/// N independently-built elements bundled into one atomically-validated
/// unit.
///
/// Construction is where grouping happens, exactly once: the shared id is
/// computed over the ordered underlying payloads (logic-signature and
/// multisig wrappers are flattened to the plain payload inside them) and
/// stamped onto every member. Caller order is preserved throughout and
/// determines both the wire order and the signer pairing used by `sign`.
#[derive(Debug, Clone)]
pub struct GroupTransaction {
    members: Vec<(AlgoAccount, GroupMember)>,
    group_id: Byte32,
}

/// A group member; groups do not nest.
#[derive(Debug, Clone)]
pub enum GroupMember {
    Plain(Transaction),
    LogicSig(LogicSigTransaction),
    Multisig(MultisigTransaction),
}

impl GroupMember {
    fn payload(&self) -> &Transaction {
        match self {
            GroupMember::Plain(txn) => txn,
            GroupMember::LogicSig(lsig) => &lsig.transaction,
            GroupMember::Multisig(msig) => msig.transaction(),
        }
    }

    fn payload_mut(&mut self) -> &mut Transaction {
        match self {
            GroupMember::Plain(txn) => txn,
            GroupMember::LogicSig(lsig) => &mut lsig.transaction,
            GroupMember::Multisig(msig) => msig.transaction_mut(),
        }
    }
}

impl GroupTransaction {
    /// Bundles the elements, computing and assigning the shared group id.
    ///
    /// Fails when a member is itself a group, when the group is empty or
    /// oversized, or when any payload already carries a group id.
    pub fn new(elements: Vec<TxnElement>) -> Result<Self, TxnError> {
        let mut members = Vec::with_capacity(elements.len());
        for element in elements {
            let member = match element.txn {
                Signable::Plain(txn) => GroupMember::Plain(txn),
                Signable::LogicSig(lsig) => GroupMember::LogicSig(lsig),
                Signable::Multisig(msig) => GroupMember::Multisig(msig),
                Signable::Group(_) => {
                    return Err(TxnError::construction(
                        "group transactions cannot contain other groups",
                    ))
                }
            };
            members.push((element.signer, member));
        }

        let flattened: Vec<Transaction> = members
            .iter()
            .map(|(_, member)| member.payload().clone())
            .collect();
        let group_id = compute_group(&flattened)
            .map_err(|e| TxnError::construction(e.to_string()))?;

        for (_, member) in members.iter_mut() {
            member.payload_mut().header_mut().group = Some(group_id);
        }

        Ok(GroupTransaction { members, group_id })
    }

    /// The shared id stamped onto every member.
    pub fn group_id(&self) -> Byte32 {
        self.group_id
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Signs member by member in the fixed construction order: pre-signed
    /// logic-signature members pass through, multisig members apply their
    /// own signer lists, and plain members sign with the paired account.
    pub fn sign(&self) -> Result<Vec<SignedTransaction>, TxnError> {
        self.members
            .iter()
            .map(|(signer, member)| match member {
                GroupMember::LogicSig(lsig) => Ok(lsig.to_signed()),
                GroupMember::Multisig(msig) => msig.sign(),
                GroupMember::Plain(txn) => signer.sign_transaction(txn),
            })
            .collect()
    }

    /// The envelopes of a group whose members are all pre-signed.
    pub fn presigned(&self) -> Result<Vec<SignedTransaction>, TxnError> {
        self.members
            .iter()
            .map(|(_, member)| match member {
                GroupMember::LogicSig(lsig) => Ok(lsig.to_signed()),
                _ => Err(TxnError::signing(
                    "only logic-signature members are pre-signed",
                )),
            })
            .collect()
    }
}

/// Submits unsent elements as one atomic group transaction.
///
/// Collect the elements by calling ordinary operations inside a
/// [`crate::transactions::TxnElemsScope`], then hand them here in the order
/// they should validate in.
pub fn group_transaction(
    algod: &dyn AlgodApi,
    elements: Vec<TxnElement>,
) -> Result<TxnOutcome<()>, TxnError> {
    // Members already carry their own parameters; nothing to inject.
    let options = TxnOptions {
        no_params: true,
        ..Default::default()
    };

    run_transaction(algod, "group_transaction", &options, None, move |_| {
        let group = GroupTransaction::new(elements)?;
        Ok(TxnElement {
            signer: AlgoAccount::null(),
            txn: Signable::Group(group),
        })
    })
}

/// Submits one payload signed by `signers` on behalf of a multisig account.
///
/// The element's embedded signer is discarded; authority comes from the
/// explicit signer list.
pub fn multisig_transaction(
    algod: &dyn AlgodApi,
    account: &MultisigAccount,
    element: TxnElement,
    signers: Vec<AlgoAccount>,
) -> Result<TxnOutcome<()>, TxnError> {
    let options = TxnOptions {
        no_params: true,
        ..Default::default()
    };
    let account = account.clone();

    run_transaction(algod, "multisig_transaction", &options, None, move |_| {
        let txn = match element.txn {
            Signable::Plain(txn) => txn,
            _ => {
                return Err(TxnError::construction(
                    "a multisig transaction wraps a plain payload",
                ))
            }
        };
        Ok(TxnElement {
            signer: AlgoAccount::null(),
            txn: Signable::Multisig(MultisigTransaction::new(txn, signers, &account)),
        })
    })
}

/// Submits a payload authorized by a logic signature.
///
/// The wrapper is fully signed at construction, so the pipeline submits it
/// as-is (defer-sign).
pub fn smart_signature_transaction(
    algod: &dyn AlgodApi,
    smart_signature: LogicSignature,
    element: TxnElement,
) -> Result<TxnOutcome<()>, TxnError> {
    let options = TxnOptions {
        no_sign: true,
        no_params: true,
        ..Default::default()
    };

    run_transaction(
        algod,
        "smart_signature_transaction",
        &options,
        None,
        move |_| {
            let txn = match element.txn {
                Signable::Plain(txn) => txn,
                _ => {
                    return Err(TxnError::construction(
                        "a smart signature wraps a plain payload",
                    ))
                }
            };
            Ok(TxnElement {
                signer: AlgoAccount::null(),
                txn: Signable::LogicSig(LogicSigTransaction::new(txn, smart_signature)),
            })
        },
    )
}
