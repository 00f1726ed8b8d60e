//! End-to-end pipeline scenarios against the scripted algod stub.

use algotest_transact::{
    compute_group, AlgorandMsgpack, Transaction, TransactionId,
};
use algotest_utils::testing::{testnet_params, StubAlgod};
use algotest_utils::transactions::{
    group_transaction, multisig_transaction, payment_transaction, run_transaction,
    smart_signature_transaction, GroupTransaction, LogicSigTransaction, PaymentExtras, Signable,
    TxnElement, TxnElemsScope, TxnIdScope, TxnOptions, TxnOutcome, CONFIRMATION_ROUNDS, FLAT_FEE,
};
use algotest_utils::{AlgoAccount, CommonParams, MultisigAccount, TxnError};
use rstest::rstest;

fn pay(
    algod: &StubAlgod,
    sender: &AlgoAccount,
    receiver: &AlgoAccount,
    amount: u64,
) -> Result<TxnOutcome<()>, TxnError> {
    payment_transaction(algod, sender, receiver, amount, &PaymentExtras::default())
}

#[test]
fn payment_with_injected_params_fetches_once_and_uses_the_flat_fee() {
    let _ = env_logger::builder().is_test(true).try_init();

    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    let outcome = pay(&algod, &sender, &receiver, 1_000_000).unwrap();
    assert!(matches!(outcome, TxnOutcome::Confirmed(())));

    let calls = algod.calls();
    assert_eq!(calls.suggested_params, 1);
    assert_eq!(calls.submissions, 1);

    let submission = algod.last_submission().unwrap();
    assert_eq!(submission.len(), 1);
    let envelope = &submission[0];
    assert!(envelope.signature.is_some());
    assert_eq!(envelope.transaction.header().fee, Some(FLAT_FEE));
    assert_eq!(&envelope.transaction.header().sender, sender.address());
    match &envelope.transaction {
        Transaction::Payment(fields) => {
            assert_eq!(&fields.receiver, receiver.address());
            assert_eq!(fields.amount, 1_000_000);
        }
        other => panic!("expected a payment, got {other:?}"),
    }
}

#[test]
fn payment_with_explicit_params_fetches_nothing() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    let mut params = testnet_params();
    params.flat_fee = true;
    params.fee = 5000;

    let extras = PaymentExtras {
        common: CommonParams {
            params: Some(params),
            ..Default::default()
        },
        ..Default::default()
    };
    payment_transaction(&algod, &sender, &receiver, 250_000, &extras).unwrap();

    assert_eq!(algod.calls().suggested_params, 0);
    let submission = algod.last_submission().unwrap();
    assert_eq!(submission[0].transaction.header().fee, Some(5000));
}

#[test]
fn confirmation_timeout_after_exactly_the_round_budget() {
    let algod = StubAlgod::new().never_confirms();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    let result = pay(&algod, &sender, &receiver, 1000);
    match result {
        Err(TxnError::ConfirmationTimeout { rounds, .. }) => {
            assert_eq!(rounds, CONFIRMATION_ROUNDS);
        }
        other => panic!("expected a confirmation timeout, got {other:?}"),
    }

    // One pending poll per budgeted round, no more, no fewer.
    assert_eq!(algod.calls().pending_info, CONFIRMATION_ROUNDS as usize);
}

#[test]
fn pool_rejection_carries_the_reason() {
    let algod = StubAlgod::new().with_pool_error("fee too small");
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    let result = pay(&algod, &sender, &receiver, 1000);
    match result {
        Err(TxnError::PoolRejection { reason, .. }) => assert_eq!(reason, "fee too small"),
        other => panic!("expected a pool rejection, got {other:?}"),
    }
}

#[test]
fn signing_fails_without_a_credential() {
    let algod = StubAlgod::new();
    let keyless = AlgoAccount::watcher(AlgoAccount::generate().address().clone());
    let receiver = AlgoAccount::generate();

    let result = pay(&algod, &keyless, &receiver, 1000);
    assert!(matches!(result, Err(TxnError::Signing { .. })));
    assert_eq!(algod.calls().submissions, 0);
}

#[test]
fn defer_send_returns_the_unsent_element() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    let _scope = TxnElemsScope::new();
    let outcome = pay(&algod, &sender, &receiver, 42).unwrap();

    let element = outcome.into_element().unwrap();
    assert_eq!(&element.signer, &sender);
    assert!(matches!(element.txn, Signable::Plain(_)));
    assert_eq!(algod.calls().submissions, 0);
}

#[rstest]
#[case(2)]
#[case(3)]
fn deferred_payments_group_into_one_submission(#[case] receivers: usize) {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let targets: Vec<AlgoAccount> = (0..receivers).map(|_| AlgoAccount::generate()).collect();

    let elements: Vec<TxnElement> = {
        let _scope = TxnElemsScope::new();
        targets
            .iter()
            .map(|target| {
                pay(&algod, &sender, target, 10_000_000)
                    .unwrap()
                    .into_element()
                    .unwrap()
            })
            .collect()
    };

    group_transaction(&algod, elements).unwrap();

    // The whole group goes out as one submission, in the original order,
    // with one signature per payload and one shared group id.
    assert_eq!(algod.calls().submissions, 1);
    let submission = algod.last_submission().unwrap();
    assert_eq!(submission.len(), receivers);

    let group_id = submission[0].transaction.header().group.unwrap();
    for (envelope, target) in submission.iter().zip(&targets) {
        assert!(envelope.signature.is_some());
        assert_eq!(envelope.transaction.header().group, Some(group_id));
        match &envelope.transaction {
            Transaction::Payment(fields) => assert_eq!(&fields.receiver, target.address()),
            other => panic!("expected a payment, got {other:?}"),
        }
    }
}

#[test]
fn txn_id_scope_reports_the_submitted_id() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    let _scope = TxnIdScope::new();
    let outcome = pay(&algod, &sender, &receiver, 1000).unwrap();

    let submitted = algod.last_submission().unwrap();
    let expected = submitted[0].id().unwrap();
    match outcome {
        TxnOutcome::ConfirmedWithId { txn_id, result: () } => assert_eq!(txn_id, expected),
        other => panic!("expected an id-carrying outcome, got {other:?}"),
    }
}

fn lsig_payment_element(sender: &AlgoAccount, receiver: &AlgoAccount, note: &[u8]) -> TxnElement {
    let algod = StubAlgod::new();
    let extras = PaymentExtras {
        common: CommonParams::with_note(note.to_vec()),
        ..Default::default()
    };
    let _scope = TxnElemsScope::new();
    let element = payment_transaction(&algod, sender, receiver, 77, &extras)
        .unwrap()
        .into_element()
        .unwrap();

    let txn = match element.txn {
        Signable::Plain(txn) => txn,
        other => panic!("expected a plain payload, got {other:?}"),
    };
    TxnElement {
        signer: AlgoAccount::null(),
        txn: Signable::LogicSig(LogicSigTransaction::new(
            txn,
            algotest_transact::LogicSignature::new(vec![0x06, 0x81, 0x01]),
        )),
    }
}

#[test]
fn defer_sign_submits_a_presigned_group_unchanged() {
    let algod = StubAlgod::new();
    let escrow = AlgoAccount::generate();
    let first_receiver = AlgoAccount::generate();
    let second_receiver = AlgoAccount::generate();

    let group = GroupTransaction::new(vec![
        lsig_payment_element(&escrow, &first_receiver, b"one"),
        lsig_payment_element(&escrow, &second_receiver, b"two"),
    ])
    .unwrap();
    let expected_group_id = group.group_id();

    let options: TxnOptions<()> = TxnOptions {
        no_sign: true,
        no_params: true,
        ..Default::default()
    };
    run_transaction(&algod, "lsig_group", &options, None, move |_| {
        Ok(TxnElement {
            signer: AlgoAccount::null(),
            txn: Signable::Group(group),
        })
    })
    .unwrap();

    let submission = algod.last_submission().unwrap();
    assert_eq!(submission.len(), 2);
    for envelope in &submission {
        assert!(envelope.signature.is_none());
        assert!(envelope.logic_signature.is_some());
        assert_eq!(envelope.transaction.header().group, Some(expected_group_id));
    }
    // Original order preserved on the wire.
    match (&submission[0].transaction, &submission[1].transaction) {
        (Transaction::Payment(first), Transaction::Payment(second)) => {
            assert_eq!(&first.receiver, first_receiver.address());
            assert_eq!(&second.receiver, second_receiver.address());
        }
        other => panic!("expected two payments, got {other:?}"),
    }
}

#[test]
fn smart_signature_transaction_passes_through_without_signing() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    let element = {
        let _scope = TxnElemsScope::new();
        pay(&algod, &sender, &receiver, 900)
            .unwrap()
            .into_element()
            .unwrap()
    };

    let lsig = algotest_transact::LogicSignature::new(vec![0x06, 0x81, 0x01]);
    smart_signature_transaction(&algod, lsig.clone(), element).unwrap();

    let submission = algod.last_submission().unwrap();
    assert_eq!(submission.len(), 1);
    assert!(submission[0].signature.is_none());
    assert_eq!(submission[0].logic_signature.as_ref(), Some(&lsig));
}

#[test]
fn multisig_below_threshold_signs_locally() {
    let algod = StubAlgod::new();
    let owners = vec![AlgoAccount::generate(), AlgoAccount::generate()];
    let account = MultisigAccount::of_accounts(1, 2, &owners).unwrap();
    let receiver = AlgoAccount::generate();

    let element = {
        let _scope = TxnElemsScope::new();
        pay(&algod, &account.as_account(), &receiver, 500)
            .unwrap()
            .into_element()
            .unwrap()
    };

    // Only one of the two required owners signs; the client accepts it and
    // leaves threshold enforcement to the network.
    multisig_transaction(&algod, &account, element, vec![owners[0].clone()]).unwrap();

    let submission = algod.last_submission().unwrap();
    let msig = submission[0].multisignature.as_ref().unwrap();
    assert_eq!(msig.applied_signatures(), 1);
    assert_eq!(msig.threshold, 2);
}

#[test]
fn group_id_flattens_wrappers_to_the_underlying_payloads() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();
    let owners = vec![AlgoAccount::generate(), AlgoAccount::generate()];
    let account = MultisigAccount::of_accounts(1, 2, &owners).unwrap();

    let elements: Vec<TxnElement> = {
        let _scope = TxnElemsScope::new();
        (0..3u64)
            .map(|i| {
                let extras = PaymentExtras {
                    common: CommonParams::with_note(format!("tx:{i}")),
                    ..Default::default()
                };
                payment_transaction(&algod, &sender, &receiver, 100 + i, &extras)
                    .unwrap()
                    .into_element()
                    .unwrap()
            })
            .collect()
    };

    let payloads: Vec<Transaction> = elements
        .iter()
        .map(|element| element.payload().unwrap().clone())
        .collect();
    let expected = compute_group(&payloads).unwrap();

    // Wrap the second and third elements before grouping; the id must be
    // computed over the plain payloads inside the wrappers.
    let mut elements = elements.into_iter();
    let plain = elements.next().unwrap();
    let lsig_wrapped = {
        let element = elements.next().unwrap();
        let txn = match element.txn {
            Signable::Plain(txn) => txn,
            other => panic!("expected a plain payload, got {other:?}"),
        };
        TxnElement {
            signer: AlgoAccount::null(),
            txn: Signable::LogicSig(LogicSigTransaction::new(
                txn,
                algotest_transact::LogicSignature::new(vec![0x06, 0x81, 0x01]),
            )),
        }
    };
    let msig_wrapped = {
        let element = elements.next().unwrap();
        let txn = match element.txn {
            Signable::Plain(txn) => txn,
            other => panic!("expected a plain payload, got {other:?}"),
        };
        TxnElement {
            signer: AlgoAccount::null(),
            txn: Signable::Multisig(
                algotest_utils::MultisigTransaction::new(txn, owners.clone(), &account),
            ),
        }
    };

    let group = GroupTransaction::new(vec![plain, lsig_wrapped, msig_wrapped]).unwrap();
    assert_eq!(group.group_id(), expected);
}

#[test]
fn multisig_signed_after_grouping_covers_the_group_tagged_payload() {
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    let algod = StubAlgod::new();
    let owners = vec![AlgoAccount::generate(), AlgoAccount::generate()];
    let account = MultisigAccount::of_accounts(1, 2, &owners).unwrap();
    let receiver = AlgoAccount::generate();

    let element = {
        let _scope = TxnElemsScope::new();
        pay(&algod, &account.as_account(), &receiver, 1234)
            .unwrap()
            .into_element()
            .unwrap()
    };
    let txn = match element.txn {
        Signable::Plain(txn) => txn,
        other => panic!("expected a plain payload, got {other:?}"),
    };
    let msig_element = TxnElement {
        signer: AlgoAccount::null(),
        txn: Signable::Multisig(algotest_utils::MultisigTransaction::new(
            txn,
            owners.clone(),
            &account,
        )),
    };

    let group = GroupTransaction::new(vec![msig_element]).unwrap();
    let envelopes = group.sign().unwrap();
    let envelope = &envelopes[0];

    // The payload carries the group id, and the subsignature verifies
    // against exactly that group-tagged encoding.
    assert!(envelope.transaction.header().group.is_some());
    let signed_bytes = envelope.transaction.encode().unwrap();
    let msig = envelope.multisignature.as_ref().unwrap();
    for (owner, subsig) in owners.iter().zip(&msig.subsignatures) {
        let key = VerifyingKey::from_bytes(owner.address().as_bytes()).unwrap();
        let signature = Signature::from_bytes(&subsig.signature.unwrap());
        assert!(key.verify(&signed_bytes, &signature).is_ok());
    }
}

#[test]
fn groups_do_not_nest_or_regroup() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    let make_element = || {
        let _scope = TxnElemsScope::new();
        pay(&algod, &sender, &receiver, 10)
            .unwrap()
            .into_element()
            .unwrap()
    };

    let inner = GroupTransaction::new(vec![make_element()]).unwrap();
    let nested = GroupTransaction::new(vec![TxnElement {
        signer: AlgoAccount::null(),
        txn: Signable::Group(inner),
    }]);
    assert!(matches!(nested, Err(TxnError::Construction { .. })));

    // A payload that already carries a group id cannot be grouped again.
    let element = make_element();
    let grouped = GroupTransaction::new(vec![element]).unwrap();
    let tagged = match grouped.sign().unwrap().pop() {
        Some(envelope) => envelope.transaction,
        None => unreachable!(),
    };
    let regroup = GroupTransaction::new(vec![TxnElement::plain(sender.clone(), tagged)]);
    assert!(matches!(regroup, Err(TxnError::Construction { .. })));
}

#[test]
fn construction_failure_surfaces_before_any_network_traffic() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    // Suppressed injection with no explicit params cannot build a payload.
    let options: TxnOptions<()> = TxnOptions {
        no_params: true,
        ..Default::default()
    };
    let sender_clone = sender.clone();
    let receiver_clone = receiver.clone();
    let result = run_transaction(&algod, "payment_transaction", &options, None, move |params| {
        match params {
            Some(_) => unreachable!("injection was suppressed"),
            None => Err(TxnError::Construction {
                message: format!(
                    "no suggested parameters for {} -> {}",
                    sender_clone.address(),
                    receiver_clone.address()
                ),
            }),
        }
    });

    assert!(matches!(result, Err(TxnError::Construction { .. })));
    assert_eq!(algod.calls().suggested_params, 0);
    assert_eq!(algod.calls().submissions, 0);
}
