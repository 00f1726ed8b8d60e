//! The typed operations against the scripted algod stub.

use algotest_transact::{OnApplicationComplete, StateSchema, Transaction};
use algotest_utils::testing::{AppGuard, AssetGuard, DeployedApp, DeployedAsset, StubAlgod};
use algotest_utils::transactions::{
    call_app, clear_app, create_asset, create_compiled_app, create_app, delete_app, freeze_asset,
    opt_in_app, opt_in_asset, transfer_asset, AppCallExtras, AppCreateExtras, AssetSpec,
    AssetTransferExtras,
};
use algotest_utils::{AlgoAccount, CommonParams, TxnOutcome};

fn programs() -> (Vec<u8>, Vec<u8>) {
    (vec![0x06, 0x81, 0x01], vec![0x06, 0x81, 0x01])
}

#[test]
fn create_compiled_app_returns_the_new_app_id() {
    let algod = StubAlgod::new().with_application_index(7777);
    let owner = AlgoAccount::generate();
    let (approval, clear) = programs();

    let outcome = create_compiled_app(
        &algod,
        &owner,
        approval.clone(),
        clear,
        StateSchema::new(1, 2),
        StateSchema::new(0, 0),
        &AppCreateExtras::default(),
    )
    .unwrap();

    assert_eq!(outcome.into_result().unwrap(), 7777);

    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::ApplicationCall(fields) => {
            assert_eq!(fields.app_id, 0);
            assert_eq!(fields.approval_program, Some(approval));
            assert_eq!(fields.global_schema, Some(StateSchema::new(1, 2)));
            assert_eq!(fields.local_schema, None);
        }
        other => panic!("expected an application call, got {other:?}"),
    }
}

#[test]
fn create_app_compiles_both_programs_through_the_facade() {
    let algod = StubAlgod::new()
        .with_application_index(42)
        .with_compiled_program(vec![0x09, 0x09]);
    let owner = AlgoAccount::generate();

    let outcome = create_app(
        &algod,
        &owner,
        "#pragma version 6\nint 1",
        "#pragma version 6\nint 1",
        StateSchema::new(0, 0),
        StateSchema::new(0, 0),
        &AppCreateExtras::default(),
    )
    .unwrap();

    assert_eq!(algod.calls().compile, 2);
    assert_eq!(outcome.into_result().unwrap(), 42);

    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::ApplicationCall(fields) => {
            assert_eq!(fields.approval_program, Some(vec![0x09, 0x09]));
        }
        other => panic!("expected an application call, got {other:?}"),
    }
}

#[test]
fn app_calls_carry_their_on_complete_and_references() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let referenced = AlgoAccount::generate();

    let extras = AppCallExtras {
        app_args: vec![b"method".to_vec(), b"arg".to_vec()],
        accounts: vec![referenced.clone()],
        foreign_apps: vec![11],
        foreign_assets: vec![22],
        ..Default::default()
    };
    call_app(&algod, &sender, 500, &extras).unwrap();

    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::ApplicationCall(fields) => {
            assert_eq!(fields.app_id, 500);
            assert_eq!(fields.on_complete, OnApplicationComplete::NoOp);
            assert_eq!(
                fields.args,
                Some(vec![b"method".to_vec(), b"arg".to_vec()])
            );
            assert_eq!(
                fields.account_references,
                Some(vec![referenced.address().clone()])
            );
            assert_eq!(fields.app_references, Some(vec![11]));
            assert_eq!(fields.asset_references, Some(vec![22]));
        }
        other => panic!("expected an application call, got {other:?}"),
    }

    opt_in_app(&algod, &sender, 500, &AppCallExtras::default()).unwrap();
    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::ApplicationCall(fields) => {
            assert_eq!(fields.on_complete, OnApplicationComplete::OptIn);
        }
        other => panic!("expected an application call, got {other:?}"),
    }

    clear_app(&algod, &sender, 500, &AppCallExtras::default()).unwrap();
    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::ApplicationCall(fields) => {
            assert_eq!(fields.on_complete, OnApplicationComplete::ClearState);
        }
        other => panic!("expected an application call, got {other:?}"),
    }
}

#[test]
fn create_asset_returns_the_new_asset_id() {
    let algod = StubAlgod::new().with_asset_index(31337);
    let creator = AlgoAccount::generate();
    let manager = AlgoAccount::generate();

    let spec = AssetSpec {
        asset_name: "Test Token".into(),
        unit_name: "TST".into(),
        total: 1_000_000,
        decimals: 2,
        default_frozen: false,
        manager: Some(manager.clone()),
        ..Default::default()
    };
    let outcome = create_asset(&algod, &creator, &spec, &CommonParams::default()).unwrap();
    assert_eq!(outcome.into_result().unwrap(), 31337);

    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::AssetConfig(fields) => {
            assert_eq!(fields.asset_id, 0);
            let params = fields.params.as_ref().unwrap();
            assert_eq!(params.total, 1_000_000);
            assert_eq!(params.unit_name.as_deref(), Some("TST"));
            assert_eq!(params.manager.as_ref(), Some(manager.address()));
            assert_eq!(params.reserve, None);
        }
        other => panic!("expected an asset config, got {other:?}"),
    }
}

#[test]
fn asset_transfers_opt_ins_and_freezes_take_their_shapes() {
    let algod = StubAlgod::new();
    let sender = AlgoAccount::generate();
    let receiver = AlgoAccount::generate();

    transfer_asset(
        &algod,
        &sender,
        &receiver,
        250,
        99,
        &AssetTransferExtras::default(),
    )
    .unwrap();
    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::AssetTransfer(fields) => {
            assert_eq!(fields.asset_id, 99);
            assert_eq!(fields.amount, 250);
            assert_eq!(&fields.receiver, receiver.address());
        }
        other => panic!("expected an asset transfer, got {other:?}"),
    }

    opt_in_asset(&algod, &receiver, 99, &CommonParams::default()).unwrap();
    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::AssetTransfer(fields) => {
            assert_eq!(fields.amount, 0);
            assert_eq!(&fields.receiver, receiver.address());
            assert_eq!(&fields.header.sender, receiver.address());
        }
        other => panic!("expected an asset transfer, got {other:?}"),
    }

    freeze_asset(&algod, &sender, &receiver, true, 99, &CommonParams::default()).unwrap();
    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::AssetFreeze(fields) => {
            assert_eq!(fields.asset_id, 99);
            assert_eq!(&fields.freeze_target, receiver.address());
            assert_eq!(fields.frozen, Some(true));
        }
        other => panic!("expected an asset freeze, got {other:?}"),
    }
}

#[test]
fn app_guard_deletes_on_scope_exit() {
    let algod = StubAlgod::new();
    let owner = AlgoAccount::generate();

    {
        let _guard = AppGuard::new(
            &algod,
            DeployedApp {
                id: 1234,
                owner: owner.clone(),
            },
        );
        assert_eq!(algod.calls().submissions, 0);
    }

    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::ApplicationCall(fields) => {
            assert_eq!(fields.app_id, 1234);
            assert_eq!(
                fields.on_complete,
                OnApplicationComplete::DeleteApplication
            );
        }
        other => panic!("expected an application call, got {other:?}"),
    }
}

#[test]
fn asset_guard_destroys_on_scope_exit() {
    let algod = StubAlgod::new();
    let owner = AlgoAccount::generate();

    {
        let _guard = AssetGuard::new(
            &algod,
            DeployedAsset {
                id: 777,
                owner: owner.clone(),
            },
        );
    }

    let submission = algod.last_submission().unwrap();
    match &submission[0].transaction {
        Transaction::AssetConfig(fields) => {
            assert_eq!(fields.asset_id, 777);
            assert!(fields.params.is_none());
        }
        other => panic!("expected an asset config, got {other:?}"),
    }
}

#[test]
fn explicit_delete_matches_the_guard_path() {
    let algod = StubAlgod::new();
    let owner = AlgoAccount::generate();

    let outcome = delete_app(&algod, &owner, 9, &AppCallExtras::default()).unwrap();
    assert!(matches!(outcome, TxnOutcome::Confirmed(())));
    assert_eq!(algod.calls().submissions, 1);
}
