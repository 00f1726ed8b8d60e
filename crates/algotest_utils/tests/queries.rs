//! Read queries against a lagging stub indexer.

use algotest_utils::clients::{AccountInfo, ApplicationInfo};
use algotest_utils::testing::StubIndexer;
use algotest_utils::{
    account_balance, application_global_state, AlgoAccount, RetryPolicy, StateValue, TxnError,
};
use base64::{prelude::BASE64_STANDARD, Engine};
use std::time::Duration;

fn instant_retry() -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_millis(100),
        backoff: Duration::ZERO,
        retry_if: algotest_utils::ClientError::is_transient,
    }
}

#[test]
fn balance_query_rides_out_indexer_lag() {
    let account = AlgoAccount::generate();
    let indexer = StubIndexer::new()
        .lagging_for(2)
        .with_account(AccountInfo {
            address: account.address().to_string(),
            amount: 123_456,
            status: "Offline".to_string(),
            created_at_round: Some(5),
        });

    let balance = account_balance(&indexer, account.address(), &instant_retry()).unwrap();
    assert_eq!(balance, 123_456);
    // Two lagging attempts plus the one that landed.
    assert_eq!(indexer.lookups(), 3);
}

#[test]
fn balance_query_times_out_when_the_lag_never_clears() {
    let account = AlgoAccount::generate();
    let indexer = StubIndexer::new().lagging_for(usize::MAX);

    let result = account_balance(&indexer, account.address(), &instant_retry());
    assert!(matches!(result, Err(TxnError::QueryTimeout { .. })));
}

#[test]
fn global_state_query_decodes_teal_values() {
    use algotest_utils::clients::{TealKeyValue, TealValue};

    let mut app = ApplicationInfo::default();
    app.id = 88;
    app.params.global_state = Some(vec![
        TealKeyValue {
            key: BASE64_STANDARD.encode(b"total"),
            value: TealValue {
                value_type: 2,
                bytes: String::new(),
                uint: 41,
            },
        },
        TealKeyValue {
            key: BASE64_STANDARD.encode(b"owner"),
            value: TealValue {
                value_type: 1,
                bytes: BASE64_STANDARD.encode([7u8; 32]),
                uint: 0,
            },
        },
    ]);
    let indexer = StubIndexer::new().with_application(app);

    let state = application_global_state(&indexer, 88, &instant_retry()).unwrap();
    assert_eq!(state[b"total".as_slice()], StateValue::Uint(41));
    assert_eq!(
        state[b"owner".as_slice()].as_address().unwrap().as_bytes(),
        &[7u8; 32]
    );
}
