//! Scripted facade stubs.
//!
//! This crate exists to test other things, so its own network facades come
//! with in-memory fakes: [`StubAlgod`] scripts the node's responses and
//! records every call, [`StubIndexer`] serves canned query results with
//! optional injected lag.

use crate::clients::{
    AccountInfo, AlgodApi, ApplicationInfo, AssetRecord, ClientError, IndexerApi, NodeStatus,
    PendingTransaction, SuggestedParams,
};
use algotest_transact::{Address, SignedTransaction, TransactionId};
use base64::{prelude::BASE64_STANDARD, Engine};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// How often each facade entry point was hit.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlgodCallCounts {
    pub suggested_params: usize,
    pub submissions: usize,
    pub pending_info: usize,
    pub status: usize,
    pub status_after_round: usize,
    pub compile: usize,
}

/// An in-memory algod with scripted behavior and full call recording.
pub struct StubAlgod {
    params: RefCell<SuggestedParams>,
    confirmed_round: Cell<Option<u64>>,
    pool_error: RefCell<Option<String>>,
    compiled_program: RefCell<Vec<u8>>,
    application_index: Cell<Option<u64>>,
    asset_index: Cell<Option<u64>>,
    last_round: Cell<u64>,
    calls: RefCell<AlgodCallCounts>,
    submissions: RefCell<Vec<Vec<SignedTransaction>>>,
}

impl Default for StubAlgod {
    fn default() -> Self {
        Self::new()
    }
}

impl StubAlgod {
    /// A node that confirms everything on round 1.
    pub fn new() -> Self {
        StubAlgod {
            params: RefCell::new(testnet_params()),
            confirmed_round: Cell::new(Some(1)),
            pool_error: RefCell::new(None),
            compiled_program: RefCell::new(vec![0x06, 0x81, 0x01]),
            application_index: Cell::new(None),
            asset_index: Cell::new(None),
            last_round: Cell::new(0),
            calls: RefCell::new(AlgodCallCounts::default()),
            submissions: RefCell::new(Vec::new()),
        }
    }

    /// A node where confirmations never arrive.
    pub fn never_confirms(self) -> Self {
        self.confirmed_round.set(None);
        self
    }

    /// A node whose pool rejects everything with the given reason.
    pub fn with_pool_error(self, reason: impl Into<String>) -> Self {
        *self.pool_error.borrow_mut() = Some(reason.into());
        self
    }

    pub fn with_suggested_params(self, params: SuggestedParams) -> Self {
        *self.params.borrow_mut() = params;
        self
    }

    pub fn with_compiled_program(self, program: Vec<u8>) -> Self {
        *self.compiled_program.borrow_mut() = program;
        self
    }

    pub fn with_application_index(self, app_id: u64) -> Self {
        self.application_index.set(Some(app_id));
        self
    }

    pub fn with_asset_index(self, asset_id: u64) -> Self {
        self.asset_index.set(Some(asset_id));
        self
    }

    pub fn calls(&self) -> AlgodCallCounts {
        *self.calls.borrow()
    }

    /// Every submission, in order, as the signed envelopes it contained.
    pub fn submissions(&self) -> Vec<Vec<SignedTransaction>> {
        self.submissions.borrow().clone()
    }

    pub fn last_submission(&self) -> Option<Vec<SignedTransaction>> {
        self.submissions.borrow().last().cloned()
    }
}

impl AlgodApi for StubAlgod {
    fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
        self.calls.borrow_mut().suggested_params += 1;
        Ok(self.params.borrow().clone())
    }

    fn send_transactions(&self, signed: &[SignedTransaction]) -> Result<String, ClientError> {
        self.calls.borrow_mut().submissions += 1;
        self.submissions.borrow_mut().push(signed.to_vec());
        first_transaction_id(signed)
    }

    fn pending_transaction_info(&self, _txn_id: &str) -> Result<PendingTransaction, ClientError> {
        self.calls.borrow_mut().pending_info += 1;

        if let Some(reason) = self.pool_error.borrow().clone() {
            return Ok(PendingTransaction {
                pool_error: reason,
                ..Default::default()
            });
        }

        Ok(PendingTransaction {
            confirmed_round: self.confirmed_round.get(),
            application_index: self.application_index.get(),
            asset_index: self.asset_index.get(),
            ..Default::default()
        })
    }

    fn status(&self) -> Result<NodeStatus, ClientError> {
        self.calls.borrow_mut().status += 1;
        Ok(NodeStatus {
            last_round: self.last_round.get(),
        })
    }

    fn status_after_round(&self, round: u64) -> Result<NodeStatus, ClientError> {
        self.calls.borrow_mut().status_after_round += 1;
        Ok(NodeStatus {
            last_round: round + 1,
        })
    }

    fn compile_teal(&self, _source: &str) -> Result<Vec<u8>, ClientError> {
        self.calls.borrow_mut().compile += 1;
        Ok(self.compiled_program.borrow().clone())
    }
}

/// An in-memory indexer with canned records and optional injected lag.
#[derive(Default)]
pub struct StubIndexer {
    accounts: RefCell<Vec<AccountInfo>>,
    applications: RefCell<HashMap<u64, ApplicationInfo>>,
    assets: RefCell<HashMap<u64, AssetRecord>>,
    transactions: RefCell<HashMap<String, serde_json::Value>>,
    transient_failures: Cell<usize>,
    pub(crate) lookups: Cell<usize>,
}

impl StubIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` lookups fail with a transient 404, the way a
    /// lagging query tier does.
    pub fn lagging_for(self, count: usize) -> Self {
        self.transient_failures.set(count);
        self
    }

    pub fn with_account(self, account: AccountInfo) -> Self {
        self.accounts.borrow_mut().push(account);
        self
    }

    pub fn with_application(self, app: ApplicationInfo) -> Self {
        self.applications.borrow_mut().insert(app.id, app);
        self
    }

    pub fn with_asset(self, asset: AssetRecord) -> Self {
        self.assets.borrow_mut().insert(asset.index, asset);
        self
    }

    pub fn with_transaction(self, txn_id: impl Into<String>, record: serde_json::Value) -> Self {
        self.transactions.borrow_mut().insert(txn_id.into(), record);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    fn gate(&self) -> Result<(), ClientError> {
        self.lookups.set(self.lookups.get() + 1);
        let remaining = self.transient_failures.get();
        if remaining > 0 {
            self.transient_failures.set(remaining - 1);
            return Err(ClientError::Api {
                status: 404,
                message: "indexer has not caught up".into(),
            });
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            message: "no such record".into(),
        }
    }
}

impl IndexerApi for StubIndexer {
    fn account_info(&self, address: &Address) -> Result<AccountInfo, ClientError> {
        self.gate()?;
        let wanted = address.to_string();
        self.accounts
            .borrow()
            .iter()
            .find(|account| account.address == wanted)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn application_info(&self, app_id: u64) -> Result<ApplicationInfo, ClientError> {
        self.gate()?;
        self.applications
            .borrow()
            .get(&app_id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn asset_info(&self, asset_id: u64) -> Result<AssetRecord, ClientError> {
        self.gate()?;
        self.assets
            .borrow()
            .get(&asset_id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn transaction_info(&self, txn_id: &str) -> Result<serde_json::Value, ClientError> {
        self.gate()?;
        self.transactions
            .borrow()
            .get(txn_id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn accounts(&self) -> Result<Vec<AccountInfo>, ClientError> {
        self.gate()?;
        Ok(self.accounts.borrow().clone())
    }
}

// Shared handles let a test keep inspecting a stub after handing it to a
// fixture that takes ownership.
impl AlgodApi for std::rc::Rc<StubAlgod> {
    fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
        (**self).suggested_params()
    }

    fn send_transactions(&self, signed: &[SignedTransaction]) -> Result<String, ClientError> {
        (**self).send_transactions(signed)
    }

    fn pending_transaction_info(&self, txn_id: &str) -> Result<PendingTransaction, ClientError> {
        (**self).pending_transaction_info(txn_id)
    }

    fn status(&self) -> Result<NodeStatus, ClientError> {
        (**self).status()
    }

    fn status_after_round(&self, round: u64) -> Result<NodeStatus, ClientError> {
        (**self).status_after_round(round)
    }

    fn compile_teal(&self, source: &str) -> Result<Vec<u8>, ClientError> {
        (**self).compile_teal(source)
    }
}

impl IndexerApi for std::rc::Rc<StubIndexer> {
    fn account_info(&self, address: &Address) -> Result<AccountInfo, ClientError> {
        (**self).account_info(address)
    }

    fn application_info(&self, app_id: u64) -> Result<ApplicationInfo, ClientError> {
        (**self).application_info(app_id)
    }

    fn asset_info(&self, asset_id: u64) -> Result<AssetRecord, ClientError> {
        (**self).asset_info(asset_id)
    }

    fn transaction_info(&self, txn_id: &str) -> Result<serde_json::Value, ClientError> {
        (**self).transaction_info(txn_id)
    }

    fn accounts(&self) -> Result<Vec<AccountInfo>, ClientError> {
        (**self).accounts()
    }
}

/// The suggested parameters a testnet node would hand out, fee-per-byte
/// zero so stub-built transactions fall back to the minimum fee.
pub fn testnet_params() -> SuggestedParams {
    SuggestedParams {
        fee: 0,
        min_fee: 1000,
        flat_fee: false,
        first_valid: 1,
        last_valid: 1001,
        genesis_id: "testnet-v1.0".to_string(),
        genesis_hash: BASE64_STANDARD
            .decode("SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=")
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .unwrap_or([0u8; 32]),
    }
}

// The id algod would answer with: the id of the first submitted envelope.
fn first_transaction_id(
    signed: &[SignedTransaction],
) -> Result<String, ClientError> {
    signed
        .first()
        .ok_or_else(|| ClientError::Transport {
            message: "no transactions to submit".into(),
        })?
        .id()
        .map_err(|e| ClientError::Encoding {
            message: e.to_string(),
        })
}
