//! The test fixture: clients, a funding account, funded test accounts, and
//! scoped cleanup guards for deployed applications and assets.

use crate::accounts::AlgoAccount;
use crate::clients::{AlgodApi, AlgodClient, IndexerApi, IndexerClient};
use crate::config::ClientConfig;
use crate::error::TxnError;
use crate::retry::{with_retry, RetryPolicy};
use crate::transactions::{
    delete_app, destroy_asset, payment_transaction, CommonParams, PaymentExtras,
};
use algotest_transact::{Address, Byte32};
use log::warn;
use std::str::FromStr;

/// Funding given to a generated account, in microALGO.
pub const DEFAULT_INITIAL_FUNDS: u64 = 1_000_000_000;

/// Owns the network facades and the funding account test accounts draw from.
pub struct TestFixture {
    algod: Box<dyn AlgodApi>,
    indexer: Box<dyn IndexerApi>,
    retry: RetryPolicy,
    funder: Option<AlgoAccount>,
}

impl TestFixture {
    /// Builds a fixture from explicit facades, usually the stubs.
    pub fn new(algod: Box<dyn AlgodApi>, indexer: Box<dyn IndexerApi>, retry: RetryPolicy) -> Self {
        TestFixture {
            algod,
            indexer,
            retry,
            funder: None,
        }
    }

    /// Builds a fixture against the environment-configured (or localnet)
    /// endpoints.
    pub fn from_env() -> Self {
        let config = ClientConfig::from_env_or_localnet();
        let retry = RetryPolicy::indexer(config.indexer_timeout);
        TestFixture {
            algod: Box::new(AlgodClient::from_config(&config)),
            indexer: Box::new(IndexerClient::from_config(&config)),
            retry,
            funder: None,
        }
    }

    pub fn algod(&self) -> &dyn AlgodApi {
        self.algod.as_ref()
    }

    pub fn indexer(&self) -> &dyn IndexerApi {
        self.indexer.as_ref()
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Installs the account that funds and reabsorbs test accounts. It must
    /// be able to sign.
    pub fn set_funder(&mut self, funder: AlgoAccount) -> Result<(), TxnError> {
        if !funder.has_signing_key() {
            return Err(TxnError::configuration(
                "the funding account must hold a signing key",
            ));
        }
        self.funder = Some(funder.named("funder"));
        Ok(())
    }

    /// The funding account, or a configuration error when none was set up.
    pub fn funder(&self) -> Result<&AlgoAccount, TxnError> {
        self.funder.as_ref().ok_or_else(|| {
            TxnError::configuration(
                "no funding account available; call set_funder or adopt_funder first",
            )
        })
    }

    /// Locates the network's genesis funding account through the indexer:
    /// the online account present since round 0.
    pub fn initial_funds_address(&self) -> Result<Address, TxnError> {
        let accounts = with_retry(&self.retry, || self.indexer.accounts())?;

        let genesis = accounts
            .iter()
            .find(|account| account.created_at_round == Some(0) && account.status == "Online")
            .ok_or_else(|| {
                TxnError::configuration("no online genesis account found in the indexer")
            })?;

        Address::from_str(&genesis.address).map_err(|e| TxnError::configuration(e.to_string()))
    }

    /// Adopts the discovered genesis account as the funder, using the seed
    /// the embedding harness exported for it.
    pub fn adopt_funder(&mut self, seed: &Byte32) -> Result<&AlgoAccount, TxnError> {
        let expected = self.initial_funds_address()?;
        let funder = AlgoAccount::from_seed(seed);
        if funder.address() != &expected {
            return Err(TxnError::configuration(format!(
                "seed does not belong to the genesis account {expected}"
            )));
        }

        self.set_funder(funder)?;
        self.funder()
    }

    /// A fresh unfunded keypair account.
    pub fn generate_account(&self) -> AlgoAccount {
        AlgoAccount::generate()
    }

    /// A fresh account funded with [`DEFAULT_INITIAL_FUNDS`].
    pub fn generate_funded_account(&self) -> Result<AlgoAccount, TxnError> {
        let account = AlgoAccount::generate();
        self.fund_account(&account, DEFAULT_INITIAL_FUNDS)?;
        Ok(account)
    }

    /// Moves `amount` microALGO from the funder to `receiver`.
    pub fn fund_account(&self, receiver: &AlgoAccount, amount: u64) -> Result<(), TxnError> {
        let funder = self.funder()?;
        let extras = PaymentExtras {
            common: CommonParams::with_note("Initial funds"),
            ..Default::default()
        };
        payment_transaction(self.algod.as_ref(), funder, receiver, amount, &extras)?;
        Ok(())
    }

    /// Returns an account's entire balance to the funder, closing it out.
    pub fn defund_account(&self, account: &AlgoAccount) -> Result<(), TxnError> {
        let funder = self.funder()?;
        let extras = PaymentExtras {
            common: CommonParams::with_note("Returning funds"),
            close_remainder_to: Some(funder.clone()),
        };
        payment_transaction(self.algod.as_ref(), account, funder, 0, &extras)?;
        Ok(())
    }
}

/// A deployed application: its id and the account that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedApp {
    pub id: u64,
    pub owner: AlgoAccount,
}

/// A created asset: its id and the account that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedAsset {
    pub id: u64,
    pub owner: AlgoAccount,
}

/// Deletes the application when the guard goes out of scope.
pub struct AppGuard<'a> {
    algod: &'a dyn AlgodApi,
    app: DeployedApp,
}

impl<'a> AppGuard<'a> {
    pub fn new(algod: &'a dyn AlgodApi, app: DeployedApp) -> Self {
        AppGuard { algod, app }
    }

    pub fn id(&self) -> u64 {
        self.app.id
    }

    pub fn app(&self) -> &DeployedApp {
        &self.app
    }
}

impl Drop for AppGuard<'_> {
    fn drop(&mut self) {
        let result = delete_app(
            self.algod,
            &self.app.owner,
            self.app.id,
            &Default::default(),
        );
        if let Err(err) = result {
            warn!("failed to delete app {} on scope exit: {err}", self.app.id);
        }
    }
}

/// Destroys the asset when the guard goes out of scope.
pub struct AssetGuard<'a> {
    algod: &'a dyn AlgodApi,
    asset: DeployedAsset,
}

impl<'a> AssetGuard<'a> {
    pub fn new(algod: &'a dyn AlgodApi, asset: DeployedAsset) -> Self {
        AssetGuard { algod, asset }
    }

    pub fn id(&self) -> u64 {
        self.asset.id
    }

    pub fn asset(&self) -> &DeployedAsset {
        &self.asset
    }
}

impl Drop for AssetGuard<'_> {
    fn drop(&mut self) {
        let result = destroy_asset(
            self.algod,
            &self.asset.owner,
            self.asset.id,
            &Default::default(),
        );
        if let Err(err) = result {
            warn!(
                "failed to destroy asset {} on scope exit: {err}",
                self.asset.id
            );
        }
    }
}
