//! Test support shipped with the library: scripted facade stubs, the
//! funded-account fixture, and scoped cleanup guards.

mod fixture;
mod stubs;

pub use fixture::{
    AppGuard, AssetGuard, DeployedApp, DeployedAsset, TestFixture, DEFAULT_INITIAL_FUNDS,
};
pub use stubs::{testnet_params, AlgodCallCounts, StubAlgod, StubIndexer};
