//! Asset operations: create, reconfigure, destroy, freeze, and the three
//! holding-level transfers.

use crate::accounts::AlgoAccount;
use crate::clients::AlgodApi;
use crate::error::TxnError;
use crate::transactions::common::{finalize_fee, header_for, require_params, CommonParams};
use crate::transactions::composites::TxnElement;
use crate::transactions::pipeline::{run_transaction, TxnOptions, TxnOutcome};
use algotest_transact::{
    Address, AssetConfigTransactionBuilder, AssetFreezeTransactionBuilder, AssetParams,
    AssetTransferTransactionBuilder, Byte32,
};

/// Parameters of a new asset.
#[derive(Debug, Default, Clone)]
pub struct AssetSpec {
    pub asset_name: String,
    pub unit_name: String,
    /// Total base units to mint.
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub manager: Option<AlgoAccount>,
    pub reserve: Option<AlgoAccount>,
    pub freeze: Option<AlgoAccount>,
    pub clawback: Option<AlgoAccount>,
    pub url: String,
    pub metadata_hash: Option<Byte32>,
}

/// New role assignments for [`update_asset`]; a `None` keeps the role
/// cleared (the builder receives the concrete zero address).
#[derive(Debug, Default, Clone)]
pub struct AssetRoles {
    pub manager: Option<AlgoAccount>,
    pub reserve: Option<AlgoAccount>,
    pub freeze: Option<AlgoAccount>,
    pub clawback: Option<AlgoAccount>,
}

/// Optional arguments of [`transfer_asset`].
#[derive(Debug, Default, Clone)]
pub struct AssetTransferExtras {
    pub common: CommonParams,
    /// Close the sender's holding out to this account after the transfer.
    pub close_assets_to: Option<AlgoAccount>,
    /// Clawback source; usable only by the asset's clawback account.
    pub revocation_target: Option<AlgoAccount>,
}

fn address_of(account: &Option<AlgoAccount>) -> Option<Address> {
    account.as_ref().map(|a| a.address().clone())
}

/// Mints a new asset and returns its id.
pub fn create_asset(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    spec: &AssetSpec,
    common: &CommonParams,
) -> Result<TxnOutcome<u64>, TxnError> {
    let options = TxnOptions {
        format_finish: Some(|info| {
            format!("asset-id={}", info.asset_index.unwrap_or_default())
        }),
        extract: Some(|info| info.asset_index.unwrap_or_default()),
        ..Default::default()
    };
    let explicit_params = common.params.clone();
    let sender = sender.clone();
    let spec = spec.clone();
    let common = common.clone();

    run_transaction(algod, "create_asset", &options, explicit_params, move |params| {
        let params = require_params(params)?;
        let header = header_for(&sender, &params, &common)?;

        let asset_params = AssetParams {
            total: spec.total,
            decimals: spec.decimals,
            default_frozen: spec.default_frozen.then_some(true),
            unit_name: Some(spec.unit_name.clone()).filter(|s| !s.is_empty()),
            asset_name: Some(spec.asset_name.clone()).filter(|s| !s.is_empty()),
            url: Some(spec.url.clone()).filter(|s| !s.is_empty()),
            metadata_hash: spec.metadata_hash,
            manager: address_of(&spec.manager),
            reserve: address_of(&spec.reserve),
            freeze: address_of(&spec.freeze),
            clawback: address_of(&spec.clawback),
        };

        let txn = AssetConfigTransactionBuilder::default()
            .header(header)
            .params(asset_params)
            .build()
            .map_err(|e| TxnError::construction(e.to_string()))?;
        Ok(TxnElement::plain(sender, finalize_fee(txn, &params)?))
    })
}

/// Rewrites an asset's mutable role addresses.
pub fn update_asset(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    asset_id: u64,
    roles: &AssetRoles,
    common: &CommonParams,
) -> Result<TxnOutcome<()>, TxnError> {
    let options = TxnOptions {
        format_finish: Some(|info| {
            format!("asset-id={}", info.txn_field_u64("caid").unwrap_or_default())
        }),
        ..Default::default()
    };
    let explicit_params = common.params.clone();
    let sender = sender.clone();
    let roles = roles.clone();
    let common = common.clone();

    run_transaction(algod, "update_asset", &options, explicit_params, move |params| {
        let params = require_params(params)?;
        let header = header_for(&sender, &params, &common)?;

        let asset_params = AssetParams {
            manager: address_of(&roles.manager),
            reserve: address_of(&roles.reserve),
            freeze: address_of(&roles.freeze),
            clawback: address_of(&roles.clawback),
            ..Default::default()
        };

        let txn = AssetConfigTransactionBuilder::default()
            .header(header)
            .asset_id(asset_id)
            .params(asset_params)
            .build()
            .map_err(|e| TxnError::construction(e.to_string()))?;
        Ok(TxnElement::plain(sender, finalize_fee(txn, &params)?))
    })
}

/// Destroys an asset; every unit must be back with the creator.
pub fn destroy_asset(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    asset_id: u64,
    common: &CommonParams,
) -> Result<TxnOutcome<()>, TxnError> {
    let options = TxnOptions {
        format_finish: Some(|info| {
            format!("asset-id={}", info.txn_field_u64("caid").unwrap_or_default())
        }),
        ..Default::default()
    };
    let explicit_params = common.params.clone();
    let sender = sender.clone();
    let common = common.clone();

    run_transaction(algod, "destroy_asset", &options, explicit_params, move |params| {
        let params = require_params(params)?;
        let header = header_for(&sender, &params, &common)?;

        let txn = AssetConfigTransactionBuilder::default()
            .header(header)
            .asset_id(asset_id)
            .build()
            .map_err(|e| TxnError::construction(e.to_string()))?;
        Ok(TxnElement::plain(sender, finalize_fee(txn, &params)?))
    })
}

/// Freezes or unfreezes `target`'s holding of an asset.
pub fn freeze_asset(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    target: &AlgoAccount,
    new_freeze_state: bool,
    asset_id: u64,
    common: &CommonParams,
) -> Result<TxnOutcome<()>, TxnError> {
    let options = TxnOptions {
        format_finish: Some(|info| {
            format!(
                "asset-id={}",
                info.txn_field_u64("faid").unwrap_or_default()
            )
        }),
        ..Default::default()
    };
    let explicit_params = common.params.clone();
    let sender = sender.clone();
    let target = target.address().clone();
    let common = common.clone();

    run_transaction(algod, "freeze_asset", &options, explicit_params, move |params| {
        let params = require_params(params)?;
        let header = header_for(&sender, &params, &common)?;

        let mut builder = AssetFreezeTransactionBuilder::default();
        builder.header(header).asset_id(asset_id).freeze_target(target);
        if new_freeze_state {
            builder.frozen(true);
        }
        let txn = builder
            .build()
            .map_err(|e| TxnError::construction(e.to_string()))?;
        Ok(TxnElement::plain(sender, finalize_fee(txn, &params)?))
    })
}

/// Moves asset base units from `sender` to `receiver`.
pub fn transfer_asset(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    receiver: &AlgoAccount,
    amount: u64,
    asset_id: u64,
    extras: &AssetTransferExtras,
) -> Result<TxnOutcome<()>, TxnError> {
    let options = asset_id_options();
    let explicit_params = extras.common.params.clone();
    let sender = sender.clone();
    let receiver = receiver.address().clone();
    let extras = extras.clone();

    run_transaction(algod, "transfer_asset", &options, explicit_params, move |params| {
        let params = require_params(params)?;
        let header = header_for(&sender, &params, &extras.common)?;

        let mut builder = AssetTransferTransactionBuilder::default();
        builder
            .header(header)
            .asset_id(asset_id)
            .amount(amount)
            .receiver(receiver);
        if let Some(close_to) = &extras.close_assets_to {
            builder.close_remainder_to(close_to.address().clone());
        }
        if let Some(revoked) = &extras.revocation_target {
            builder.asset_sender(revoked.address().clone());
        }
        let txn = builder
            .build()
            .map_err(|e| TxnError::construction(e.to_string()))?;
        Ok(TxnElement::plain(sender, finalize_fee(txn, &params)?))
    })
}

/// Opts the sender in to an asset: a zero-amount transfer to itself.
pub fn opt_in_asset(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    asset_id: u64,
    common: &CommonParams,
) -> Result<TxnOutcome<()>, TxnError> {
    let extras = AssetTransferExtras {
        common: common.clone(),
        ..Default::default()
    };
    transfer_asset(algod, sender, sender, 0, asset_id, &extras)
}

/// Closes the sender's holding of an asset out to `receiver`.
pub fn close_out_asset(
    algod: &dyn AlgodApi,
    sender: &AlgoAccount,
    asset_id: u64,
    receiver: &AlgoAccount,
    common: &CommonParams,
) -> Result<TxnOutcome<()>, TxnError> {
    let extras = AssetTransferExtras {
        common: common.clone(),
        close_assets_to: Some(receiver.clone()),
        ..Default::default()
    };
    transfer_asset(algod, sender, receiver, 0, asset_id, &extras)
}

fn asset_id_options() -> TxnOptions<()> {
    TxnOptions {
        format_finish: Some(|info| {
            format!("asset-id={}", info.txn_field_u64("xaid").unwrap_or_default())
        }),
        ..Default::default()
    }
}
