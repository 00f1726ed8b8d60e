//! Application call transactions: create, update, delete, opt-in, close-out,
//! clear-state, and plain no-op calls against a smart contract.

use crate::constants::{MAX_EXTRA_PROGRAM_PAGES, MAX_GLOBAL_STATE_KEYS, MAX_LOCAL_STATE_KEYS};
use crate::traits::MsgPackEmpty;
use crate::transactions::common::TransactionHeader;
use crate::utils::{is_empty_struct_opt, is_empty_vec_opt, is_zero, is_zero_opt};
use crate::Address;
use crate::Transaction;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::{serde_as, skip_serializing_none, Bytes};

/// What happens to the sender's application state when the call completes.
#[derive(Serialize_repr, Deserialize_repr, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[repr(u8)]
pub enum OnApplicationComplete {
    /// Plain call; no state transition beyond program execution.
    #[default]
    NoOp = 0,
    /// Allocate the sender's local state for this application.
    OptIn = 1,
    /// Deallocate local state, running the approval program.
    CloseOut = 2,
    /// Deallocate local state unconditionally via the clear program.
    ClearState = 3,
    /// Replace the application's programs.
    UpdateApplication = 4,
    /// Delete the application.
    DeleteApplication = 5,
}

fn is_noop(oc: &OnApplicationComplete) -> bool {
    *oc == OnApplicationComplete::NoOp
}

/// Storage allotment for an application: number of integer and byte-slice
/// values it may keep.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default, Copy)]
pub struct StateSchema {
    /// Number of integer values.
    #[serde(rename = "nui")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub num_uints: u64,

    /// Number of byte-slice values.
    #[serde(rename = "nbs")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    pub num_byte_slices: u64,
}

impl StateSchema {
    pub fn new(num_uints: u64, num_byte_slices: u64) -> Self {
        StateSchema {
            num_uints,
            num_byte_slices,
        }
    }
}

impl MsgPackEmpty for StateSchema {
    fn is_empty(&self) -> bool {
        self.num_uints == 0 && self.num_byte_slices == 0
    }
}

/// Calls an application, or creates one when `app_id` is zero.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Builder)]
#[builder(
    name = "ApplicationCallTransactionBuilder",
    setter(strip_option),
    build_fn(name = "build_fields", validate = "Self::validate")
)]
pub struct ApplicationCallTransactionFields {
    /// Common transaction header fields.
    #[serde(flatten)]
    pub header: TransactionHeader,

    /// The application being called; zero when creating a new application.
    #[serde(rename = "apid")]
    #[serde(skip_serializing_if = "is_zero")]
    #[serde(default)]
    #[builder(default)]
    pub app_id: u64,

    /// State transition requested by the call.
    #[serde(rename = "apan")]
    #[serde(skip_serializing_if = "is_noop")]
    #[serde(default)]
    #[builder(default)]
    pub on_complete: OnApplicationComplete,

    /// Compiled approval program; required on create and update.
    #[serde(rename = "apap")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Bytes>")]
    #[builder(default)]
    pub approval_program: Option<Vec<u8>>,

    /// Compiled clear-state program; required on create and update.
    #[serde(rename = "apsu")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Bytes>")]
    #[builder(default)]
    pub clear_state_program: Option<Vec<u8>>,

    /// Arguments handed to the program.
    #[serde(rename = "apaa")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[serde_as(as = "Option<Vec<Bytes>>")]
    #[builder(default)]
    pub args: Option<Vec<Vec<u8>>>,

    /// Accounts whose state the program may read.
    #[serde(rename = "apat")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[builder(default)]
    pub account_references: Option<Vec<Address>>,

    /// Other applications the program may read.
    #[serde(rename = "apfa")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[builder(default)]
    pub app_references: Option<Vec<u64>>,

    /// Assets the program may read.
    #[serde(rename = "apas")]
    #[serde(skip_serializing_if = "is_empty_vec_opt")]
    #[serde(default)]
    #[builder(default)]
    pub asset_references: Option<Vec<u64>>,

    /// Global storage allotment; only meaningful on create.
    #[serde(rename = "apgs")]
    #[serde(skip_serializing_if = "is_empty_struct_opt")]
    #[serde(default)]
    #[builder(default)]
    pub global_schema: Option<StateSchema>,

    /// Per-account storage allotment; only meaningful on create.
    #[serde(rename = "apls")]
    #[serde(skip_serializing_if = "is_empty_struct_opt")]
    #[serde(default)]
    #[builder(default)]
    pub local_schema: Option<StateSchema>,

    /// Additional program pages beyond the first, for large programs.
    #[serde(rename = "apep")]
    #[serde(skip_serializing_if = "is_zero_opt")]
    #[serde(default)]
    #[builder(default)]
    pub extra_pages: Option<u32>,
}

impl ApplicationCallTransactionBuilder {
    fn validate(&self) -> Result<(), String> {
        let creating = matches!(self.app_id, None | Some(0));
        let updating = matches!(
            self.on_complete,
            Some(OnApplicationComplete::UpdateApplication)
        );
        if creating || updating {
            let has_programs = matches!(&self.approval_program, Some(Some(p)) if !p.is_empty())
                && matches!(&self.clear_state_program, Some(Some(p)) if !p.is_empty());
            if !has_programs {
                return Err(
                    "Application create and update require approval and clear programs".into(),
                );
            }
        }

        if let Some(Some(pages)) = self.extra_pages {
            if pages > MAX_EXTRA_PROGRAM_PAGES {
                return Err(format!(
                    "Extra program pages must not exceed {MAX_EXTRA_PROGRAM_PAGES}"
                ));
            }
        }
        if let Some(Some(schema)) = &self.global_schema {
            if schema.num_uints + schema.num_byte_slices > MAX_GLOBAL_STATE_KEYS {
                return Err(format!(
                    "Global state schema must not exceed {MAX_GLOBAL_STATE_KEYS} keys"
                ));
            }
        }
        if let Some(Some(schema)) = &self.local_schema {
            if schema.num_uints + schema.num_byte_slices > MAX_LOCAL_STATE_KEYS {
                return Err(format!(
                    "Local state schema must not exceed {MAX_LOCAL_STATE_KEYS} keys"
                ));
            }
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Transaction, ApplicationCallTransactionBuilderError> {
        self.build_fields().map(Transaction::ApplicationCall)
    }
}
