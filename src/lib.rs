//! Compass capability-gated object ledger
//!
//! Two halves:
//! - capabilities: at-most-one-per-kind tokens bound to a registry entity
//!   (extend/transfer/delete) or to a fungible asset (mint/freeze/burn)
//! - ledger: per-owner sub-accounts, linear `CashValue` transfer units and
//!   capability-gated supply accounting

pub mod capability;
pub mod config;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod telemetry;
pub mod types;

pub use capability::{
    AssetCapabilities, BurnCap, CapabilityBundle, DeleteCap, ExtendCap, FreezeCap, MintCap, Slot,
    TransferCap,
};
pub use config::LedgerConfig;
pub use error::{ConfigError, LedgerError, LedgerResult, Rejected};
pub use ledger::{merge, AccountIndex, CashValue, Ledger, LedgerEvent, SharedLedger, Supply};
pub use registry::{FixedIdentity, Identity, InMemoryRegistry, ObjectRegistry};
pub use types::{Address, AssetId, EntityId, SubAccountId};
