//! Capability tokens and the containers that hold them
//!
//! Every capability is a linear token: it cannot be cloned or copied, and
//! only this crate can construct one. Entity capabilities (extend, transfer,
//! delete) are issued by the object registry; asset capabilities (mint,
//! freeze, burn) are issued once when the ledger creates an asset.

pub mod asset;
pub mod bundle;
pub mod slot;

pub use asset::AssetCapabilities;
pub use bundle::CapabilityBundle;
pub use slot::Slot;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{AssetId, EntityId};

/// Number of entries in an enablement vector.
pub const FLAG_COUNT: usize = 3;

pub(crate) fn check_flags(flags: &[bool]) -> LedgerResult<[bool; FLAG_COUNT]> {
    <[bool; FLAG_COUNT]>::try_from(flags).map_err(|_| {
        LedgerError::InvalidArgument(format!(
            "expected {} capability flags, got {}",
            FLAG_COUNT,
            flags.len()
        ))
    })
}

/// Authority to act as an entity when attaching new state to it
#[derive(Debug, PartialEq, Eq)]
pub struct ExtendCap {
    entity: EntityId,
}

/// Authority to move an entity even when ungated transfer is disabled
#[derive(Debug, PartialEq, Eq)]
pub struct TransferCap {
    entity: EntityId,
}

/// Authority to delete an entity. Consumed by the deletion.
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteCap {
    entity: EntityId,
}

impl ExtendCap {
    pub(crate) fn new(entity: EntityId) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

impl TransferCap {
    pub(crate) fn new(entity: EntityId) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

impl DeleteCap {
    pub(crate) fn new(entity: EntityId) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

/// Authority to increase an asset's supply and fabricate new value
#[derive(Debug, PartialEq, Eq)]
pub struct MintCap {
    asset: AssetId,
}

/// Authority to set the frozen flag on any holder's sub-account
#[derive(Debug, PartialEq, Eq)]
pub struct FreezeCap {
    asset: AssetId,
}

/// Authority to decrease an asset's supply and destroy value
#[derive(Debug, PartialEq, Eq)]
pub struct BurnCap {
    asset: AssetId,
}

impl MintCap {
    pub(crate) fn new(asset: AssetId) -> Self {
        Self { asset }
    }

    pub fn asset(&self) -> AssetId {
        self.asset
    }
}

impl FreezeCap {
    pub(crate) fn new(asset: AssetId) -> Self {
        Self { asset }
    }

    pub fn asset(&self) -> AssetId {
        self.asset
    }
}

impl BurnCap {
    pub(crate) fn new(asset: AssetId) -> Self {
        Self { asset }
    }

    pub fn asset(&self) -> AssetId {
        self.asset
    }
}

/// Reject a capability presented for the wrong asset.
pub(crate) fn ensure_asset(kind: &str, bound: AssetId, asset: AssetId) -> LedgerResult<()> {
    if bound != asset {
        return Err(LedgerError::InvalidArgument(format!(
            "{} capability is bound to {}, not {}",
            kind, bound, asset
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_flags_length() {
        assert_eq!(check_flags(&[true, false, true]).unwrap(), [true, false, true]);
        assert!(matches!(check_flags(&[true, false]), Err(LedgerError::InvalidArgument(_))));
        assert!(matches!(check_flags(&[false; 4]), Err(LedgerError::InvalidArgument(_))));
        assert!(check_flags(&[]).is_err());
    }
}
