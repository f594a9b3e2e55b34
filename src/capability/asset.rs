//! Per-asset holder for mint/freeze/burn capabilities

use super::slot::Slot;
use super::{check_flags, ensure_asset, BurnCap, FreezeCap, MintCap};
use crate::error::{LedgerResult, Rejected};
use crate::types::AssetId;

/// At most one capability of each kind, all bound to `asset_id`.
///
/// Lives on the asset's record inside the ledger. Reaching it goes through
/// `Ledger::asset_capabilities{,_mut}`, which checks the caller owns the asset.
#[derive(Debug)]
pub struct AssetCapabilities {
    asset_id: AssetId,
    mint: Slot<MintCap>,
    freeze: Slot<FreezeCap>,
    burn: Slot<BurnCap>,
}

impl AssetCapabilities {
    pub fn new(asset_id: AssetId) -> Self {
        Self {
            asset_id,
            mint: Slot::Empty,
            freeze: Slot::Empty,
            burn: Slot::Empty,
        }
    }

    /// Flags are `[mint, freeze, burn]`. Crate-private: this fabricates
    /// capabilities, so only asset creation may call it.
    pub(crate) fn new_from_flags(asset_id: AssetId, flags: &[bool]) -> LedgerResult<Self> {
        let [mint, freeze, burn] = check_flags(flags)?;
        let mut caps = Self::new(asset_id);
        if mint {
            caps.mint = Slot::Occupied(MintCap::new(asset_id));
        }
        if freeze {
            caps.freeze = Slot::Occupied(FreezeCap::new(asset_id));
        }
        if burn {
            caps.burn = Slot::Occupied(BurnCap::new(asset_id));
        }
        Ok(caps)
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    pub fn add_mint(&mut self, cap: MintCap) -> Result<(), Rejected<MintCap>> {
        if let Err(e) = ensure_asset("mint", cap.asset(), self.asset_id) {
            return Err(Rejected::new(e, cap));
        }
        self.mint.fill(cap, "mint").map_err(|(e, cap)| Rejected::new(e, cap))
    }

    pub fn borrow_mint(&self) -> LedgerResult<&MintCap> {
        self.mint.get("mint")
    }

    pub fn extract_mint(&mut self) -> LedgerResult<MintCap> {
        self.mint.take("mint")
    }

    pub fn contains_mint(&self) -> bool {
        self.mint.is_occupied()
    }

    pub fn add_freeze(&mut self, cap: FreezeCap) -> Result<(), Rejected<FreezeCap>> {
        if let Err(e) = ensure_asset("freeze", cap.asset(), self.asset_id) {
            return Err(Rejected::new(e, cap));
        }
        self.freeze
            .fill(cap, "freeze")
            .map_err(|(e, cap)| Rejected::new(e, cap))
    }

    pub fn borrow_freeze(&self) -> LedgerResult<&FreezeCap> {
        self.freeze.get("freeze")
    }

    pub fn extract_freeze(&mut self) -> LedgerResult<FreezeCap> {
        self.freeze.take("freeze")
    }

    pub fn contains_freeze(&self) -> bool {
        self.freeze.is_occupied()
    }

    pub fn add_burn(&mut self, cap: BurnCap) -> Result<(), Rejected<BurnCap>> {
        if let Err(e) = ensure_asset("burn", cap.asset(), self.asset_id) {
            return Err(Rejected::new(e, cap));
        }
        self.burn.fill(cap, "burn").map_err(|(e, cap)| Rejected::new(e, cap))
    }

    pub fn borrow_burn(&self) -> LedgerResult<&BurnCap> {
        self.burn.get("burn")
    }

    pub fn extract_burn(&mut self) -> LedgerResult<BurnCap> {
        self.burn.take("burn")
    }

    pub fn contains_burn(&self) -> bool {
        self.burn.is_occupied()
    }
}
