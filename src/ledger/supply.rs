//! Issuance counters per asset

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::capability::{ensure_asset, BurnCap, MintCap};
use crate::error::{LedgerError, LedgerResult};
use crate::types::AssetId;

/// `current <= maximum` whenever a maximum is set
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Supply {
    pub current: u64,
    pub maximum: Option<u64>,
}

impl Supply {
    pub fn new(maximum: Option<u64>) -> Self {
        Self { current: 0, maximum }
    }

    /// Supply after adding `amount`, or why it cannot be added.
    fn checked_increase(&self, amount: u64) -> LedgerResult<u64> {
        let next = self.current.checked_add(amount).ok_or_else(|| {
            LedgerError::OutOfRange(format!(
                "supply {} + {} overflows u64",
                self.current, amount
            ))
        })?;
        if let Some(max) = self.maximum {
            if next > max {
                return Err(LedgerError::OutOfRange(format!(
                    "supply {} + {} exceeds maximum {}",
                    self.current, amount, max
                )));
            }
        }
        Ok(next)
    }

    fn checked_decrease(&self, amount: u64) -> LedgerResult<u64> {
        self.current.checked_sub(amount).ok_or_else(|| {
            LedgerError::InvalidArgument(format!(
                "cannot decrease supply {} by {}",
                self.current, amount
            ))
        })
    }
}

fn ensure_positive(amount: u64) -> LedgerResult<()> {
    if amount == 0 {
        return Err(LedgerError::InvalidArgument(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Current/maximum supply for every asset the ledger knows.
#[derive(Debug, Default, Clone)]
pub struct SupplyTracker {
    supplies: HashMap<AssetId, Supply>,
}

impl SupplyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, asset: AssetId, maximum: Option<u64>) -> LedgerResult<()> {
        if self.supplies.contains_key(&asset) {
            return Err(LedgerError::AlreadyExists(format!("supply for {}", asset)));
        }
        self.supplies.insert(asset, Supply::new(maximum));
        Ok(())
    }

    pub fn contains(&self, asset: AssetId) -> bool {
        self.supplies.contains_key(&asset)
    }

    pub fn get(&self, asset: AssetId) -> LedgerResult<&Supply> {
        self.supplies
            .get(&asset)
            .ok_or_else(|| LedgerError::NotFound(format!("supply for {}", asset)))
    }

    pub fn current_supply(&self, asset: AssetId) -> LedgerResult<u64> {
        Ok(self.get(asset)?.current)
    }

    pub fn maximum_supply(&self, asset: AssetId) -> LedgerResult<Option<u64>> {
        Ok(self.get(asset)?.maximum)
    }

    /// Validate an increase without applying it.
    pub(crate) fn check_increase(&self, cap: &MintCap, asset: AssetId, amount: u64) -> LedgerResult<u64> {
        ensure_asset("mint", cap.asset(), asset)?;
        ensure_positive(amount)?;
        self.get(asset)?.checked_increase(amount)
    }

    /// Validate a decrease without applying it.
    pub(crate) fn check_decrease(&self, cap: &BurnCap, asset: AssetId, amount: u64) -> LedgerResult<u64> {
        ensure_asset("burn", cap.asset(), asset)?;
        ensure_positive(amount)?;
        self.get(asset)?.checked_decrease(amount)
    }

    pub fn increase(&mut self, cap: &MintCap, asset: AssetId, amount: u64) -> LedgerResult<u64> {
        let next = self.check_increase(cap, asset, amount)?;
        self.set_current(asset, next);
        Ok(next)
    }

    pub fn decrease(&mut self, cap: &BurnCap, asset: AssetId, amount: u64) -> LedgerResult<u64> {
        let next = self.check_decrease(cap, asset, amount)?;
        self.set_current(asset, next);
        Ok(next)
    }

    fn set_current(&mut self, asset: AssetId, current: u64) {
        if let Some(supply) = self.supplies.get_mut(&asset) {
            supply.current = current;
        }
    }
}
