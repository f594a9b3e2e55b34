//! Per-owner map from asset to sub-account

use std::collections::BTreeMap;

use crate::types::{AssetId, SubAccountId};

/// One entry per asset the owner holds a live sub-account for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountIndex {
    entries: BTreeMap<AssetId, SubAccountId>,
}

impl AccountIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, asset: AssetId) -> Option<SubAccountId> {
        self.entries.get(&asset).copied()
    }

    pub fn contains(&self, asset: AssetId) -> bool {
        self.entries.contains_key(&asset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetId, SubAccountId)> + '_ {
        self.entries.iter().map(|(asset, account)| (*asset, *account))
    }

    /// Returns false (and changes nothing) if `asset` already has an entry.
    pub(crate) fn register(&mut self, asset: AssetId, account: SubAccountId) -> bool {
        if self.entries.contains_key(&asset) {
            return false;
        }
        self.entries.insert(asset, account);
        true
    }

    pub(crate) fn unregister(&mut self, asset: AssetId) -> Option<SubAccountId> {
        self.entries.remove(&asset)
    }
}
