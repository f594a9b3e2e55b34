//! Sub-account creation on demand and deletion when empty

use super::index::AccountIndex;
use super::journal::LedgerEvent;
use super::store::{Ledger, SubAccount};
use crate::error::{LedgerError, LedgerResult};
use crate::registry::ObjectRegistry;
use crate::types::{Address, AssetId, SubAccountId};

impl<R: ObjectRegistry> Ledger<R> {
    /// Create an empty index for `owner` if there is none.
    pub fn ensure_index(&mut self, owner: Address) -> &mut AccountIndex {
        self.indices.entry(owner).or_default()
    }

    /// Look up the owner's sub-account for `asset`, creating it when
    /// `create_on_demand` is set.
    ///
    /// A new sub-account is a registry entry owned by `owner` whose ungated
    /// transfer is disabled: ownership lives in the index, not in the entity.
    pub fn get_or_create_subaccount(
        &mut self,
        owner: Address,
        asset: AssetId,
        create_on_demand: bool,
    ) -> LedgerResult<SubAccountId> {
        if let Some(id) = self.subaccount_id(owner, asset) {
            return Ok(id);
        }
        if !create_on_demand {
            return Err(LedgerError::NotFound(format!(
                "no {} sub-account for {}",
                asset, owner
            )));
        }
        self.ensure_asset_known(asset)?;

        let id = self.registry.create_entity(owner);
        let delete_cap = self.registry.generate_delete_capability(id)?;
        self.registry.disable_ungated_transfer(id)?;

        self.accounts.insert(
            id,
            SubAccount {
                asset_id: asset,
                owner,
                balance: 0,
                frozen: false,
                delete_cap,
            },
        );
        self.ensure_index(owner).register(asset, id);

        tracing::info!("📒 Sub-account {} opened for {} ({})", id, owner, asset);
        self.journal.record(LedgerEvent::SubAccountCreated {
            owner,
            asset,
            account: id,
        });
        Ok(id)
    }

    /// Explicitly provision the owner's sub-account for `asset`.
    pub fn provision(&mut self, owner: Address, asset: AssetId) -> LedgerResult<SubAccountId> {
        self.get_or_create_subaccount(owner, asset, true)
    }

    /// Remove an unfrozen sub-account that holds nothing. Moves no value,
    /// so anyone may call it; this is the way to reclaim a sub-account that
    /// was emptied while frozen and later unfrozen.
    pub fn prune_empty(&mut self, owner: Address, asset: AssetId) -> LedgerResult<()> {
        let id = self.get_or_create_subaccount(owner, asset, false)?;
        let account = self.account(id)?;
        if account.balance != 0 {
            return Err(LedgerError::InvalidArgument(format!(
                "sub-account {} still holds {}",
                id, account.balance
            )));
        }
        if account.frozen {
            return Err(LedgerError::InvalidArgument(format!(
                "sub-account {} is frozen",
                id
            )));
        }
        self.delete_subaccount(owner, asset, id);
        Ok(())
    }

    /// Garbage-collect after a withdrawal: balance zero and not frozen.
    pub(crate) fn retire_if_empty(&mut self, owner: Address, asset: AssetId) {
        let Some(id) = self.subaccount_id(owner, asset) else {
            return;
        };
        let retire = self
            .accounts
            .get(&id)
            .is_some_and(|a| a.balance == 0 && !a.frozen);
        if retire {
            self.delete_subaccount(owner, asset, id);
        }
    }

    fn delete_subaccount(&mut self, owner: Address, asset: AssetId, id: SubAccountId) {
        if let Some(index) = self.indices.get_mut(&owner) {
            index.unregister(asset);
        }
        let Some(account) = self.accounts.remove(&id) else {
            return;
        };
        // Ledger state is already consistent; a registry failure only leaks
        // the entity record.
        if let Err(e) = self.registry.delete_entity(account.delete_cap) {
            tracing::error!("Failed to delete sub-account entity {}: {}", id, e);
            self.leaked.push(id);
            self.journal.record(LedgerEvent::EntityLeaked {
                owner,
                asset,
                account: id,
                reason: e.to_string(),
            });
        }
        tracing::info!("🗑️ Sub-account {} closed for {} ({})", id, owner, asset);
        self.journal.record(LedgerEvent::SubAccountDeleted {
            owner,
            asset,
            account: id,
        });
    }
}
