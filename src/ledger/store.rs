//! Balance records and the operations that move value between them

use std::collections::HashMap;

use super::cash::CashValue;
use super::index::AccountIndex;
use super::journal::{Journal, LedgerEvent};
use super::supply::SupplyTracker;
use crate::capability::{ensure_asset, AssetCapabilities, BurnCap, DeleteCap, FreezeCap, MintCap};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult, Rejected};
use crate::registry::{Identity, InMemoryRegistry, ObjectRegistry};
use crate::types::{Address, AssetId, SubAccountId};

/// Balance of one asset held by one owner
#[derive(Debug)]
pub struct SubAccount {
    pub(crate) asset_id: AssetId,
    pub(crate) owner: Address,
    pub(crate) balance: u64,
    pub(crate) frozen: bool,
    // Consumed when the sub-account is garbage-collected
    pub(crate) delete_cap: DeleteCap,
}

impl SubAccount {
    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

/// The ledger service. Owns every piece of state it mutates: supply
/// counters, asset capabilities, per-owner indices, sub-accounts and the
/// registry entries behind them.
///
/// Each public operation is one indivisible transition on `&mut self`; all
/// preconditions are checked before anything is mutated.
pub struct Ledger<R: ObjectRegistry = InMemoryRegistry> {
    pub(crate) registry: R,
    pub(crate) supply: SupplyTracker,
    pub(crate) assets: HashMap<AssetId, AssetCapabilities>,
    pub(crate) indices: HashMap<Address, AccountIndex>,
    pub(crate) accounts: HashMap<SubAccountId, SubAccount>,
    pub(crate) journal: Journal,
    // Sub-accounts whose registry entity could not be deleted
    pub(crate) leaked: Vec<SubAccountId>,
}

impl Default for Ledger<InMemoryRegistry> {
    fn default() -> Self {
        Self::new(InMemoryRegistry::new())
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

impl<R: ObjectRegistry> Ledger<R> {
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, &LedgerConfig::default())
    }

    pub fn with_config(registry: R, config: &LedgerConfig) -> Self {
        Self {
            registry,
            supply: SupplyTracker::new(),
            assets: HashMap::new(),
            indices: HashMap::new(),
            accounts: HashMap::new(),
            journal: Journal::new(&config.journal),
            leaked: Vec::new(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    /// Closed sub-accounts whose registry entity is still allocated.
    pub fn leaked_entities(&self) -> &[SubAccountId] {
        &self.leaked
    }

    // --- Assets ---

    /// Create a fungible asset owned by the caller. `flags` enables
    /// `[mint, freeze, burn]` capabilities, which are attached to the asset
    /// and reachable through `asset_capabilities_mut`.
    pub fn create_asset(
        &mut self,
        caller: &dyn Identity,
        maximum: Option<u64>,
        flags: &[bool],
    ) -> LedgerResult<AssetId> {
        crate::capability::check_flags(flags)?;
        let creator = caller.current_caller();
        let entity = self.registry.create_entity(creator);
        self.install_asset(creator, AssetId::from_entity(entity), maximum, flags)
    }

    /// Like `create_asset`, at an address derived from the caller and
    /// `seed`. A seed can only be used once per creator.
    pub fn create_named_asset(
        &mut self,
        caller: &dyn Identity,
        seed: &[u8],
        maximum: Option<u64>,
        flags: &[bool],
    ) -> LedgerResult<AssetId> {
        crate::capability::check_flags(flags)?;
        let creator = caller.current_caller();
        let entity = self.registry.create_named_entity(creator, seed)?;
        self.install_asset(creator, AssetId::from_entity(entity), maximum, flags)
    }

    fn install_asset(
        &mut self,
        creator: Address,
        asset: AssetId,
        maximum: Option<u64>,
        flags: &[bool],
    ) -> LedgerResult<AssetId> {
        let caps = AssetCapabilities::new_from_flags(asset, flags)?;
        self.supply.register(asset, maximum)?;
        self.assets.insert(asset, caps);
        tracing::info!("🪙 Asset {} created by {} (max supply: {:?})", asset, creator, maximum);
        self.journal.record(LedgerEvent::AssetCreated {
            asset,
            creator,
            maximum,
        });
        Ok(asset)
    }

    pub fn asset_exists(&self, asset: AssetId) -> bool {
        self.assets.contains_key(&asset)
    }

    pub(crate) fn ensure_asset_known(&self, asset: AssetId) -> LedgerResult<()> {
        if !self.asset_exists(asset) {
            return Err(LedgerError::NotFound(format!("asset {}", asset)));
        }
        Ok(())
    }

    fn ensure_asset_owner(&self, caller: &dyn Identity, asset: AssetId) -> LedgerResult<()> {
        self.ensure_asset_known(asset)?;
        let owner = self.registry.resolve_owner(asset.entity())?;
        let who = caller.current_caller();
        if owner != who {
            tracing::warn!("Capability access to {} refused for {}", asset, who);
            return Err(LedgerError::PermissionDenied(format!(
                "{} is not the owner of asset {}",
                who, asset
            )));
        }
        Ok(())
    }

    /// Capabilities attached to `asset`; the caller must own the asset.
    pub fn asset_capabilities(
        &self,
        caller: &dyn Identity,
        asset: AssetId,
    ) -> LedgerResult<&AssetCapabilities> {
        self.ensure_asset_owner(caller, asset)?;
        self.assets
            .get(&asset)
            .ok_or_else(|| LedgerError::NotFound(format!("asset {}", asset)))
    }

    pub fn asset_capabilities_mut(
        &mut self,
        caller: &dyn Identity,
        asset: AssetId,
    ) -> LedgerResult<&mut AssetCapabilities> {
        self.ensure_asset_owner(caller, asset)?;
        self.assets
            .get_mut(&asset)
            .ok_or_else(|| LedgerError::NotFound(format!("asset {}", asset)))
    }

    pub fn supply(&self) -> &SupplyTracker {
        &self.supply
    }

    pub fn current_supply(&self, asset: AssetId) -> LedgerResult<u64> {
        self.supply.current_supply(asset)
    }

    pub fn maximum_supply(&self, asset: AssetId) -> LedgerResult<Option<u64>> {
        self.supply.maximum_supply(asset)
    }

    // --- Read-only views ---

    pub fn index(&self, owner: Address) -> Option<&AccountIndex> {
        self.indices.get(&owner)
    }

    pub fn subaccount_id(&self, owner: Address, asset: AssetId) -> Option<SubAccountId> {
        self.indices.get(&owner).and_then(|index| index.get(asset))
    }

    pub fn subaccount(&self, owner: Address, asset: AssetId) -> Option<&SubAccount> {
        self.subaccount_id(owner, asset)
            .and_then(|id| self.accounts.get(&id))
    }

    /// Zero when the owner has no sub-account for `asset`.
    pub fn balance(&self, owner: Address, asset: AssetId) -> u64 {
        self.subaccount(owner, asset).map_or(0, |a| a.balance)
    }

    pub fn is_frozen(&self, owner: Address, asset: AssetId) -> bool {
        self.subaccount(owner, asset).is_some_and(|a| a.frozen)
    }

    pub fn subaccount_count(&self) -> usize {
        self.accounts.len()
    }

    // --- Balance movement ---

    /// Validate a withdrawal; returns the source sub-account.
    fn check_withdraw(&self, owner: Address, asset: AssetId, amount: u64) -> LedgerResult<SubAccountId> {
        ensure_positive(amount)?;
        let id = self.subaccount_id(owner, asset).ok_or_else(|| {
            LedgerError::NotFound(format!("no {} sub-account for {}", asset, owner))
        })?;
        let account = self.account(id)?;
        if account.balance < amount {
            return Err(LedgerError::InvalidArgument(format!(
                "insufficient balance: {} < {}",
                account.balance, amount
            )));
        }
        Ok(id)
    }

    /// Validate that `amount` of `asset` can land at `to`.
    fn check_deposit(&self, asset: AssetId, to: Address, amount: u64) -> LedgerResult<()> {
        self.ensure_asset_known(asset)?;
        let current = self.balance(to, asset);
        if current.checked_add(amount).is_none() {
            return Err(LedgerError::OutOfRange(format!(
                "balance {} + {} overflows u64",
                current, amount
            )));
        }
        Ok(())
    }

    pub(crate) fn account(&self, id: SubAccountId) -> LedgerResult<&SubAccount> {
        self.accounts
            .get(&id)
            .ok_or_else(|| LedgerError::NotFound(format!("sub-account {}", id)))
    }

    fn account_mut(&mut self, id: SubAccountId) -> LedgerResult<&mut SubAccount> {
        self.accounts
            .get_mut(&id)
            .ok_or_else(|| LedgerError::NotFound(format!("sub-account {}", id)))
    }

    // Only called on an id returned by check_withdraw.
    fn apply_withdraw(&mut self, owner: Address, asset: AssetId, id: SubAccountId, amount: u64) -> CashValue {
        if let Some(account) = self.accounts.get_mut(&id) {
            account.balance -= amount;
        }
        tracing::debug!("Withdrew {} of {} from {}", amount, asset, owner);
        self.journal.record(LedgerEvent::Withdrawn {
            owner,
            asset,
            amount,
        });
        self.retire_if_empty(owner, asset);
        CashValue::new(asset, amount)
    }

    fn credit(&mut self, owner: Address, asset: AssetId, id: SubAccountId, amount: u64) {
        if let Some(account) = self.accounts.get_mut(&id) {
            account.balance += amount;
        }
        tracing::debug!("Deposited {} of {} to {}", amount, asset, owner);
        self.journal.record(LedgerEvent::Deposited {
            owner,
            asset,
            amount,
        });
    }

    /// Take `amount` out of the owner's sub-account. Only the owner may.
    ///
    /// When this leaves an unfrozen sub-account at zero, the sub-account is
    /// deleted and its index entry removed.
    pub fn withdraw(
        &mut self,
        caller: &dyn Identity,
        owner: Address,
        asset: AssetId,
        amount: u64,
    ) -> LedgerResult<CashValue> {
        let who = caller.current_caller();
        if who != owner {
            tracing::warn!("{} tried to withdraw from {}", who, owner);
            return Err(LedgerError::PermissionDenied(format!(
                "{} cannot withdraw from {}",
                who, owner
            )));
        }
        let id = self.check_withdraw(owner, asset, amount)?;
        Ok(self.apply_withdraw(owner, asset, id, amount))
    }

    /// Land `cash` in the recipient's sub-account, creating it if needed.
    /// On failure the value comes back untouched.
    ///
    /// A zero value is checked against the asset like any other and then
    /// consumed without opening a sub-account.
    pub fn deposit(&mut self, cash: CashValue, to: Address) -> Result<(), Rejected<CashValue>> {
        let asset = cash.asset_id();
        let amount = cash.amount();
        if let Err(e) = self.check_deposit(asset, to, amount) {
            return Err(Rejected::new(e, cash));
        }
        if amount == 0 {
            let _ = cash.into_parts();
            return Ok(());
        }
        let id = match self.get_or_create_subaccount(to, asset, true) {
            Ok(id) => id,
            Err(e) => return Err(Rejected::new(e, cash)),
        };
        let (_, amount) = cash.into_parts();
        self.credit(to, asset, id, amount);
        Ok(())
    }

    /// Move `amount` from `owner` to `to` as one step.
    pub fn transfer(
        &mut self,
        caller: &dyn Identity,
        owner: Address,
        asset: AssetId,
        to: Address,
        amount: u64,
    ) -> LedgerResult<()> {
        let who = caller.current_caller();
        if who != owner {
            tracing::warn!("{} tried to transfer from {}", who, owner);
            return Err(LedgerError::PermissionDenied(format!(
                "{} cannot transfer from {}",
                who, owner
            )));
        }
        let source = self.check_withdraw(owner, asset, amount)?;

        if owner == to {
            // Value leaves and returns to the same sub-account; nothing moves.
            return Ok(());
        }

        self.check_deposit(asset, to, amount)?;
        // Provision the destination before touching the source so that no
        // later step can fail.
        let dest = self.get_or_create_subaccount(to, asset, true)?;

        let cash = self.apply_withdraw(owner, asset, source, amount);
        let (_, amount) = cash.into_parts();
        self.credit(to, asset, dest, amount);
        Ok(())
    }

    // --- Supply-gated operations ---

    /// The only source of new value.
    pub fn mint_with_cap(&mut self, cap: &MintCap, asset: AssetId, amount: u64) -> LedgerResult<CashValue> {
        let current = self.supply.increase(cap, asset, amount)?;
        tracing::info!("Minted {} of {} (supply now {})", amount, asset, current);
        self.journal.record(LedgerEvent::SupplyIncreased {
            asset,
            amount,
            current,
        });
        Ok(CashValue::new(asset, amount))
    }

    /// Mint straight into `to`'s sub-account.
    pub fn mint_to(&mut self, cap: &MintCap, asset: AssetId, to: Address, amount: u64) -> LedgerResult<()> {
        self.supply.check_increase(cap, asset, amount)?;
        self.check_deposit(asset, to, amount)?;
        let dest = self.get_or_create_subaccount(to, asset, true)?;

        let cash = self.mint_with_cap(cap, asset, amount)?;
        let (_, amount) = cash.into_parts();
        self.credit(to, asset, dest, amount);
        Ok(())
    }

    /// Burn `amount` out of `from_owner`'s sub-account. The holder's consent
    /// is not required; the burn capability is the authority.
    pub fn burn_with_cap(
        &mut self,
        cap: &BurnCap,
        asset: AssetId,
        amount: u64,
        from_owner: Address,
    ) -> LedgerResult<()> {
        self.supply.check_decrease(cap, asset, amount)?;
        let source = self.check_withdraw(from_owner, asset, amount)?;

        let current = self.supply.decrease(cap, asset, amount)?;
        let cash = self.apply_withdraw(from_owner, asset, source, amount);
        let _ = cash.into_parts();

        tracing::info!(
            "🔥 Burned {} of {} from {} (supply now {})",
            amount,
            asset,
            from_owner,
            current
        );
        self.journal.record(LedgerEvent::SupplyDecreased {
            asset,
            amount,
            current,
        });
        Ok(())
    }

    /// Destroy value in transit. A zero value is simply consumed.
    pub fn burn(&mut self, cap: &BurnCap, cash: CashValue) -> Result<(), Rejected<CashValue>> {
        let asset = cash.asset_id();
        let amount = cash.amount();
        if let Err(e) = ensure_asset("burn", cap.asset(), asset) {
            return Err(Rejected::new(e, cash));
        }
        if amount == 0 {
            let _ = cash.into_parts();
            return Ok(());
        }
        let current = match self.supply.decrease(cap, asset, amount) {
            Ok(current) => current,
            Err(e) => return Err(Rejected::new(e, cash)),
        };
        let _ = cash.into_parts();
        tracing::info!("🔥 Burned {} of {} in transit (supply now {})", amount, asset, current);
        self.journal.record(LedgerEvent::SupplyDecreased {
            asset,
            amount,
            current,
        });
        Ok(())
    }

    // --- Freezing ---

    /// Freezing only pins a sub-account against deletion-on-empty; balance
    /// movement is unaffected. Creates the sub-account if needed.
    pub fn freeze(&mut self, cap: &FreezeCap, owner: Address, asset: AssetId) -> LedgerResult<()> {
        ensure_asset("freeze", cap.asset(), asset)?;
        self.ensure_asset_known(asset)?;
        let id = self.get_or_create_subaccount(owner, asset, true)?;
        self.set_frozen(owner, asset, id, true)
    }

    /// Fails with `NotFound` if the owner has no sub-account for `asset`.
    pub fn unfreeze(&mut self, cap: &FreezeCap, owner: Address, asset: AssetId) -> LedgerResult<()> {
        ensure_asset("freeze", cap.asset(), asset)?;
        let id = self.get_or_create_subaccount(owner, asset, false)?;
        self.set_frozen(owner, asset, id, false)
    }

    fn set_frozen(&mut self, owner: Address, asset: AssetId, id: SubAccountId, frozen: bool) -> LedgerResult<()> {
        self.account_mut(id)?.frozen = frozen;
        tracing::info!(
            "{} {} sub-account of {}",
            if frozen { "❄️ Froze" } else { "Unfroze" },
            asset,
            owner
        );
        self.journal.record(LedgerEvent::FrozenSet {
            owner,
            asset,
            frozen,
        });
        Ok(())
    }
}
