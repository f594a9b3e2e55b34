//! Object registry and caller identity collaborators
//!
//! The ledger consumes both through traits. `InMemoryRegistry` and
//! `FixedIdentity` are the implementations used when the ledger runs on its
//! own (tests, tooling); a host platform plugs in its own.

pub mod memory;

pub use memory::InMemoryRegistry;

use crate::capability::{DeleteCap, ExtendCap, TransferCap};
use crate::error::LedgerResult;
use crate::types::{Address, EntityId};

/// Source of the verified identity of whoever invokes an operation
pub trait Identity {
    fn current_caller(&self) -> Address;
}

/// Identity pinned to one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIdentity(Address);

impl FixedIdentity {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn named(name: &str) -> Self {
        Self(Address::from_name(name))
    }
}

impl Identity for FixedIdentity {
    fn current_caller(&self) -> Address {
        self.0
    }
}

/// Entity storage: creation, ownership, capability issuance, deletion.
///
/// Each capability kind is issued at most once per entity. Asking again
/// fails with `AlreadyExists`.
pub trait ObjectRegistry {
    /// Create a fresh entity owned by `owner`. Ids are never reused.
    fn create_entity(&mut self, owner: Address) -> EntityId;

    /// Create an entity at an address derived from `creator` and `seed`.
    /// Fails with `AlreadyExists` if that name was ever taken.
    fn create_named_entity(&mut self, creator: Address, seed: &[u8]) -> LedgerResult<EntityId>;

    fn exists(&self, id: EntityId) -> bool;

    fn resolve_owner(&self, id: EntityId) -> LedgerResult<Address>;

    /// Which of `[extend, transfer, delete]` have already been issued.
    fn issued_capabilities(&self, id: EntityId) -> LedgerResult<[bool; 3]>;

    fn generate_extend_capability(&mut self, id: EntityId) -> LedgerResult<ExtendCap>;

    fn generate_transfer_capability(&mut self, id: EntityId) -> LedgerResult<TransferCap>;

    fn generate_delete_capability(&mut self, id: EntityId) -> LedgerResult<DeleteCap>;

    /// After this the owner can no longer move the entity; only a holder of
    /// its `TransferCap` can.
    fn disable_ungated_transfer(&mut self, id: EntityId) -> LedgerResult<()>;

    fn allows_ungated_transfer(&self, id: EntityId) -> LedgerResult<bool>;

    /// Owner-initiated transfer.
    fn transfer(&mut self, caller: &dyn Identity, id: EntityId, to: Address) -> LedgerResult<()>;

    /// Capability-initiated transfer; ignores the ungated-transfer flag.
    fn transfer_with_cap(&mut self, cap: &TransferCap, to: Address) -> LedgerResult<()>;

    /// Address to act as when attaching new state to the entity.
    fn address_for_extension(&self, cap: &ExtendCap) -> LedgerResult<Address>;

    /// Consume the delete capability and reclaim the entity.
    fn delete_entity(&mut self, cap: DeleteCap) -> LedgerResult<()>;
}
