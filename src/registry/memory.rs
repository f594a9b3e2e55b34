use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

use super::{Identity, ObjectRegistry};
use crate::capability::{DeleteCap, ExtendCap, TransferCap};
use crate::error::{LedgerError, LedgerResult};
use crate::types::{Address, EntityId};

// Domain separators so derived ids never collide with each other
const FRESH_ENTITY_SCHEME: u8 = 0xFB;
const NAMED_ENTITY_SCHEME: u8 = 0xFE;

#[derive(Debug, Clone)]
struct EntityRecord {
    owner: Address,
    allow_ungated_transfer: bool,
    extend_issued: bool,
    transfer_issued: bool,
    delete_issued: bool,
}

/// Process-local registry backed by hash maps.
///
/// Every instance draws a random salt, so two registries never derive the
/// same id and capabilities or values from one are unknown to another.
#[derive(Debug)]
pub struct InMemoryRegistry {
    salt: [u8; 16],
    entities: HashMap<EntityId, EntityRecord>,
    // Ids of deleted entities, kept so they are never handed out again
    retired: HashSet<EntityId>,
    next_nonce: u64,
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self {
            salt: *uuid::Uuid::new_v4().as_bytes(),
            entities: HashMap::new(),
            retired: HashSet::new(),
            next_nonce: 0,
        }
    }
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn derive(&self, parts: &[&[u8]], scheme: u8) -> EntityId {
        let mut hasher = Sha256::new();
        hasher.update(self.salt);
        for part in parts {
            hasher.update(part);
        }
        hasher.update([scheme]);
        let bytes: [u8; 32] = hasher.finalize().into();
        EntityId::from_address(Address::new(bytes))
    }

    fn insert(&mut self, id: EntityId, owner: Address) {
        self.entities.insert(
            id,
            EntityRecord {
                owner,
                allow_ungated_transfer: true,
                extend_issued: false,
                transfer_issued: false,
                delete_issued: false,
            },
        );
    }

    fn record(&self, id: EntityId) -> LedgerResult<&EntityRecord> {
        self.entities
            .get(&id)
            .ok_or_else(|| LedgerError::NotFound(format!("entity {}", id)))
    }

    fn record_mut(&mut self, id: EntityId) -> LedgerResult<&mut EntityRecord> {
        self.entities
            .get_mut(&id)
            .ok_or_else(|| LedgerError::NotFound(format!("entity {}", id)))
    }
}

fn already_issued(kind: &str, id: EntityId) -> LedgerError {
    LedgerError::AlreadyExists(format!("{} capability for {} was already issued", kind, id))
}

impl ObjectRegistry for InMemoryRegistry {
    fn create_entity(&mut self, owner: Address) -> EntityId {
        loop {
            let nonce = self.next_nonce;
            self.next_nonce += 1;
            let id = self.derive(
                &[owner.as_bytes(), &nonce.to_le_bytes()],
                FRESH_ENTITY_SCHEME,
            );
            if !self.entities.contains_key(&id) && !self.retired.contains(&id) {
                self.insert(id, owner);
                tracing::trace!("Entity {} created for {}", id, owner);
                return id;
            }
        }
    }

    fn create_named_entity(&mut self, creator: Address, seed: &[u8]) -> LedgerResult<EntityId> {
        let id = self.derive(&[creator.as_bytes(), seed], NAMED_ENTITY_SCHEME);
        if self.entities.contains_key(&id) || self.retired.contains(&id) {
            return Err(LedgerError::AlreadyExists(format!(
                "entity named {:?} by {}",
                String::from_utf8_lossy(seed),
                creator
            )));
        }
        self.insert(id, creator);
        Ok(id)
    }

    fn exists(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    fn resolve_owner(&self, id: EntityId) -> LedgerResult<Address> {
        Ok(self.record(id)?.owner)
    }

    fn issued_capabilities(&self, id: EntityId) -> LedgerResult<[bool; 3]> {
        let record = self.record(id)?;
        Ok([record.extend_issued, record.transfer_issued, record.delete_issued])
    }

    fn generate_extend_capability(&mut self, id: EntityId) -> LedgerResult<ExtendCap> {
        let record = self.record_mut(id)?;
        if record.extend_issued {
            return Err(already_issued("extend", id));
        }
        record.extend_issued = true;
        Ok(ExtendCap::new(id))
    }

    fn generate_transfer_capability(&mut self, id: EntityId) -> LedgerResult<TransferCap> {
        let record = self.record_mut(id)?;
        if record.transfer_issued {
            return Err(already_issued("transfer", id));
        }
        record.transfer_issued = true;
        Ok(TransferCap::new(id))
    }

    fn generate_delete_capability(&mut self, id: EntityId) -> LedgerResult<DeleteCap> {
        let record = self.record_mut(id)?;
        if record.delete_issued {
            return Err(already_issued("delete", id));
        }
        record.delete_issued = true;
        Ok(DeleteCap::new(id))
    }

    fn disable_ungated_transfer(&mut self, id: EntityId) -> LedgerResult<()> {
        self.record_mut(id)?.allow_ungated_transfer = false;
        Ok(())
    }

    fn allows_ungated_transfer(&self, id: EntityId) -> LedgerResult<bool> {
        Ok(self.record(id)?.allow_ungated_transfer)
    }

    fn transfer(&mut self, caller: &dyn Identity, id: EntityId, to: Address) -> LedgerResult<()> {
        let who = caller.current_caller();
        let record = self.record_mut(id)?;
        if record.owner != who {
            return Err(LedgerError::PermissionDenied(format!(
                "{} does not own {}",
                who, id
            )));
        }
        if !record.allow_ungated_transfer {
            return Err(LedgerError::PermissionDenied(format!(
                "ungated transfer of {} is disabled",
                id
            )));
        }
        record.owner = to;
        Ok(())
    }

    fn transfer_with_cap(&mut self, cap: &TransferCap, to: Address) -> LedgerResult<()> {
        self.record_mut(cap.entity())?.owner = to;
        Ok(())
    }

    fn address_for_extension(&self, cap: &ExtendCap) -> LedgerResult<Address> {
        self.record(cap.entity())?;
        Ok(cap.entity().address())
    }

    fn delete_entity(&mut self, cap: DeleteCap) -> LedgerResult<()> {
        let id = cap.entity();
        if self.entities.remove(&id).is_none() {
            return Err(LedgerError::NotFound(format!("entity {}", id)));
        }
        self.retired.insert(id);
        tracing::trace!("Entity {} deleted", id);
        Ok(())
    }
}
