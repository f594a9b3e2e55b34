//! Per-entity holder for extend/transfer/delete capabilities

use super::slot::Slot;
use super::{check_flags, DeleteCap, ExtendCap, TransferCap};
use crate::error::{LedgerError, LedgerResult, Rejected};
use crate::registry::{Identity, ObjectRegistry};
use crate::types::EntityId;

/// At most one capability of each kind, all bound to `entity_id`.
#[derive(Debug)]
pub struct CapabilityBundle {
    entity_id: EntityId,
    extend: Slot<ExtendCap>,
    transfer: Slot<TransferCap>,
    delete: Slot<DeleteCap>,
}

fn ensure_bound(kind: &str, bound: EntityId, entity: EntityId) -> LedgerResult<()> {
    if bound != entity {
        return Err(LedgerError::InvalidArgument(format!(
            "{} capability is bound to {}, bundle holds {}",
            kind, bound, entity
        )));
    }
    Ok(())
}

impl CapabilityBundle {
    /// Empty bundle for `entity_id`.
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            extend: Slot::Empty,
            transfer: Slot::Empty,
            delete: Slot::Empty,
        }
    }

    /// Generate a capability for every enabled flag, in the order
    /// `[extend, transfer, delete]`.
    ///
    /// Only the entity's current owner may do this, and the registry issues
    /// each kind at most once per entity, so a second bundle for the same
    /// entity cannot duplicate any capability.
    pub fn new_from_flags<R: ObjectRegistry + ?Sized>(
        registry: &mut R,
        caller: &dyn Identity,
        entity_id: EntityId,
        flags: &[bool],
    ) -> LedgerResult<Self> {
        let [extend, transfer, delete] = check_flags(flags)?;

        let owner = registry.resolve_owner(entity_id)?;
        if owner != caller.current_caller() {
            return Err(LedgerError::PermissionDenied(format!(
                "{} does not own {}",
                caller.current_caller(),
                entity_id
            )));
        }

        // All-or-nothing: confirm every requested kind is still issuable first.
        let issued = registry.issued_capabilities(entity_id)?;
        for (kind, wanted, already) in [
            ("extend", extend, issued[0]),
            ("transfer", transfer, issued[1]),
            ("delete", delete, issued[2]),
        ] {
            if wanted && already {
                return Err(LedgerError::AlreadyExists(format!(
                    "{} capability for {} was already issued",
                    kind, entity_id
                )));
            }
        }

        let mut bundle = Self::new(entity_id);
        if extend {
            bundle.extend = Slot::Occupied(registry.generate_extend_capability(entity_id)?);
        }
        if transfer {
            bundle.transfer = Slot::Occupied(registry.generate_transfer_capability(entity_id)?);
        }
        if delete {
            bundle.delete = Slot::Occupied(registry.generate_delete_capability(entity_id)?);
        }
        tracing::debug!(
            "Capability bundle for {} issued (extend={}, transfer={}, delete={})",
            entity_id,
            extend,
            transfer,
            delete
        );
        Ok(bundle)
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    // --- Extend ---

    pub fn add_extend(&mut self, cap: ExtendCap) -> Result<(), Rejected<ExtendCap>> {
        if let Err(e) = ensure_bound("extend", cap.entity(), self.entity_id) {
            return Err(Rejected::new(e, cap));
        }
        self.extend
            .fill(cap, "extend")
            .map_err(|(e, cap)| Rejected::new(e, cap))
    }

    pub fn borrow_extend(&self) -> LedgerResult<&ExtendCap> {
        self.extend.get("extend")
    }

    pub fn extract_extend(&mut self) -> LedgerResult<ExtendCap> {
        self.extend.take("extend")
    }

    pub fn contains_extend(&self) -> bool {
        self.extend.is_occupied()
    }

    // --- Transfer ---

    pub fn add_transfer(&mut self, cap: TransferCap) -> Result<(), Rejected<TransferCap>> {
        if let Err(e) = ensure_bound("transfer", cap.entity(), self.entity_id) {
            return Err(Rejected::new(e, cap));
        }
        self.transfer
            .fill(cap, "transfer")
            .map_err(|(e, cap)| Rejected::new(e, cap))
    }

    pub fn borrow_transfer(&self) -> LedgerResult<&TransferCap> {
        self.transfer.get("transfer")
    }

    pub fn extract_transfer(&mut self) -> LedgerResult<TransferCap> {
        self.transfer.take("transfer")
    }

    pub fn contains_transfer(&self) -> bool {
        self.transfer.is_occupied()
    }

    // --- Delete ---

    pub fn add_delete(&mut self, cap: DeleteCap) -> Result<(), Rejected<DeleteCap>> {
        if let Err(e) = ensure_bound("delete", cap.entity(), self.entity_id) {
            return Err(Rejected::new(e, cap));
        }
        self.delete
            .fill(cap, "delete")
            .map_err(|(e, cap)| Rejected::new(e, cap))
    }

    pub fn borrow_delete(&self) -> LedgerResult<&DeleteCap> {
        self.delete.get("delete")
    }

    pub fn extract_delete(&mut self) -> LedgerResult<DeleteCap> {
        self.delete.take("delete")
    }

    pub fn contains_delete(&self) -> bool {
        self.delete.is_occupied()
    }
}
