//! Single-occupancy container for linear capabilities

use crate::error::{LedgerError, LedgerResult};

/// Holds zero or one value. Never hands out a clone of what it holds.
#[derive(Debug)]
pub enum Slot<T> {
    Empty,
    Occupied(T),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<T> Slot<T> {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    /// Fill an empty slot. An occupied slot keeps its value and the new one
    /// is handed back in the error position.
    pub(crate) fn fill(&mut self, value: T, what: &str) -> Result<(), (LedgerError, T)> {
        match self {
            Slot::Occupied(_) => Err((
                LedgerError::AlreadyExists(format!("{} slot is occupied", what)),
                value,
            )),
            Slot::Empty => {
                *self = Slot::Occupied(value);
                Ok(())
            }
        }
    }

    pub(crate) fn get(&self, what: &str) -> LedgerResult<&T> {
        match self {
            Slot::Occupied(value) => Ok(value),
            Slot::Empty => Err(LedgerError::NotFound(format!("{} slot is empty", what))),
        }
    }

    pub(crate) fn take(&mut self, what: &str) -> LedgerResult<T> {
        match std::mem::take(self) {
            Slot::Occupied(value) => Ok(value),
            Slot::Empty => Err(LedgerError::NotFound(format!("{} slot is empty", what))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_take_cycle() {
        let mut slot: Slot<u8> = Slot::default();
        assert!(!slot.is_occupied());
        assert!(matches!(slot.get("x"), Err(LedgerError::NotFound(_))));

        slot.fill(7, "x").unwrap();
        assert_eq!(*slot.get("x").unwrap(), 7);

        let (err, rejected) = slot.fill(9, "x").unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyExists(_)));
        assert_eq!(rejected, 9);
        assert_eq!(*slot.get("x").unwrap(), 7);

        assert_eq!(slot.take("x").unwrap(), 7);
        assert!(matches!(slot.take("x"), Err(LedgerError::NotFound(_))));
    }
}
