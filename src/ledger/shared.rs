//! Single-writer access to a ledger from many threads

use std::sync::{Arc, Mutex, MutexGuard};

use super::store::Ledger;
use crate::error::{LedgerError, LedgerResult};
use crate::registry::{InMemoryRegistry, ObjectRegistry};

/// Cloneable handle; every clone serializes on the same lock.
///
/// Operations on one (owner, asset) pair or one asset's supply never
/// interleave because nothing touches the ledger outside `transaction`.
pub struct SharedLedger<R: ObjectRegistry = InMemoryRegistry> {
    inner: Arc<Mutex<Ledger<R>>>,
}

impl<R: ObjectRegistry> Clone for SharedLedger<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: ObjectRegistry> SharedLedger<R> {
    pub fn new(ledger: Ledger<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    fn safe_lock(&self) -> LedgerResult<MutexGuard<'_, Ledger<R>>> {
        self.inner.lock().map_err(|e| {
            tracing::error!("Ledger mutex poisoned: {}", e);
            LedgerError::StatePoisoned(e.to_string())
        })
    }

    /// Run `f` with exclusive access. Each ledger call inside is atomic on
    /// its own; the lock keeps other callers from observing anything between
    /// them.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Ledger<R>) -> T) -> LedgerResult<T> {
        let mut guard = self.safe_lock()?;
        Ok(f(&mut *guard))
    }

    pub fn read<T>(&self, f: impl FnOnce(&Ledger<R>) -> T) -> LedgerResult<T> {
        let guard = self.safe_lock()?;
        Ok(f(&*guard))
    }
}
