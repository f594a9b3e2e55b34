//! Fungible asset ledger
//!
//! Balances live in per-(owner, asset) sub-accounts that are opened on first
//! deposit and closed when a withdrawal empties them. Value in transit is a
//! `CashValue`; supply moves only through mint and burn capabilities.

pub mod cash;
pub mod index;
pub mod journal;
pub mod lifecycle;
pub mod shared;
pub mod store;
pub mod supply;


pub use cash::{merge, CashValue};
pub use index::AccountIndex;
pub use journal::{Journal, JournalEntry, LedgerEvent};
pub use shared::SharedLedger;
pub use store::{Ledger, SubAccount};
pub use supply::{Supply, SupplyTracker};
