//! Bounded log of ledger state transitions

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::JournalConfig;
use crate::types::{Address, AssetId, SubAccountId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    AssetCreated {
        asset: AssetId,
        creator: Address,
        maximum: Option<u64>,
    },
    SupplyIncreased {
        asset: AssetId,
        amount: u64,
        current: u64,
    },
    SupplyDecreased {
        asset: AssetId,
        amount: u64,
        current: u64,
    },
    Deposited {
        owner: Address,
        asset: AssetId,
        amount: u64,
    },
    Withdrawn {
        owner: Address,
        asset: AssetId,
        amount: u64,
    },
    FrozenSet {
        owner: Address,
        asset: AssetId,
        frozen: bool,
    },
    SubAccountCreated {
        owner: Address,
        asset: AssetId,
        account: SubAccountId,
    },
    SubAccountDeleted {
        owner: Address,
        asset: AssetId,
        account: SubAccountId,
    },
    /// The sub-account was closed but the registry kept its entity record.
    EntityLeaked {
        owner: Address,
        asset: AssetId,
        account: SubAccountId,
        reason: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct JournalEntry {
    pub sequence: u64,
    pub recorded_at_ms: i64,
    #[serde(flatten)]
    pub event: LedgerEvent,
}

/// Ring buffer of the most recent events. Oldest entries fall off first.
#[derive(Debug, Clone)]
pub struct Journal {
    enabled: bool,
    capacity: usize,
    next_sequence: u64,
    entries: VecDeque<JournalEntry>,
}

impl Journal {
    pub fn new(config: &JournalConfig) -> Self {
        Self {
            enabled: config.enabled,
            capacity: config.capacity,
            next_sequence: 0,
            entries: VecDeque::new(),
        }
    }

    pub fn record(&mut self, event: LedgerEvent) {
        if !self.enabled || self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            sequence: self.next_sequence,
            recorded_at_ms: chrono::Utc::now().timestamp_millis(),
            event,
        });
        self.next_sequence += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn events(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.entries.iter().map(|e| &e.event)
    }

    pub fn drain(&mut self) -> Vec<JournalEntry> {
        self.entries.drain(..).collect()
    }

    /// One JSON object per line, oldest first.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new(&JournalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;

    fn gold() -> AssetId {
        AssetId::from_entity(EntityId::from_address(Address::from_name("gold")))
    }

    fn deposit(amount: u64) -> LedgerEvent {
        LedgerEvent::Deposited {
            owner: Address::from_name("alice"),
            asset: gold(),
            amount,
        }
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut journal = Journal::new(&JournalConfig {
            enabled: true,
            capacity: 2,
        });
        journal.record(deposit(1));
        journal.record(deposit(2));
        journal.record(deposit(3));

        let seqs: Vec<u64> = journal.entries().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![1, 2]);
        assert_eq!(journal.events().last(), Some(&deposit(3)));
    }

    #[test]
    fn test_disabled_journal_records_nothing() {
        let mut journal = Journal::new(&JournalConfig {
            enabled: false,
            capacity: 16,
        });
        journal.record(deposit(1));
        assert!(journal.is_empty());
    }

    #[test]
    fn test_json_lines_export() {
        let mut journal = Journal::default();
        journal.record(deposit(5));
        journal.record(LedgerEvent::FrozenSet {
            owner: Address::from_name("alice"),
            asset: gold(),
            frozen: true,
        });

        let text = journal.to_json_lines().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "deposited");
        assert_eq!(first["amount"], 5);
        assert_eq!(first["sequence"], 0);

        let second: JournalEntry = serde_json::from_str(lines[1]).unwrap();
        assert!(matches!(second.event, LedgerEvent::FrozenSet { frozen: true, .. }));

        assert_eq!(journal.drain().len(), 2);
        assert!(journal.is_empty());
    }
}
