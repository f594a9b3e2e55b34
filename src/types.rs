//! Identifier types shared by the registry and the ledger

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::LedgerError;

/// 32-byte address of an owner or an entity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 32]);

impl Address {
    pub const LENGTH: usize = 32;

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Stable address derived from a human-readable account name.
    pub fn from_name(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        Self(digest.into())
    }

    pub fn from_hex(s: &str) -> Result<Self, LedgerError> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed)
            .map_err(|e| LedgerError::InvalidArgument(format!("bad address hex: {}", e)))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            LedgerError::InvalidArgument(format!("address must be {} bytes", Self::LENGTH))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{}..)", self.short())
    }
}

// Hex strings keep journal exports readable
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a registry entry. Never reused after deletion.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Address);

impl EntityId {
    pub(crate) fn from_address(address: Address) -> Self {
        Self(address)
    }

    /// Entities live at their own address and may hold other entities.
    pub fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId(0x{}..)", self.0.short())
    }
}

/// Identity of a fungible asset: the id of its base entity
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(EntityId);

impl AssetId {
    pub fn from_entity(entity: EntityId) -> Self {
        Self(entity)
    }

    pub fn entity(&self) -> EntityId {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId(0x{}..)", self.0 .0.short())
    }
}

/// Sub-accounts are ordinary registry entries.
pub type SubAccountId = EntityId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_round_trip() {
        let alice = Address::from_name("alice");
        let parsed = Address::from_hex(&alice.to_hex()).unwrap();
        assert_eq!(alice, parsed);
        assert!(alice.to_string().starts_with("0x"));
        assert_eq!(alice.to_string().len(), 2 + 64);
    }

    #[test]
    fn test_address_rejects_bad_length() {
        assert!(matches!(
            Address::from_hex("0xdeadbeef"),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(Address::from_hex("zz").is_err());
    }

    #[test]
    fn test_address_serializes_as_hex() {
        let alice = Address::from_name("alice");
        let json = serde_json::to_string(&alice).unwrap();
        assert_eq!(json, format!("\"{}\"", alice.to_hex()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alice);
    }

    #[test]
    fn test_names_map_to_distinct_addresses() {
        assert_ne!(Address::from_name("alice"), Address::from_name("bob"));
        assert_eq!(Address::from_name("alice"), Address::from_name("alice"));
    }
}
