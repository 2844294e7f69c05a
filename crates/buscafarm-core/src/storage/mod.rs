//! Durable key-value storage for session data.
//!
//! The session store persists three string slots, all namespaced under a
//! fixed application prefix. Any backend that can get, set and remove
//! strings by key can hold them:
//! - `MemoryStorage`: in-process, gone when the process exits
//! - `FileStorage`: a JSON object on disk in the data directory

pub mod file;
pub mod memory;

use anyhow::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Prefix shared by every key this application writes
pub const KEY_PREFIX: &str = "@BuscaFarm:";

/// The slots a persisted session occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Token,
    Pharmacy,
    Employee,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Token, StorageKey::Pharmacy, StorageKey::Employee];

    /// Fully namespaced key, e.g. `@BuscaFarm:token`
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Token => "@BuscaFarm:token",
            StorageKey::Pharmacy => "@BuscaFarm:pharmacie",
            StorageKey::Employee => "@BuscaFarm:employee",
        }
    }
}

/// A synchronous string key-value store.
///
/// Methods take `&self`; implementations handle their own interior
/// mutability. Removing an absent key is not an error.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced() {
        for key in StorageKey::ALL {
            assert!(key.as_str().starts_with(KEY_PREFIX));
        }
        assert_eq!(StorageKey::Pharmacy.as_str(), "@BuscaFarm:pharmacie");
    }
}
