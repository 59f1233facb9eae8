//! Byte-oriented key-value store trait.

use crate::StoreError;

/// Durable storage the oracle writes its state into.
///
/// Methods take `&self`; backends handle their own synchronization.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    ///
    /// Returns a snapshot, so callers may mutate the store while walking it.
    fn prefix_iter(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        self.get(key).map(|v| v.is_some())
    }
}
