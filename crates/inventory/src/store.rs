//! Instrument storage traits and implementations.
//!
//! This module defines the `InstrumentStore` trait that abstracts away storage details.
//! `InMemoryInstrumentStore` lives here; the PostgreSQL adapter lives in `db`.

use crate::error::{InventoryError, InventoryResult};
use crate::types::{Instrument, InstrumentId, NewInstrument};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Trait for instrument storage.
///
/// The store owns persisted state and assigns identifiers. It does not apply
/// stock rules; callers decide what to write.
///
/// # Example
///
/// ```ignore
/// use inventory::{InstrumentStore, InMemoryInstrumentStore};
///
/// async fn example(store: &dyn InstrumentStore) {
///     if let Some(instrument) = store.find_by_name("Slash Lespaul").await? {
///         println!("Found: {}", instrument.id);
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstrumentStore: Send + Sync {
    /// Get an instrument by its exact name.
    async fn find_by_name(&self, name: &str) -> InventoryResult<Option<Instrument>>;

    /// Get an instrument by its id.
    async fn find_by_id(&self, id: InstrumentId) -> InventoryResult<Option<Instrument>>;

    /// Persist a new instrument, assigning its id.
    async fn insert(&self, candidate: NewInstrument) -> InventoryResult<Instrument>;

    /// Overwrite an existing instrument.
    async fn update(&self, instrument: Instrument) -> InventoryResult<Instrument>;

    /// Delete an instrument by id. Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: InstrumentId) -> InventoryResult<()>;

    /// All instruments ordered by id.
    async fn find_all(&self) -> InventoryResult<Vec<Instrument>>;

    /// Check if a name is already taken.
    async fn name_exists(&self, name: &str) -> InventoryResult<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }
}

/// In-memory implementation of InstrumentStore.
///
/// Ids come from a counter that only moves forward, so a deleted id is
/// never handed out again.
#[derive(Debug)]
pub struct InMemoryInstrumentStore {
    instruments: Arc<RwLock<BTreeMap<InstrumentId, Instrument>>>,
    by_name: Arc<RwLock<HashMap<String, InstrumentId>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryInstrumentStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self {
            instruments: Arc::new(RwLock::new(BTreeMap::new())),
            by_name: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Get the number of instruments in the store.
    pub fn len(&self) -> usize {
        self.instruments.read().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.instruments.read().is_empty()
    }
}

impl Default for InMemoryInstrumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryInstrumentStore {
    fn clone(&self) -> Self {
        Self {
            instruments: Arc::clone(&self.instruments),
            by_name: Arc::clone(&self.by_name),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

#[async_trait]
impl InstrumentStore for InMemoryInstrumentStore {
    async fn find_by_name(&self, name: &str) -> InventoryResult<Option<Instrument>> {
        let by_name = self.by_name.read();
        if let Some(id) = by_name.get(name) {
            Ok(self.instruments.read().get(id).cloned())
        } else {
            Ok(None)
        }
    }

    async fn find_by_id(&self, id: InstrumentId) -> InventoryResult<Option<Instrument>> {
        Ok(self.instruments.read().get(&id).cloned())
    }

    async fn insert(&self, candidate: NewInstrument) -> InventoryResult<Instrument> {
        let mut by_name = self.by_name.write();

        // Same guarantee as the unique index on the SQL side
        if by_name.contains_key(&candidate.name) {
            return Err(InventoryError::AlreadyRegistered(candidate.name));
        }

        let id = InstrumentId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let instrument = candidate.with_id(id);

        by_name.insert(instrument.name.clone(), id);
        self.instruments.write().insert(id, instrument.clone());
        Ok(instrument)
    }

    async fn update(&self, instrument: Instrument) -> InventoryResult<Instrument> {
        let mut by_name = self.by_name.write();
        let mut instruments = self.instruments.write();
        let existing = instruments
            .get(&instrument.id)
            .ok_or_else(|| InventoryError::id_not_found(instrument.id))?;

        if existing.name != instrument.name {
            if by_name.contains_key(&instrument.name) {
                return Err(InventoryError::AlreadyRegistered(instrument.name));
            }
            by_name.remove(&existing.name);
            by_name.insert(instrument.name.clone(), instrument.id);
        }

        instruments.insert(instrument.id, instrument.clone());
        Ok(instrument)
    }

    async fn delete_by_id(&self, id: InstrumentId) -> InventoryResult<()> {
        let mut by_name = self.by_name.write();
        if let Some(instrument) = self.instruments.write().remove(&id) {
            by_name.remove(&instrument.name);
        }
        Ok(())
    }

    async fn find_all(&self) -> InventoryResult<Vec<Instrument>> {
        Ok(self.instruments.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstrumentType;
    use assert_matches::assert_matches;

    fn candidate(name: &str) -> NewInstrument {
        NewInstrument {
            name: name.to_string(),
            brand: "Gibson".to_string(),
            max: 50,
            min: 1,
            quantity: 17,
            instrument_type: InstrumentType::Guitar,
        }
    }

    #[tokio::test]
    async fn test_inmemory_store_insert_and_find() {
        let store = InMemoryInstrumentStore::new();
        let saved = store.insert(candidate("Slash Lespaul")).await.unwrap();

        assert_eq!(saved.id, InstrumentId::new(1));
        assert_eq!(store.len(), 1);

        let by_id = store.find_by_id(saved.id).await.unwrap();
        assert_eq!(by_id, Some(saved.clone()));

        let by_name = store.find_by_name("Slash Lespaul").await.unwrap();
        assert_eq!(by_name, Some(saved));

        assert!(store.name_exists("Slash Lespaul").await.unwrap());
        assert!(!store.name_exists("Stratocaster").await.unwrap());
    }

    #[tokio::test]
    async fn test_inmemory_store_duplicate_name() {
        let store = InMemoryInstrumentStore::new();
        store.insert(candidate("Slash Lespaul")).await.unwrap();

        let result = store.insert(candidate("Slash Lespaul")).await;
        assert_matches!(result, Err(InventoryError::AlreadyRegistered(name)) if name == "Slash Lespaul");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_inmemory_store_ids_not_reused() {
        let store = InMemoryInstrumentStore::new();
        let first = store.insert(candidate("A")).await.unwrap();
        store.delete_by_id(first.id).await.unwrap();

        let second = store.insert(candidate("A")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(store.find_by_id(first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inmemory_store_update() {
        let store = InMemoryInstrumentStore::new();
        let saved = store.insert(candidate("Slash Lespaul")).await.unwrap();

        store.update(saved.with_quantity(27)).await.unwrap();

        let fetched = store.find_by_name("Slash Lespaul").await.unwrap().unwrap();
        assert_eq!(fetched.quantity, 27);
    }

    #[tokio::test]
    async fn test_inmemory_store_update_missing() {
        let store = InMemoryInstrumentStore::new();
        let ghost = candidate("Ghost").with_id(InstrumentId::new(99));

        let result = store.update(ghost).await;
        assert_matches!(result, Err(InventoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_inmemory_store_delete_is_noop_safe() {
        let store = InMemoryInstrumentStore::new();
        let saved = store.insert(candidate("Slash Lespaul")).await.unwrap();

        store.delete_by_id(saved.id).await.unwrap();
        store.delete_by_id(saved.id).await.unwrap();

        assert!(store.is_empty());
        assert!(store.find_by_name("Slash Lespaul").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inmemory_store_find_all_ordered() {
        let store = InMemoryInstrumentStore::new();
        for name in ["C", "A", "B"] {
            store.insert(candidate(name)).await.unwrap();
        }

        let all = store.find_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|i| i.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
