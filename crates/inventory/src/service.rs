//! Inventory service - orchestrates stock rules against the store.

use crate::error::{InventoryError, InventoryResult};
use crate::rules::{self, InventoryLimits};
use crate::store::InstrumentStore;
use crate::types::{Instrument, InstrumentId, NewInstrument};
use observability::{InventoryMetrics, MutationOutcome};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, instrument, warn};

/// Direction of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Increment,
    Decrement,
}

impl Adjustment {
    fn operation(&self) -> &'static str {
        match self {
            Adjustment::Increment => "increment",
            Adjustment::Decrement => "decrement",
        }
    }
}

/// High-level service for the instrument inventory.
///
/// Every mutation re-reads the current record from the store, asks the
/// rules module whether the change is legal and only then writes.
/// Read-decide-write sequences on the same id are serialized; creation is
/// serialized service-wide so the name check and the insert cannot interleave.
pub struct InventoryService<S: InstrumentStore + ?Sized> {
    store: Arc<S>,
    limits: InventoryLimits,
    metrics: InventoryMetrics,
    create_lock: AsyncMutex<()>,
    id_locks: Mutex<HashMap<InstrumentId, Arc<AsyncMutex<()>>>>,
}

impl<S: InstrumentStore + ?Sized> InventoryService<S> {
    /// Create a new inventory service.
    pub fn new(store: Arc<S>, limits: InventoryLimits) -> Self {
        Self {
            store,
            limits,
            metrics: InventoryMetrics::new(),
            create_lock: AsyncMutex::new(()),
            id_locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, id: InstrumentId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.id_locks.lock();
        Arc::clone(locks.entry(id).or_default())
    }

    fn release_lock(&self, id: InstrumentId) {
        let mut locks = self.id_locks.lock();
        // Only the map itself holds it: nobody is waiting
        if locks.get(&id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(&id);
        }
    }

    fn record_failure(&self, operation: &'static str, err: &InventoryError) {
        match err {
            InventoryError::Storage(_) | InventoryError::Internal(_) => {
                self.metrics.record_mutation(operation, MutationOutcome::Failed)
            }
            _ => self.metrics.record_rejection(operation, err.kind()),
        }
    }

    /// Register a new instrument.
    ///
    /// A taken name is reported as `AlreadyRegistered` before any field
    /// validation happens.
    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn create(&self, candidate: NewInstrument) -> InventoryResult<Instrument> {
        let _guard = self.create_lock.lock().await;

        let result = self.create_unlocked(candidate).await;
        match &result {
            Ok(instrument) => {
                info!(id = %instrument.id, "Instrument registered");
                self.metrics.record_mutation("create", MutationOutcome::Applied);
            }
            Err(e) => {
                warn!(error = %e, "Instrument creation rejected");
                self.record_failure("create", e);
            }
        }
        result
    }

    async fn create_unlocked(&self, candidate: NewInstrument) -> InventoryResult<Instrument> {
        if self.store.name_exists(&candidate.name).await? {
            return Err(InventoryError::AlreadyRegistered(candidate.name));
        }
        rules::validate_new(&candidate, &self.limits)?;
        self.store.insert(candidate).await
    }

    /// Look up an instrument by exact name.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> InventoryResult<Instrument> {
        debug!("Looking up instrument by name");
        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(|| InventoryError::name_not_found(name))
    }

    /// Look up an instrument by id.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: InstrumentId) -> InventoryResult<Instrument> {
        debug!("Looking up instrument by id");
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| InventoryError::id_not_found(id))
    }

    /// All instruments ordered by id. Empty is a valid result.
    pub async fn list_all(&self) -> InventoryResult<Vec<Instrument>> {
        self.store.find_all().await
    }

    /// Delete an instrument.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: InstrumentId) -> InventoryResult<()> {
        let lock = self.lock_for(id);
        let result = {
            let _guard = lock.lock().await;
            match self.store.find_by_id(id).await {
                Ok(Some(_)) => self.store.delete_by_id(id).await,
                Ok(None) => Err(InventoryError::id_not_found(id)),
                Err(e) => Err(e),
            }
        };
        drop(lock);
        self.release_lock(id);

        match &result {
            Ok(()) => {
                info!("Instrument deleted");
                self.metrics.record_mutation("delete", MutationOutcome::Applied);
            }
            Err(e) => {
                warn!(error = %e, "Instrument deletion rejected");
                self.record_failure("delete", e);
            }
        }
        result
    }

    /// Add `delta` units to an instrument's stock.
    #[instrument(skip(self))]
    pub async fn increment(&self, id: InstrumentId, delta: i32) -> InventoryResult<Instrument> {
        self.adjust(id, delta, Adjustment::Increment).await
    }

    /// Remove `delta` units from an instrument's stock.
    #[instrument(skip(self))]
    pub async fn decrement(&self, id: InstrumentId, delta: i32) -> InventoryResult<Instrument> {
        self.adjust(id, delta, Adjustment::Decrement).await
    }

    async fn adjust(
        &self,
        id: InstrumentId,
        delta: i32,
        adjustment: Adjustment,
    ) -> InventoryResult<Instrument> {
        let operation = adjustment.operation();
        let lock = self.lock_for(id);
        let result = {
            let _guard = lock.lock().await;
            self.adjust_unlocked(id, delta, adjustment).await
        };
        drop(lock);
        self.release_lock(id);

        match &result {
            Ok(instrument) => {
                info!(quantity = instrument.quantity, "Stock {}ed", operation);
                self.metrics.record_mutation(operation, MutationOutcome::Applied);
            }
            Err(e) => {
                warn!(error = %e, "Stock {} rejected", operation);
                self.record_failure(operation, e);
            }
        }
        result
    }

    async fn adjust_unlocked(
        &self,
        id: InstrumentId,
        delta: i32,
        adjustment: Adjustment,
    ) -> InventoryResult<Instrument> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| InventoryError::id_not_found(id))?;

        let quantity = match adjustment {
            Adjustment::Increment => rules::evaluate_increment(&current, delta)?,
            Adjustment::Decrement => rules::evaluate_decrement(&current, delta)?,
        };

        self.store.update(current.with_quantity(quantity)).await
    }

    /// Get the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Get the limits applied to new instruments and quantity requests.
    pub fn limits(&self) -> &InventoryLimits {
        &self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryInstrumentStore, MockInstrumentStore};
    use crate::types::InstrumentType;
    use assert_matches::assert_matches;

    fn lespaul() -> NewInstrument {
        NewInstrument {
            name: "Slash Lespaul".to_string(),
            brand: "Gibson".to_string(),
            max: 50,
            min: 1,
            quantity: 17,
            instrument_type: InstrumentType::Guitar,
        }
    }

    fn create_service() -> InventoryService<InMemoryInstrumentStore> {
        InventoryService::new(
            Arc::new(InMemoryInstrumentStore::new()),
            InventoryLimits::default(),
        )
    }

    #[tokio::test]
    async fn test_service_create() {
        let service = create_service();
        let created = service.create(lespaul()).await.unwrap();

        assert_eq!(created.id, InstrumentId::new(1));
        assert_eq!(created.name, "Slash Lespaul");
        assert_eq!(created.quantity, 17);
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn test_service_create_duplicate_name() {
        let service = create_service();
        service.create(lespaul()).await.unwrap();

        let err = service.create(lespaul()).await.unwrap_err();
        assert_eq!(err, InventoryError::AlreadyRegistered("Slash Lespaul".to_string()));
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn test_service_duplicate_reported_before_validation() {
        let service = create_service();
        service.create(lespaul()).await.unwrap();

        let mut invalid = lespaul();
        invalid.max = 9999;
        assert_matches!(
            service.create(invalid).await,
            Err(InventoryError::AlreadyRegistered(_))
        );
    }

    #[tokio::test]
    async fn test_service_create_invalid() {
        let service = create_service();
        let mut invalid = lespaul();
        invalid.brand = String::new();

        assert_matches!(service.create(invalid).await, Err(InventoryError::Validation(_)));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn test_service_increment() {
        let service = create_service();
        let created = service.create(lespaul()).await.unwrap();

        let updated = service.increment(created.id, 10).await.unwrap();
        assert_eq!(updated.quantity, 27);
        assert_eq!(service.find_by_id(created.id).await.unwrap().quantity, 27);
    }

    #[tokio::test]
    async fn test_service_increment_exceeds_max() {
        let service = create_service();
        let created = service.create(lespaul()).await.unwrap();

        let err = service.increment(created.id, 45).await.unwrap_err();
        assert_eq!(
            err,
            InventoryError::StockExceeded {
                id: created.id,
                delta: 45
            }
        );
        assert_eq!(service.find_by_id(created.id).await.unwrap().quantity, 17);
    }

    #[tokio::test]
    async fn test_service_decrement() {
        let service = create_service();
        let created = service.create(lespaul()).await.unwrap();

        let updated = service.decrement(created.id, 16).await.unwrap();
        assert_eq!(updated.quantity, 1);
    }

    #[tokio::test]
    async fn test_service_decrement_below_min() {
        let service = create_service();
        let created = service.create(lespaul()).await.unwrap();

        let err = service.decrement(created.id, 19).await.unwrap_err();
        assert_eq!(
            err,
            InventoryError::NegativeStockExceeded {
                id: created.id,
                delta: 19
            }
        );
        assert_eq!(service.find_by_name("Slash Lespaul").await.unwrap().quantity, 17);
    }

    #[tokio::test]
    async fn test_service_zero_delta_is_a_no_op() {
        let service = create_service();
        let created = service.create(lespaul()).await.unwrap();

        let after_increment = service.increment(created.id, 0).await.unwrap();
        assert_eq!(after_increment, created);

        let after_decrement = service.decrement(created.id, 0).await.unwrap();
        assert_eq!(after_decrement, created);
        assert_eq!(service.find_by_id(created.id).await.unwrap().quantity, 17);
    }

    #[tokio::test]
    async fn test_service_mutations_on_missing_id() {
        let service = create_service();
        let missing = InstrumentId::new(42);

        assert_eq!(
            service.increment(missing, 1).await.unwrap_err(),
            InventoryError::id_not_found(missing)
        );
        assert_eq!(
            service.decrement(missing, 1).await.unwrap_err(),
            InventoryError::id_not_found(missing)
        );
        assert_eq!(
            service.delete_by_id(missing).await.unwrap_err(),
            InventoryError::id_not_found(missing)
        );
    }

    #[tokio::test]
    async fn test_service_delete_then_lookup() {
        let service = create_service();
        let created = service.create(lespaul()).await.unwrap();

        service.delete_by_id(created.id).await.unwrap();

        assert_matches!(service.find_by_id(created.id).await, Err(InventoryError::NotFound(_)));
        assert_eq!(
            service.find_by_name("Slash Lespaul").await.unwrap_err(),
            InventoryError::name_not_found("Slash Lespaul")
        );
        assert_matches!(
            service.increment(created.id, 1).await,
            Err(InventoryError::NotFound(_))
        );

        // Same name comes back with a fresh id
        let again = service.create(lespaul()).await.unwrap();
        assert_ne!(again.id, created.id);
    }

    #[tokio::test]
    async fn test_service_list_all() {
        let service = create_service();
        assert!(service.list_all().await.unwrap().is_empty());

        service.create(lespaul()).await.unwrap();
        let mut bass = lespaul();
        bass.name = "Jazz Bass".to_string();
        bass.instrument_type = InstrumentType::Bass;
        service.create(bass).await.unwrap();

        let all = service.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name, "Jazz Bass");
    }

    #[tokio::test]
    async fn test_service_concurrent_increments_respect_max() {
        let service = Arc::new(create_service());
        let created = service.create(lespaul()).await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.increment(created.id, 5).await })
            })
            .collect();

        let mut applied = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                applied += 1;
            }
        }

        // 17 + 6 * 5 = 47; a seventh would reach 52
        assert_eq!(applied, 6);
        assert_eq!(service.find_by_id(created.id).await.unwrap().quantity, 47);
        assert!(service.id_locks.lock().is_empty());
    }

    #[tokio::test]
    async fn test_service_rejection_never_writes() {
        let current = lespaul().with_id(InstrumentId::new(7));

        let mut store = MockInstrumentStore::new();
        store
            .expect_find_by_id()
            .returning(move |_| Ok(Some(current.clone())));
        store.expect_update().never();

        let service = InventoryService::new(Arc::new(store), InventoryLimits::default());

        assert_matches!(
            service.increment(InstrumentId::new(7), 45).await,
            Err(InventoryError::StockExceeded { delta: 45, .. })
        );
        assert_matches!(
            service.decrement(InstrumentId::new(7), 19).await,
            Err(InventoryError::NegativeStockExceeded { delta: 19, .. })
        );
    }

    #[tokio::test]
    async fn test_service_duplicate_never_inserts() {
        let mut store = MockInstrumentStore::new();
        store.expect_name_exists().returning(|_| Ok(true));
        store.expect_insert().never();

        let service = InventoryService::new(Arc::new(store), InventoryLimits::default());
        assert_matches!(
            service.create(lespaul()).await,
            Err(InventoryError::AlreadyRegistered(_))
        );
    }

    #[tokio::test]
    async fn test_service_storage_error_passes_through() {
        let mut store = MockInstrumentStore::new();
        store
            .expect_find_by_id()
            .returning(|_| Err(InventoryError::Storage("connection reset".to_string())));

        let service = InventoryService::new(Arc::new(store), InventoryLimits::default());
        assert_eq!(
            service.find_by_id(InstrumentId::new(1)).await.unwrap_err(),
            InventoryError::Storage("connection reset".to_string())
        );
    }
}
