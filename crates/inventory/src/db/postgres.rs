//! PostgreSQL implementation of the `InstrumentStore` trait.
//!
//! Ids come from an identity column; name uniqueness is backed by a unique
//! constraint so concurrent processes cannot register the same name twice.

use crate::db::models::{InstrumentRow, INSTRUMENT_COLUMNS};
use crate::error::{InventoryError, InventoryResult};
use crate::store::InstrumentStore;
use crate::types::{Instrument, InstrumentId, NewInstrument};
use async_trait::async_trait;
use config::PostgresConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info, instrument};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// PostgreSQL-backed instrument store.
#[derive(Debug, Clone)]
pub struct PostgresInstrumentStore {
    pool: PgPool,
}

impl PostgresInstrumentStore {
    /// Create a new store with a connection pool.
    pub async fn new(database_url: &str, max_connections: u32) -> InventoryResult<Self> {
        Self::connect_with(database_url, max_connections, Duration::from_secs(30)).await
    }

    /// Create a new store from the `storage.postgres` config section.
    pub async fn from_config(cfg: &PostgresConfig) -> InventoryResult<Self> {
        Self::connect_with(
            &cfg.connection_url(),
            cfg.max_connections,
            Duration::from_secs(cfg.connection_timeout_seconds),
        )
        .await
    }

    async fn connect_with(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> InventoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| InventoryError::Storage(format!("Failed to connect to database: {}", e)))?;

        info!(max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the migration SQL to create tables.
    pub async fn run_migrations(&self) -> InventoryResult<()> {
        let migration_sql = include_str!("../../../../migrations/001_create_instruments.sql");
        sqlx::raw_sql(migration_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| InventoryError::Storage(format!("Migration failed: {}", e)))?;
        info!("Database migrations completed successfully");
        Ok(())
    }
}

#[async_trait]
impl InstrumentStore for PostgresInstrumentStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> InventoryResult<Option<Instrument>> {
        let query = format!("SELECT {} FROM instruments WHERE name = $1", INSTRUMENT_COLUMNS);
        let row = sqlx::query_as::<_, InstrumentRow>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                InventoryError::Storage(format!("Failed to get instrument by name: {}", e))
            })?;

        row.map(Instrument::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: InstrumentId) -> InventoryResult<Option<Instrument>> {
        let query = format!("SELECT {} FROM instruments WHERE id = $1", INSTRUMENT_COLUMNS);
        let row = sqlx::query_as::<_, InstrumentRow>(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| InventoryError::Storage(format!("Failed to get instrument: {}", e)))?;

        row.map(Instrument::try_from).transpose()
    }

    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    async fn insert(&self, candidate: NewInstrument) -> InventoryResult<Instrument> {
        let query = format!(
            r#"
            INSERT INTO instruments (
                name, brand, max_stock, min_stock, quantity, instrument_type
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            INSTRUMENT_COLUMNS
        );

        let row = sqlx::query_as::<_, InstrumentRow>(&query)
            .bind(&candidate.name)
            .bind(&candidate.brand)
            .bind(candidate.max)
            .bind(candidate.min)
            .bind(candidate.quantity)
            .bind(candidate.instrument_type.as_db_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    InventoryError::AlreadyRegistered(candidate.name.clone())
                } else {
                    InventoryError::Storage(format!("Failed to save instrument: {}", e))
                }
            })?;

        debug!(id = row.id, "Inserted instrument");
        Instrument::try_from(row)
    }

    #[instrument(skip(self, instrument), fields(id = %instrument.id))]
    async fn update(&self, instrument: Instrument) -> InventoryResult<Instrument> {
        let row = InstrumentRow::from(&instrument);
        let query = format!(
            r#"
            UPDATE instruments SET
                name = $2,
                brand = $3,
                max_stock = $4,
                min_stock = $5,
                quantity = $6,
                instrument_type = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            INSTRUMENT_COLUMNS
        );

        let updated = sqlx::query_as::<_, InstrumentRow>(&query)
            .bind(row.id)
            .bind(&row.name)
            .bind(&row.brand)
            .bind(row.max_stock)
            .bind(row.min_stock)
            .bind(row.quantity)
            .bind(&row.instrument_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    InventoryError::AlreadyRegistered(row.name.clone())
                } else {
                    InventoryError::Storage(format!("Failed to update instrument: {}", e))
                }
            })?
            .ok_or_else(|| InventoryError::id_not_found(instrument.id))?;

        Instrument::try_from(updated)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: InstrumentId) -> InventoryResult<()> {
        let result = sqlx::query("DELETE FROM instruments WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| InventoryError::Storage(format!("Failed to delete instrument: {}", e)))?;

        debug!(rows = result.rows_affected(), "Deleted instrument");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> InventoryResult<Vec<Instrument>> {
        let query = format!("SELECT {} FROM instruments ORDER BY id ASC", INSTRUMENT_COLUMNS);
        let rows = sqlx::query_as::<_, InstrumentRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| InventoryError::Storage(format!("Failed to list instruments: {}", e)))?;

        rows.into_iter().map(Instrument::try_from).collect()
    }
}
