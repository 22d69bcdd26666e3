//! Database layer for instrument storage.
//!
//! PostgreSQL-backed implementation of the `InstrumentStore` trait, backed by
//! the single `instruments` table.

pub mod models;
pub mod postgres;

pub use models::InstrumentRow;
pub use postgres::PostgresInstrumentStore;
