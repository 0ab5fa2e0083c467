//! `PostgreSQL` storage for the hotel booking system.
//!
//! [`PostgresStore`] implements every store trait from `hotel-booking-core` plus the
//! [`ActivityLogger`](hotel_booking_core::activity::ActivityLogger) audit trail:
//!
//! - Hotels, rooms and offers as typed JSONB documents with their queryable fields in columns
//! - Bookings with a unique confirmation number and an authoritative `status` column
//! - Inventory decrement and booking insert in one transaction
//! - Guarded status transitions that release inventory in the same transaction
//!
//! # Example
//!
//! ```ignore
//! use hotel_booking_postgres::{PoolConfig, PostgresStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresStore::connect("postgres://localhost/hotel", &PoolConfig::default()).await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod activity;
mod bookings;
mod catalog;
mod rows;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

/// Connection pool settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// How long to wait for a connection
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Errors raised while setting up the store.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Could not connect to the database
    #[error("Failed to connect: {0}")]
    Connect(#[source] sqlx::Error),

    /// A migration failed
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// `PostgreSQL`-backed catalog, offer, booking and activity storage.
///
/// Cloning shares the connection pool.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store over an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with the given pool settings.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Connect`] if the database is unreachable.
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self, SetupError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(database_url)
            .await
            .map_err(SetupError::Connect)?;

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self::new(pool))
    }

    /// Apply the bundled migrations.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Migrate`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), SetupError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// The underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}
