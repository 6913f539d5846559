use std::sync::Arc;

use sqlx::SqlitePool;

use crate::bookings::{BookingRepository, SqliteBookingRepository};
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = db::connect(&config.database_url).await?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: SqlitePool, config: AppConfig) -> Self {
        let bookings: Arc<dyn BookingRepository> =
            Arc::new(SqliteBookingRepository::new(db.clone()));
        Self {
            db,
            config: Arc::new(config),
            catalog: Arc::new(Catalog::seeded()),
            bookings,
        }
    }

    /// Fresh in-memory database, seeded catalog, no processing delay.
    pub async fn for_tests() -> anyhow::Result<Self> {
        let db = db::memory_pool().await?;
        Ok(Self::from_parts(db, AppConfig::for_tests()))
    }
}
