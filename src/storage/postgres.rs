use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use tracing::{debug, info};

use super::FacebookSettings;
use crate::config::DatabaseConfig;
use crate::error::StorageResult;

/// Postgres source of page credentials (`facebook_settings` table)
#[derive(Clone)]
pub struct SettingsDatabase {
    pool: PgPool,
}

impl SettingsDatabase {
    /// Connect with a small pool; the loader issues a single query.
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        info!(host = %config.host, database = %config.database, "Connected to settings database");

        Ok(Self { pool })
    }

    /// Look up the credentials stored under `record_id`.
    pub async fn fetch_facebook_settings(
        &self,
        record_id: i64,
    ) -> StorageResult<Option<FacebookSettings>> {
        debug!(record_id, "Querying facebook_settings");

        let row = sqlx::query(
            "SELECT page_id, page_access_token FROM facebook_settings WHERE id = $1",
        )
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;

        let settings = row
            .map(|row| -> Result<FacebookSettings, sqlx::Error> {
                Ok(FacebookSettings {
                    page_id: row.try_get("page_id")?,
                    page_access_token: row.try_get("page_access_token")?,
                })
            })
            .transpose()?;

        Ok(settings)
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
