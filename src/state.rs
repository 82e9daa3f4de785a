use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::AppConfig;

/// Shared application context: one pool opened at startup and handed to
/// every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .create_if_missing(true)
            // SQLite's default; sqlx would otherwise enable enforcement,
            // but the spec relies on unenforced references (orphaned
            // consumption rows survive a beverage delete).
            .foreign_keys(false);
        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("connect to database")?;
        Ok(Self { db, config })
    }

    /// In-memory database with the schema applied, for tests. A single
    /// connection, since every `:memory:` connection is its own database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("parse in-memory URL")?
            .foreign_keys(false);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("open in-memory database")?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("apply schema")?;
        Ok(Self {
            db,
            config: Arc::new(AppConfig {
                database_url: "sqlite::memory:".into(),
            }),
        })
    }
}
