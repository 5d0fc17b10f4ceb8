// storefront/src/store/mod.rs

//! Durable buyer and order records in SQLite.
//!
//! The store owns both tables. Writes are single statements; nothing here
//! opens a transaction, so a checkout that fails half-way keeps the rows it
//! already wrote.

mod buyers;
mod orders;

use serde::Serialize;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Invalid record: {0}")]
  Validation(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Schema migration failed: {0}")]
  Migration(#[from] MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct RecordStore {
  pool: SqlitePool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
  pub name: String,
  pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ColumnSchema {
  pub name: String,
  #[sqlx(rename = "type")]
  pub data_type: String,
  #[sqlx(rename = "notnull")]
  pub not_null: bool,
  #[sqlx(rename = "pk")]
  pub primary_key: bool,
}

impl RecordStore {
  /// Opens the database at `database_url`, creating the file when missing, and
  /// brings the schema up to date.
  #[instrument(name = "RecordStore::connect", skip_all)]
  pub async fn connect(database_url: &str) -> StoreResult<Self> {
    let options = SqliteConnectOptions::from_str(database_url)?
      .create_if_missing(true)
      .foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
    info!("Connected to the SQLite database.");
    Self::from_pool(pool).await
  }

  /// A private in-memory database; a single connection that never expires keeps
  /// the data alive for the store's lifetime.
  pub async fn in_memory() -> StoreResult<Self> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(options)
      .await?;
    Self::from_pool(pool).await
  }

  async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
    sqlx::migrate!("./migrations").run(&pool).await?;
    debug!("Database schema is up to date.");
    Ok(Self { pool })
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }

  /// Round-trips a trivial query.
  pub async fn ping(&self) -> StoreResult<()> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  /// Application tables and their columns, in name order.
  pub async fn schema_overview(&self) -> StoreResult<Vec<TableSchema>> {
    let tables: Vec<String> = sqlx::query_scalar(
      "SELECT name FROM sqlite_master WHERE type = 'table' \
       AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
    )
    .fetch_all(&self.pool)
    .await?;

    let mut overview = Vec::with_capacity(tables.len());
    for name in tables {
      let columns = sqlx::query_as::<_, ColumnSchema>(
        "SELECT name, type, \"notnull\", pk > 0 AS pk FROM pragma_table_info(?) ORDER BY cid",
      )
      .bind(&name)
      .fetch_all(&self.pool)
      .await?;
      overview.push(TableSchema { name, columns });
    }
    Ok(overview)
  }
}
