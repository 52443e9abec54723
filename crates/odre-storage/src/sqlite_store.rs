use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde_json::Value;
use tracing::{debug, info, warn};

use odre_core::ports::{DocumentStore, StoreError};

use crate::config::StorageConfig;
use crate::models::{NewPlanRow, PlanRow};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// `DocumentStore` sobre SQLite: una fila por fecha en la tabla `plans`.
///
/// El upsert es un único `INSERT … ON CONFLICT(date) DO UPDATE`, así que una
/// lectura concurrente ve el documento anterior o el nuevo completo.
pub struct SqliteDocumentStore {
  conn: Mutex<SqliteConnection>,
}

impl SqliteDocumentStore {
  /// Abre (o crea) la base en `database_url` y aplica las migraciones.
  ///
  /// `":memory:"` sirve para tests.
  pub fn open(database_url: &str) -> Result<Self, StoreError> {
    let mut conn =
      SqliteConnection::establish(database_url).map_err(|e| StoreError::Unavailable(e.to_string()))?;

    conn.run_pending_migrations(MIGRATIONS).map_err(|e| StoreError::Storage(format!("migrations: {e}")))?;

    info!(database_url, "plan store ready");
    Ok(Self { conn: Mutex::new(conn) })
  }

  pub fn new_from_config() -> Result<Self, StoreError> {
    let cfg = StorageConfig::load().map_err(|e| StoreError::Storage(e.to_string()))?;
    Self::open(&cfg.database_url())
  }

  fn conn(&self) -> Result<MutexGuard<'_, SqliteConnection>, StoreError> {
    self.conn.lock().map_err(|_| StoreError::Storage("sqlite connection mutex poisoned".to_string()))
  }
}

fn storage_err(e: diesel::result::Error) -> StoreError {
  StoreError::Storage(e.to_string())
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
  async fn get_by_key(&self, key: &str) -> Result<Option<Value>, StoreError> {
    use crate::schema::plans::dsl::*;

    let mut conn = self.conn()?;
    let row = plans
      .find(key)
      .select(PlanRow::as_select())
      .first::<PlanRow>(&mut *conn)
      .optional()
      .map_err(storage_err)?;

    let Some(row) = row else {
      return Ok(None);
    };

    debug!(key, updated_at = %row.updated_at, "plan row read");
    // Un documento ilegible no es un fallo del almacén: se entrega como
    // cadena y el repositorio lo reporta como plan corrupto.
    let value = match serde_json::from_str(&row.document) {
      Ok(value) => value,
      Err(e) => {
        warn!(key, error = %e, "plan row is not valid json");
        Value::String(row.document)
      }
    };
    Ok(Some(value))
  }

  async fn upsert_by_key(&self, key: &str, value: Value) -> Result<(), StoreError> {
    use crate::schema::plans::dsl::*;

    let doc = value.to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let new_row = NewPlanRow { date: key, document: &doc, updated_at: &now };

    let mut conn = self.conn()?;
    diesel::insert_into(plans)
      .values(&new_row)
      .on_conflict(date)
      .do_update()
      .set((document.eq(doc.as_str()), updated_at.eq(now.as_str())))
      .execute(&mut *conn)
      .map_err(storage_err)?;

    Ok(())
  }

  async fn delete_by_key(&self, key: &str) -> Result<(), StoreError> {
    use crate::schema::plans::dsl::*;

    let mut conn = self.conn()?;
    diesel::delete(plans.find(key)).execute(&mut *conn).map_err(storage_err)?;
    Ok(())
  }
}
