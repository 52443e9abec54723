use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Plan, PlanDate, PlannedSong};
use crate::errors::CoreError;
use crate::ports::DocumentStore;

/// Versión del formato de documento que escribe este repositorio.
const DOCUMENT_VERSION: u32 = 1;

/// Documento tal como se guarda en el almacén, sin la fecha (que es la clave).
#[derive(Debug, Serialize, Deserialize)]
struct PlanDocument {
  #[serde(default = "default_version")]
  version: u32,
  #[serde(default)]
  director: String,
  #[serde(default)]
  items: Vec<PlannedSong>,
}

fn default_version() -> u32 {
  DOCUMENT_VERSION
}

/// Planes de culto por fecha sobre un [`DocumentStore`].
///
/// Guardar es un upsert por fecha: crea o reemplaza el documento entero,
/// sin fusionar campos. Si dos personas guardan la misma fecha, gana la
/// última escritura.
pub struct PlanRepository<S>
where
  S: DocumentStore,
{
  store: S,
}

impl<S> PlanRepository<S>
where
  S: DocumentStore,
{
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Plan guardado para `date`, o `None` si esa fecha todavía no tiene plan.
  pub async fn load(&self, date: PlanDate) -> Result<Option<Plan>, CoreError> {
    let Some(raw) = self.store.get_by_key(&date.key()).await? else {
      debug!(%date, "no plan stored");
      return Ok(None);
    };

    let doc: PlanDocument =
      serde_json::from_value(raw).map_err(|e| CoreError::Corrupt { date, reason: e.to_string() })?;

    if doc.version > DOCUMENT_VERSION {
      return Err(CoreError::Corrupt { date, reason: format!("unsupported document version {}", doc.version) });
    }

    debug!(%date, items = doc.items.len(), "plan loaded");
    Ok(Some(Plan { date, director: doc.director, items: doc.items }))
  }

  /// Crea o reemplaza por completo el plan de `date`.
  pub async fn save(&self, date: PlanDate, director: &str, items: &[PlannedSong]) -> Result<Plan, CoreError> {
    let doc = PlanDocument { version: DOCUMENT_VERSION, director: director.to_string(), items: items.to_vec() };
    let value: Value =
      serde_json::to_value(&doc).map_err(|e| CoreError::Corrupt { date, reason: e.to_string() })?;

    self.store.upsert_by_key(&date.key(), value).await?;

    debug!(%date, items = doc.items.len(), "plan saved");
    Ok(Plan { date, director: doc.director, items: doc.items })
  }

  /// Borra el plan de `date`. No hace nada si no existe.
  pub async fn delete(&self, date: PlanDate) -> Result<(), CoreError> {
    self.store.delete_by_key(&date.key()).await?;
    debug!(%date, "plan deleted");
    Ok(())
  }
}
