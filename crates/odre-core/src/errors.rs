// crates/odre-core/src/errors.rs
use thiserror::Error;

use crate::domain::PlanDate;
use crate::ports::{SourceError, StoreError};

/// Error genérico del núcleo de Odre.
///
/// Las capas superiores (CLI, UI) deberían mapear este error a mensajes de
/// usuario o logs. "No hay plan para esa fecha" no es un error: es `Ok(None)`.
#[derive(Debug, Error)]
pub enum CoreError {
  /// Fallo de transporte o del almacén de planes.
  #[error("repository error: {0}")]
  Repository(#[from] StoreError),

  #[error("catalog error: {0}")]
  Catalog(#[from] SourceError),

  /// El documento guardado para `date` no se puede leer.
  #[error("corrupt plan for {date}: {reason}")]
  Corrupt { date: PlanDate, reason: String },

  /// Se pidió guardar o borrar sin haber elegido fecha.
  #[error("no service date selected")]
  NoActiveDate,
}
