use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identificador de una canción dentro del catálogo.
///
/// Lo asigna la fuente del catálogo (la base remota), así que es una cadena
/// opaca: puede ser un número, un UUID o un id sintético generado al cargar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
  pub fn new(id: impl Into<String>) -> Self {
    SongId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for SongId {
  fn from(s: &str) -> Self {
    SongId(s.to_string())
  }
}

impl From<String> for SongId {
  fn from(s: String) -> Self {
    SongId(s)
  }
}

impl fmt::Display for SongId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Identificador de un hueco (slot) dentro de un setlist.
///
/// A diferencia de `SongId`, identifica *una aparición* de la canción en el
/// plan: la misma canción puede aparecer dos veces con slots distintos.
/// Es la clave estable para drag & drop. Nunca se reutiliza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(Uuid);

impl SlotId {
  /// Genera un nuevo identificador único.
  pub fn new() -> Self {
    SlotId(Uuid::new_v4())
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for SlotId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for SlotId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
