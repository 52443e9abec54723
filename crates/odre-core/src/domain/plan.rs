use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::domain::category::ServiceCategory;
use crate::domain::song::SongRef;

/// Fecha de culto, clave primaria de un [`Plan`].
///
/// Siempre se escribe en forma canónica `YYYY-MM-DD`; cualquier otra forma
/// de fecha debe pasar por aquí antes de usarse como clave del almacén.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlanDate(NaiveDate);

const KEY_FORMAT: &str = "%Y-%m-%d";

impl PlanDate {
  pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
    NaiveDate::from_ymd_opt(year, month, day).map(PlanDate)
  }

  /// Fecha local de hoy.
  pub fn today() -> Self {
    PlanDate(chrono::Local::now().date_naive())
  }

  /// Clave canónica usada en el almacén de documentos.
  pub fn key(&self) -> String {
    self.to_string()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid plan date: {input} (expected YYYY-MM-DD)")]
pub struct PlanDateError {
  pub input: String,
}

impl FromStr for PlanDate {
  type Err = PlanDateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    NaiveDate::parse_from_str(s.trim(), KEY_FORMAT)
      .map(PlanDate)
      .map_err(|_| PlanDateError { input: s.to_string() })
  }
}

impl TryFrom<String> for PlanDate {
  type Error = PlanDateError;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    s.parse()
  }
}

impl From<PlanDate> for String {
  fn from(date: PlanDate) -> Self {
    date.to_string()
  }
}

impl fmt::Display for PlanDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(KEY_FORMAT))
  }
}

/// Forma persistida de un ítem del setlist.
///
/// No lleva `slot_id` ni desplazamiento de transposición: ambos son estado
/// de sesión y se regeneran al hidratar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSong {
  #[serde(flatten)]
  pub song: SongRef,
  #[serde(default)]
  pub service_category: Option<ServiceCategory>,
}

/// Plan de un culto: director y canciones en orden de ejecución.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
  pub date: PlanDate,
  /// Director de alabanza. Puede estar vacío.
  pub director: String,
  /// Orden literal de ejecución.
  pub items: Vec<PlannedSong>,
}
