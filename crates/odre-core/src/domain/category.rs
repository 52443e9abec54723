use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::text::fold;

/// Momento del culto al que se asigna una canción del setlist.
///
/// Los cinco valores conocidos son los que agrupan el mensaje para compartir.
/// El modelo no valida: cualquier otro texto se conserva en
/// [`ServiceCategory::Custom`], igual que hace la interfaz con valores libres.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceCategory {
  Bienvenida,
  Alabanza,
  Adoracion,
  Ofrenda,
  Despedida,
  /// Valor libre no contemplado en la lista fija.
  Custom(String),
}

impl ServiceCategory {
  /// Las categorías fijas, en el orden en que se recorre el culto.
  pub const FIXED: [ServiceCategory; 5] = [
    ServiceCategory::Bienvenida,
    ServiceCategory::Alabanza,
    ServiceCategory::Adoracion,
    ServiceCategory::Ofrenda,
    ServiceCategory::Despedida,
  ];

  /// Posición dentro de [`Self::FIXED`]; `None` para `Custom`.
  pub fn order(&self) -> Option<usize> {
    Self::FIXED.iter().position(|c| c == self)
  }
}

impl FromStr for ServiceCategory {
  type Err = std::convert::Infallible;

  /// Convierte una cadena en `ServiceCategory`.
  ///
  /// Ignora mayúsculas y tildes para los valores conocidos; el resto se
  /// guarda tal cual en `Custom`. **Parsear nunca falla.**
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let category = match fold(s).as_str() {
      "bienvenida" => ServiceCategory::Bienvenida,
      "alabanza" => ServiceCategory::Alabanza,
      "adoracion" => ServiceCategory::Adoracion,
      "ofrenda" => ServiceCategory::Ofrenda,
      "despedida" => ServiceCategory::Despedida,
      _ => ServiceCategory::Custom(s.trim().to_string()),
    };

    Ok(category)
  }
}

impl fmt::Display for ServiceCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ServiceCategory::Bienvenida => write!(f, "Bienvenida"),
      ServiceCategory::Alabanza => write!(f, "Alabanza"),
      ServiceCategory::Adoracion => write!(f, "Adoración"),
      ServiceCategory::Ofrenda => write!(f, "Ofrenda"),
      ServiceCategory::Despedida => write!(f, "Despedida"),
      ServiceCategory::Custom(s) => write!(f, "{s}"),
    }
  }
}

impl From<String> for ServiceCategory {
  fn from(s: String) -> Self {
    match s.parse() {
      Ok(category) => category,
      Err(never) => match never {},
    }
  }
}

impl From<ServiceCategory> for String {
  fn from(category: ServiceCategory) -> Self {
    category.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_known_values_loosely() {
    assert_eq!("adoracion".parse::<ServiceCategory>().unwrap(), ServiceCategory::Adoracion);
    assert_eq!(" ALABANZA ".parse::<ServiceCategory>().unwrap(), ServiceCategory::Alabanza);
    assert_eq!(ServiceCategory::Adoracion.to_string(), "Adoración");
  }

  #[test]
  fn unknown_values_are_kept() {
    let c: ServiceCategory = "Santa Cena".parse().unwrap();
    assert_eq!(c, ServiceCategory::Custom("Santa Cena".into()));
    assert_eq!(c.order(), None);
  }

  #[test]
  fn serializes_as_display_string() {
    let json = serde_json::to_string(&ServiceCategory::Adoracion).unwrap();
    assert_eq!(json, "\"Adoración\"");
    let back: ServiceCategory = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ServiceCategory::Adoracion);
  }
}
