use odre_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, TomlConfigBackend};
use serde::{Deserialize, Serialize};

/// Sección `[log]`: filtro por defecto de `tracing` si no hay `RUST_LOG`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LogConfig {
  pub filter: String,
}

impl Default for LogConfig {
  fn default() -> Self {
    LogConfig { filter: "info".to_string() }
  }
}

impl LogConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&CONFIG_BACKEND)
  }

  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_with_default("log")?;
    backend.save_section("log", &cfg)?;
    Ok(cfg)
  }
}
