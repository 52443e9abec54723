use odre_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS, TomlConfigBackend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sección `[storage]`: dónde vive la base de planes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
  pub db_path: PathBuf,
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig { db_path: PATHS.data_dir.join("odre.db") }
  }
}

impl StorageConfig {
  /// Carga la sección y la deja escrita si todavía no existía.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&CONFIG_BACKEND)
  }

  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_with_default("storage")?;
    backend.save_section("storage", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("storage", self)
  }

  pub fn database_url(&self) -> String {
    self.db_path.to_string_lossy().into_owned()
  }
}

/// Sección `[catalog]`: archivo JSON con el repertorio.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogConfig {
  pub songs_file: PathBuf,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    CatalogConfig { songs_file: PATHS.data_dir.join("canciones.json") }
  }
}

impl CatalogConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&CONFIG_BACKEND)
  }

  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_with_default("catalog")?;
    backend.save_section("catalog", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("catalog", self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn reads_sections_from_file() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("odre.toml");
    fs::write(
      &file,
      "[storage]\ndb_path = \"/srv/odre/planes.db\"\n\n[catalog]\nsongs_file = \"/srv/odre/canciones.json\"\n",
    )
    .unwrap();

    let backend = TomlConfigBackend::with_file(&file);
    let storage = StorageConfig::load_from(&backend).unwrap();
    let catalog = CatalogConfig::load_from(&backend).unwrap();

    assert_eq!(storage.database_url(), "/srv/odre/planes.db");
    assert_eq!(catalog.songs_file, PathBuf::from("/srv/odre/canciones.json"));
  }

  #[test]
  fn rejects_malformed_section() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("odre.toml");
    fs::write(&file, "[storage]\ndb_path = 3\n").unwrap();

    let backend = TomlConfigBackend::with_file(&file);
    assert!(matches!(StorageConfig::load_from(&backend), Err(ConfigError::Other(_))));
  }
}
