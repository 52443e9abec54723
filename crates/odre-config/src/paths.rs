use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno que fuerza una instalación portable en ese directorio.
pub const BASE_DIR_ENV: &str = "ODRE_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Directorios de trabajo de Odre.
///
/// - `config_dir`: `odre.toml`
/// - `data_dir`: base de datos de planes, catálogo local
/// - `cache_dir`: reservado
#[derive(Debug, Clone)]
pub struct OdrePaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl OdrePaths {
  /// Usa `ODRE_BASE_DIR` si está definida; si no, los directorios del sistema.
  pub fn detect() -> Result<Self, ConfigError> {
    match std::env::var_os(BASE_DIR_ENV) {
      Some(base) => Self::from_base(Path::new(&base)),
      None => Self::system(),
    }
  }

  /// Layout portable: todo cuelga de `base`.
  pub fn from_base(base: &Path) -> Result<Self, ConfigError> {
    let paths = Self {
      base_dir: base.to_path_buf(),
      config_dir: base.join("config"),
      data_dir: base.join("data"),
      cache_dir: base.join("cache"),
    };
    paths.ensure_dirs()?;
    Ok(paths)
  }

  fn system() -> Result<Self, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "odrenuevo", "odre").ok_or(ConfigError::Directories)?;
    let paths = Self {
      base_dir: proj_dirs.config_dir().to_path_buf(),
      config_dir: proj_dirs.config_dir().to_path_buf(),
      data_dir: proj_dirs.data_dir().to_path_buf(),
      cache_dir: proj_dirs.cache_dir().to_path_buf(),
    };
    paths.ensure_dirs()?;
    Ok(paths)
  }

  fn ensure_dirs(&self) -> Result<(), ConfigError> {
    std::fs::create_dir_all(&self.config_dir)?;
    std::fs::create_dir_all(&self.data_dir)?;
    std::fs::create_dir_all(&self.cache_dir)?;
    Ok(())
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("odre.toml")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  struct EnvVarGuard {
    key: String,
    original: Option<String>,
  }

  impl EnvVarGuard {
    fn new(key: &str, value: &str) -> Self {
      let original = std::env::var(key).ok();
      unsafe { std::env::set_var(key, value) };
      EnvVarGuard { key: key.to_owned(), original }
    }
  }

  impl Drop for EnvVarGuard {
    fn drop(&mut self) {
      match &self.original {
        Some(val) => unsafe { std::env::set_var(&self.key, val) },
        None => unsafe { std::env::remove_var(&self.key) },
      }
    }
  }

  #[test]
  fn base_dir_env_override() {
    let tmp = tempdir().unwrap();
    let _env = EnvVarGuard::new(BASE_DIR_ENV, tmp.path().to_str().unwrap());

    let paths = OdrePaths::detect().unwrap();

    assert_eq!(paths.base_dir, tmp.path());
    assert_eq!(paths.config_dir, tmp.path().join("config"));
    assert_eq!(paths.data_dir, tmp.path().join("data"));
    assert_eq!(paths.config_file(), tmp.path().join("config").join("odre.toml"));

    assert!(paths.config_dir.exists());
    assert!(paths.data_dir.exists());
    assert!(paths.cache_dir.exists());
  }
}
