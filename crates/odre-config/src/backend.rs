use crate::io::atomic_write_str;
use crate::paths::{ConfigError, OdrePaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

// toml_edit para escribir sin perder los comentarios del usuario
use toml_edit::{DocumentMut, Item};

/// Lectura y escritura de secciones `[nombre]` del archivo de configuración.
pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  path: PathBuf,
}

impl TomlConfigBackend {
  pub fn new(paths: OdrePaths) -> Self {
    Self { path: paths.config_file() }
  }

  /// Backend sobre un archivo concreto (tests, `--config`).
  pub fn with_file(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &PathBuf {
    &self.path
  }

  /// Como `load_section`, pero si falta el archivo o la sección devuelve
  /// `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let Some(content) = self.read()? else {
      return Ok(T::default());
    };

    let toml_val: toml::Value = toml::from_str(&content)?;
    match toml_val.get(section) {
      Some(table) => decode(section, table),
      None => Ok(T::default()),
    }
  }

  fn read(&self) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(&self.path) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }
}

fn decode<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let content = fs::read_to_string(&self.path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", self.path)))?;

    decode(section, table)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    // 1) Documento actual, o uno vacío si todavía no existe el archivo.
    let mut doc: DocumentMut = match self.read()? {
      Some(content) => {
        content.parse::<DocumentMut>().map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?
      }
      None => DocumentMut::new(),
    };

    // 2) La sección serializada con serde llega como "clave = valor" sin cabecera.
    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    // 3) Reemplaza sólo esa sección; el resto del archivo queda igual.
    doc[section] = section_item;

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    atomic_write_str(&self.path, &doc.to_string())?;

    Ok(())
  }
}
