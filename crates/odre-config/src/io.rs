use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Reemplaza `path` con `contents` sin dejarlo nunca a medio escribir.
///
/// Escribe en un temporal de nombre único en el mismo directorio (mismo
/// sistema de archivos) y lo renombra encima del destino.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut tmp = NamedTempFile::new_in(dir)?;
  tmp.write_all(contents.as_bytes())?;
  tmp.as_file().sync_all()?;
  tmp.persist(path).map_err(|e| e.error)?;
  Ok(())
}
