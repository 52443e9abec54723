use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use odre_core::domain::{Song, SongId};
use odre_core::ports::{SongSource, SourceError};

use crate::config::CatalogConfig;

const TITLE: &[&str] = &["title", "titulo"];
const BASE_KEY: &[&str] = &["base_key", "tono", "key"];
const LYRICS: &[&str] = &["lyrics_with_chords", "letra", "lyrics"];
const RHYTHM: &[&str] = &["rhythm_category", "ritmo", "categoria"];
const ARTIST: &[&str] = &["artist", "artista"];

/// Repertorio leído de un archivo JSON con un array de canciones.
///
/// Acepta tanto los nombres de campo canónicos como los heredados
/// (`titulo`, `tono`, `letra`…). Gana el primer candidato no vacío.
pub struct JsonSongSource {
  path: PathBuf,
}

impl JsonSongSource {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn from_config(cfg: &CatalogConfig) -> Self {
    Self::new(cfg.songs_file.clone())
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[async_trait::async_trait]
impl SongSource for JsonSongSource {
  async fn fetch_all_songs(&self) -> Result<Vec<Song>, SourceError> {
    let raw = tokio::fs::read_to_string(&self.path)
      .await
      .map_err(|e| SourceError::Io(format!("{}: {e}", self.path.display())))?;

    let songs = parse_songs(&raw)?;
    debug!(path = %self.path.display(), songs = songs.len(), "catalog file read");
    Ok(songs)
  }
}

/// Normaliza un array JSON de canciones al esquema de [`Song`].
///
/// Las filas sin título se descartan. Si falta el id se genera uno estable
/// a partir de la posición y del título: `id-{índice}-{tres letras}`.
pub fn parse_songs(raw: &str) -> Result<Vec<Song>, SourceError> {
  let value: Value = serde_json::from_str(raw).map_err(|e| SourceError::Format(e.to_string()))?;

  let Value::Array(rows) = value else {
    return Err(SourceError::Format("expected a JSON array of songs".to_string()));
  };

  let mut songs = Vec::with_capacity(rows.len());

  for (index, row) in rows.into_iter().enumerate() {
    let Value::Object(obj) = row else {
      warn!(index, "catalog row is not an object, skipped");
      continue;
    };

    let Some(title) = pick(&obj, TITLE) else {
      warn!(index, "catalog row without title, skipped");
      continue;
    };

    let id = match obj.get("id").and_then(scalar) {
      Some(id) => SongId::new(id),
      None => fallback_id(index, &title),
    };

    songs.push(Song {
      id,
      base_key: pick(&obj, BASE_KEY).unwrap_or_default(),
      lyrics_with_chords: pick(&obj, LYRICS).unwrap_or_default(),
      rhythm_category: pick(&obj, RHYTHM).unwrap_or_default(),
      artist: pick(&obj, ARTIST).unwrap_or_default(),
      title,
    });
  }

  Ok(songs)
}

fn pick(obj: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
  candidates
    .iter()
    .filter_map(|name| obj.get(*name).and_then(scalar))
    .find(|s| !s.trim().is_empty())
}

/// Cadenas tal cual; números como texto. Lo demás no cuenta.
fn scalar(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn fallback_id(index: usize, title: &str) -> SongId {
  let prefix: String = title.chars().take(3).collect();
  SongId::new(format!("id-{index}-{prefix}"))
}
