//! Repertorio general: proyección en memoria del catálogo de canciones.

use std::collections::BTreeSet;

use tracing::info;

use crate::domain::{Song, SongId};
use crate::errors::CoreError;
use crate::ports::SongSource;
use crate::text::fold;

/// Criterios de búsqueda en el repertorio. Los vacíos no filtran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
  /// Texto libre: se busca en título e intérprete, sin distinguir
  /// mayúsculas ni tildes.
  pub text: Option<String>,
  /// Ritmo o categoría exacta (sin distinguir mayúsculas ni tildes).
  pub rhythm: Option<String>,
}

impl CatalogFilter {
  pub fn text(text: impl Into<String>) -> Self {
    Self { text: Some(text.into()), rhythm: None }
  }

  pub fn with_rhythm(mut self, rhythm: impl Into<String>) -> Self {
    self.rhythm = Some(rhythm.into());
    self
  }
}

/// Catálogo de sólo lectura, cargado una vez y ordenado por título.
#[derive(Debug, Clone, Default)]
pub struct SongCatalog {
  songs: Vec<Song>,
}

impl SongCatalog {
  /// Trae todas las canciones de la fuente.
  pub async fn load<S: SongSource + ?Sized>(source: &S) -> Result<Self, CoreError> {
    let songs = source.fetch_all_songs().await?;
    let catalog = Self::from_songs(songs);
    info!(songs = catalog.len(), "song catalog loaded");
    Ok(catalog)
  }

  pub fn from_songs(mut songs: Vec<Song>) -> Self {
    songs.sort_by_cached_key(|s| fold(&s.title));
    Self { songs }
  }

  pub fn all(&self) -> &[Song] {
    &self.songs
  }

  pub fn len(&self) -> usize {
    self.songs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.songs.is_empty()
  }

  pub fn get(&self, id: &SongId) -> Option<&Song> {
    self.songs.iter().find(|s| &s.id == id)
  }

  pub fn filter(&self, filter: &CatalogFilter) -> Vec<&Song> {
    let needle = filter.text.as_deref().map(fold).filter(|t| !t.is_empty());
    let rhythm = filter.rhythm.as_deref().map(fold).filter(|r| !r.is_empty());

    self
      .songs
      .iter()
      .filter(|song| match &needle {
        Some(n) => fold(&song.title).contains(n.as_str()) || fold(&song.artist).contains(n.as_str()),
        None => true,
      })
      .filter(|song| match &rhythm {
        Some(r) => &fold(&song.rhythm_category) == r,
        None => true,
      })
      .collect()
  }

  /// Ritmos distintos presentes en el catálogo, ordenados.
  pub fn rhythm_categories(&self) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();

    for song in &self.songs {
      let category = song.rhythm_category.trim();
      if !category.is_empty() && seen.insert(fold(category)) {
        out.push(category.to_string());
      }
    }

    out.sort_by_cached_key(|c| fold(c));
    out
  }
}
