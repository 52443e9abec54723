use crate::domain::ids::SongId;
use serde::{Deserialize, Serialize};

/// Canción del repertorio general.
///
/// Es de sólo lectura para el núcleo: la crea y edita la gestión del
/// catálogo. Cualquier normalización de nombres de campo (`tono`/`key`,
/// `letra`/`lyrics`…) ocurre en el adapter de la fuente, no aquí.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
  /// Identificador único dentro del catálogo.
  pub id: SongId,
  /// Título de la canción.
  pub title: String,
  /// Tonalidad base, por ejemplo `"G"` o `"Bm"`.
  pub base_key: String,
  /// Letra con los acordes intercalados (cifrado).
  pub lyrics_with_chords: String,
  /// Ritmo o categoría usada para filtrar (`"Alabanza"`, `"Adoración"`…).
  #[serde(default)]
  pub rhythm_category: String,
  /// Intérprete, sólo para mostrar.
  #[serde(default)]
  pub artist: String,
}

/// Copia de los campos mostrables de una [`Song`] tomada al añadirla al plan.
///
/// Así, editar el catálogo después no altera un culto ya planificado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRef {
  pub song_id: SongId,
  pub title: String,
  pub base_key: String,
  pub lyrics_with_chords: String,
}

impl From<&Song> for SongRef {
  fn from(song: &Song) -> Self {
    SongRef {
      song_id: song.id.clone(),
      title: song.title.clone(),
      base_key: song.base_key.clone(),
      lyrics_with_chords: song.lyrics_with_chords.clone(),
    }
  }
}
