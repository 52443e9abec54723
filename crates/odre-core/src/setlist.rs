//! Setlist: la lista ordenada de canciones del culto que se está planificando.

use serde::Serialize;

use crate::domain::{PlannedSong, ServiceCategory, SlotId, Song, SongId, SongRef};
use crate::transposer::transpose;

/// Una canción dentro del setlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetlistItem {
  /// Clave estable del hueco (drag & drop, clave de lista en la UI).
  pub slot_id: SlotId,
  /// Copia de la canción tomada al añadirla.
  pub song: SongRef,
  /// Momento del culto asignado, si lo hay.
  pub service_category: Option<ServiceCategory>,
  /// Desplazamiento en semitonos. Estado de sesión: nunca se persiste.
  pub transposition_offset: i32,
}

impl SetlistItem {
  fn new(song: SongRef, service_category: Option<ServiceCategory>) -> Self {
    Self { slot_id: SlotId::new(), song, service_category, transposition_offset: 0 }
  }

  /// Letra con los acordes en la tonalidad actual del ítem.
  pub fn rendered_lyrics(&self) -> String {
    transpose(&self.song.lyrics_with_chords, self.transposition_offset)
  }

  /// Tonalidad actual (tonalidad base desplazada).
  pub fn display_key(&self) -> String {
    transpose(&self.song.base_key, self.transposition_offset)
  }
}

/// Título y tonalidad actual de una canción, listo para compartir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareEntry {
  pub title: String,
  pub display_key: String,
}

/// Canciones de un mismo momento del culto, en orden del setlist.
///
/// `category == None` agrupa las canciones sin categoría.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareGroup {
  pub category: Option<ServiceCategory>,
  pub entries: Vec<ShareEntry>,
}

/// Colección ordenada y mutable que representa el plan en edición.
///
/// Las operaciones con un `slot_id` desconocido o índices fuera de rango no
/// hacen nada: la UI puede mandar eventos atrasados (doble clic, arrastre
/// después de borrar) y eso no debe romper el modelo. Las que mutan devuelven
/// `true` si cambiaron algo.
#[derive(Debug, Clone, Default)]
pub struct SetlistModel {
  items: Vec<SetlistItem>,
}

impl SetlistModel {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reconstruye el setlist desde su forma persistida.
  ///
  /// Cada ítem recibe un `slot_id` nuevo y desplazamiento 0.
  pub fn from_planned(planned: &[PlannedSong]) -> Self {
    let items = planned
      .iter()
      .map(|p| SetlistItem::new(p.song.clone(), p.service_category.clone()))
      .collect();
    Self { items }
  }

  /// Forma persistida, en orden. Deja fuera el estado de sesión.
  pub fn to_planned(&self) -> Vec<PlannedSong> {
    self
      .items
      .iter()
      .map(|item| PlannedSong { song: item.song.clone(), service_category: item.service_category.clone() })
      .collect()
  }

  // -------- COMMAND (write) --------

  /// Añade una copia de `song` al final. Admite duplicados.
  pub fn add(&mut self, song: &Song) -> SlotId {
    let item = SetlistItem::new(SongRef::from(song), None);
    let slot_id = item.slot_id;
    self.items.push(item);
    slot_id
  }

  pub fn remove(&mut self, slot_id: SlotId) -> bool {
    match self.index_of(slot_id) {
      Some(index) => {
        self.items.remove(index);
        true
      }
      None => false,
    }
  }

  /// Mueve el ítem de `from` a `to`, desplazando los intermedios.
  pub fn reorder(&mut self, from: usize, to: usize) -> bool {
    let len = self.items.len();
    if from >= len || to >= len || from == to {
      return false;
    }

    let item = self.items.remove(from);
    self.items.insert(to, item);
    true
  }

  /// Asigna o quita (`None`) la categoría del ítem.
  pub fn set_category(&mut self, slot_id: SlotId, category: Option<ServiceCategory>) -> bool {
    match self.get_mut(slot_id) {
      Some(item) if item.service_category != category => {
        item.service_category = category;
        true
      }
      _ => false,
    }
  }

  /// Fija el desplazamiento absoluto en semitonos.
  ///
  /// Para subir o bajar un semitono: leer [`Self::transposition`] y llamar
  /// con el valor ±1.
  pub fn set_transposition(&mut self, slot_id: SlotId, semitones: i32) -> bool {
    match self.get_mut(slot_id) {
      Some(item) if item.transposition_offset != semitones => {
        item.transposition_offset = semitones;
        true
      }
      _ => false,
    }
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  // -------- QUERY (read) --------

  pub fn items(&self) -> &[SetlistItem] {
    &self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn get(&self, slot_id: SlotId) -> Option<&SetlistItem> {
    self.items.iter().find(|i| i.slot_id == slot_id)
  }

  fn get_mut(&mut self, slot_id: SlotId) -> Option<&mut SetlistItem> {
    self.items.iter_mut().find(|i| i.slot_id == slot_id)
  }

  pub fn index_of(&self, slot_id: SlotId) -> Option<usize> {
    self.items.iter().position(|i| i.slot_id == slot_id)
  }

  /// Si la canción del catálogo ya está en el plan (para marcarla en el repertorio).
  pub fn contains_song(&self, song_id: &SongId) -> bool {
    self.items.iter().any(|i| &i.song.song_id == song_id)
  }

  pub fn transposition(&self, slot_id: SlotId) -> Option<i32> {
    self.get(slot_id).map(|i| i.transposition_offset)
  }

  pub fn rendered_lyrics(&self, slot_id: SlotId) -> Option<String> {
    self.get(slot_id).map(SetlistItem::rendered_lyrics)
  }

  pub fn display_key(&self, slot_id: SlotId) -> Option<String> {
    self.get(slot_id).map(SetlistItem::display_key)
  }

  /// Agrupa `(título, tonalidad actual)` por momento del culto.
  ///
  /// Orden de grupos: las cinco categorías fijas, luego las libres por orden
  /// de aparición y al final las canciones sin categoría. Dentro de cada
  /// grupo se respeta el orden del setlist; los grupos vacíos no aparecen.
  pub fn share_groups(&self) -> Vec<ShareGroup> {
    let mut groups: Vec<ShareGroup> = Vec::new();

    for item in &self.items {
      let entry = ShareEntry { title: item.song.title.clone(), display_key: item.display_key() };
      match groups.iter_mut().find(|g| g.category == item.service_category) {
        Some(group) => group.entries.push(entry),
        None => groups.push(ShareGroup { category: item.service_category.clone(), entries: vec![entry] }),
      }
    }

    // Estable: las libres conservan su orden de aparición.
    groups.sort_by_key(|g| match &g.category {
      Some(c) => (c.order().map_or(1, |_| 0), c.order().unwrap_or(0)),
      None => (2, 0),
    });

    groups
  }
}
