use anyhow::{Context, Result, bail};
use tracing::warn;

use odre_core::domain::{PlanDate, ServiceCategory, SongId};
use odre_core::ports::DocumentStore;
use odre_core::services::{LoadOutcome, PlanController, PlanState};
use odre_core::{CatalogFilter, SongCatalog};

/// Tabla del repertorio filtrado: `id  título  tono  ritmo`.
pub fn list_songs(catalog: &SongCatalog, filter: &CatalogFilter) -> String {
  catalog
    .filter(filter)
    .iter()
    .map(|song| format!("{:<12} {:<40} {:<5} {}\n", song.id.as_str(), song.title, song.base_key, song.rhythm_category))
    .collect()
}

async fn open<S: DocumentStore>(ctl: &PlanController<S>, date: PlanDate) -> Result<()> {
  match ctl.select_date(date).await.with_context(|| format!("loading plan {date}"))? {
    LoadOutcome::Stale => bail!("plan {date} changed while loading"),
    LoadOutcome::Found | LoadOutcome::NotFound => Ok(()),
  }
}

async fn save_if_dirty<S: DocumentStore>(ctl: &PlanController<S>) -> Result<()> {
  if ctl.state() == PlanState::Dirty {
    ctl.save().await.context("saving plan")?;
  }
  Ok(())
}

/// Plan de la fecha activa, una canción por línea con su tonalidad actual.
pub fn render_plan<S: DocumentStore>(ctl: &PlanController<S>) -> String {
  let date = ctl.active_date().map(|d| d.to_string()).unwrap_or_default();
  let director = ctl.director();
  let director = if director.is_empty() { "(sin director)".to_string() } else { director };

  let mut out = format!("{date} · {director}\n");

  ctl.with_setlist(|setlist| {
    if setlist.is_empty() {
      out.push_str("  (sin canciones)\n");
    }
    for (i, item) in setlist.items().iter().enumerate() {
      let category = item.service_category.as_ref().map(ToString::to_string).unwrap_or_default();
      out.push_str(&format!("  {:>2}. {} [{}] {}\n", i + 1, item.song.title, item.display_key(), category));
    }
  });

  out
}

pub async fn show_plan<S: DocumentStore>(ctl: &PlanController<S>, date: PlanDate) -> Result<String> {
  open(ctl, date).await?;
  Ok(render_plan(ctl))
}

/// Añade canciones al final del plan. Las que ya están se saltan.
pub async fn add_songs<S: DocumentStore>(
  ctl: &PlanController<S>,
  catalog: &SongCatalog,
  date: PlanDate,
  song_ids: &[SongId],
  director: Option<&str>,
  category: Option<&ServiceCategory>,
) -> Result<String> {
  open(ctl, date).await?;

  for id in song_ids {
    let song = catalog.get(id).with_context(|| format!("unknown song id {id}"))?;

    if ctl.with_setlist(|s| s.contains_song(&song.id)) {
      warn!(song = %song.id, %date, "song already in setlist, skipped");
      continue;
    }

    let slot = ctl.add_song(song);
    if let Some(category) = category {
      ctl.set_category(slot, Some(category.clone()));
    }
  }

  if let Some(director) = director {
    ctl.set_director(director);
  }

  save_if_dirty(ctl).await?;
  Ok(render_plan(ctl))
}

/// Quita la canción en `position` (contando desde 1).
pub async fn remove_song<S: DocumentStore>(ctl: &PlanController<S>, date: PlanDate, position: usize) -> Result<String> {
  open(ctl, date).await?;

  let slot = ctl
    .with_setlist(|s| position.checked_sub(1).and_then(|i| s.items().get(i)).map(|item| item.slot_id))
    .with_context(|| format!("no song at position {position}"))?;

  ctl.remove_song(slot);
  save_if_dirty(ctl).await?;
  Ok(render_plan(ctl))
}

/// Mueve la canción de `from` a `to` (contando desde 1).
pub async fn move_song<S: DocumentStore>(
  ctl: &PlanController<S>,
  date: PlanDate,
  from: usize,
  to: usize,
) -> Result<String> {
  open(ctl, date).await?;

  let len = ctl.with_setlist(|s| s.len());
  if from == 0 || to == 0 || from > len || to > len {
    bail!("positions must be between 1 and {len}");
  }

  ctl.reorder(from - 1, to - 1);
  save_if_dirty(ctl).await?;
  Ok(render_plan(ctl))
}

pub async fn delete_plan<S: DocumentStore>(ctl: &PlanController<S>, date: PlanDate) -> Result<String> {
  open(ctl, date).await?;
  ctl.delete_plan().await.with_context(|| format!("deleting plan {date}"))?;
  Ok(format!("plan {date} deleted\n"))
}

/// Mensaje para compartir: canciones agrupadas por momento del culto.
pub async fn share_plan<S: DocumentStore>(ctl: &PlanController<S>, date: PlanDate, json: bool) -> Result<String> {
  open(ctl, date).await?;
  let groups = ctl.share_groups();

  if json {
    return Ok(serde_json::to_string_pretty(&groups)? + "\n");
  }

  let mut out = format!("Culto {date}\n");
  let director = ctl.director();
  if !director.is_empty() {
    out.push_str(&format!("Dirige: {director}\n"));
  }

  for group in groups {
    let title = group.category.map(|c| c.to_string()).unwrap_or_else(|| "Sin categoría".to_string());
    out.push_str(&format!("\n{title}:\n"));
    for entry in group.entries {
      out.push_str(&format!("- {} ({})\n", entry.title, entry.display_key));
    }
  }

  Ok(out)
}
