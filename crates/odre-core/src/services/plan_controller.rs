use std::cell::RefCell;

use tracing::{debug, warn};

use crate::domain::{PlanDate, ServiceCategory, SlotId, Song};
use crate::errors::CoreError;
use crate::ports::DocumentStore;
use crate::services::plan_repository::PlanRepository;
use crate::setlist::{SetlistModel, ShareGroup};

/// Estado del plan en edición.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
  /// Todavía no se eligió fecha.
  Empty,
  /// El setlist refleja lo último cargado o guardado para la fecha activa.
  Loaded,
  /// Hay cambios sin guardar. Sólo informativo: no bloquea nada.
  Dirty,
}

/// Resultado de [`PlanController::select_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
  /// Había plan guardado y se cargó.
  Found,
  /// La fecha no tenía plan: setlist vacío y director en blanco.
  NotFound,
  /// Mientras se cargaba se eligió otra fecha; la respuesta se descartó.
  Stale,
}

#[derive(Debug)]
struct Session {
  state: PlanState,
  active_date: Option<PlanDate>,
  director: String,
  setlist: SetlistModel,
  /// Se incrementa en cada `select_date`; sirve para descartar respuestas viejas.
  generation: u64,
  /// Se incrementa en cada cambio efectivo del plan.
  revision: u64,
}

/// Orquesta fecha elegida → carga → setlist, y setlist → guardado.
///
/// Es el único componente que habla con el [`SetlistModel`] y con el
/// [`PlanRepository`]. Está pensado para un único hilo de eventos: el estado
/// vive en un `RefCell` para que varias operaciones puedan estar esperando al
/// almacén a la vez (el usuario cambia de fecha antes de que llegue la
/// respuesta anterior). Ningún préstamo se mantiene a través de un `.await`.
///
/// Cambiar de fecha con cambios sin guardar los descarta.
pub struct PlanController<S>
where
  S: DocumentStore,
{
  repo: PlanRepository<S>,
  session: RefCell<Session>,
}

impl<S> PlanController<S>
where
  S: DocumentStore,
{
  pub fn new(repo: PlanRepository<S>) -> Self {
    let session = Session {
      state: PlanState::Empty,
      active_date: None,
      director: String::new(),
      setlist: SetlistModel::new(),
      generation: 0,
      revision: 0,
    };
    Self { repo, session: RefCell::new(session) }
  }

  pub fn repository(&self) -> &PlanRepository<S> {
    &self.repo
  }

  /// Carga el plan de `date` y lo pone en edición.
  ///
  /// Si la carga falla, el controlador queda como estaba antes de la llamada.
  /// Si mientras tanto se eligió otra fecha, devuelve [`LoadOutcome::Stale`]
  /// sin tocar nada.
  pub async fn select_date(&self, date: PlanDate) -> Result<LoadOutcome, CoreError> {
    let generation = {
      let mut session = self.session.borrow_mut();
      session.generation += 1;
      session.generation
    };

    let result = self.repo.load(date).await;

    let mut session = self.session.borrow_mut();
    if session.generation != generation {
      debug!(%date, "discarding stale plan load");
      return Ok(LoadOutcome::Stale);
    }

    let plan = result?;

    if session.state == PlanState::Dirty {
      warn!(previous = ?session.active_date, %date, "switching date with unsaved changes; discarding them");
    }

    let outcome = match plan {
      Some(plan) => {
        session.director = plan.director;
        session.setlist = SetlistModel::from_planned(&plan.items);
        LoadOutcome::Found
      }
      None => {
        session.director.clear();
        session.setlist = SetlistModel::new();
        LoadOutcome::NotFound
      }
    };

    session.active_date = Some(date);
    session.state = PlanState::Loaded;
    session.revision += 1;
    Ok(outcome)
  }

  /// Guarda el setlist y el director en la fecha activa (upsert).
  ///
  /// Si falla, el setlist no se toca y el estado sigue siendo `Dirty`.
  pub async fn save(&self) -> Result<(), CoreError> {
    let (date, director, items, revision) = {
      let session = self.session.borrow();
      let date = session.active_date.ok_or(CoreError::NoActiveDate)?;
      (date, session.director.clone(), session.setlist.to_planned(), session.revision)
    };

    self.repo.save(date, &director, &items).await?;

    let mut session = self.session.borrow_mut();
    // Sólo se marca como guardado si nadie cambió de fecha ni editó mientras tanto.
    if session.active_date == Some(date) && session.revision == revision {
      session.state = PlanState::Loaded;
    }
    Ok(())
  }

  /// Borra el plan de la fecha activa y deja el setlist vacío.
  pub async fn delete_plan(&self) -> Result<(), CoreError> {
    let date = self.session.borrow().active_date.ok_or(CoreError::NoActiveDate)?;

    self.repo.delete(date).await?;

    let mut session = self.session.borrow_mut();
    if session.active_date == Some(date) {
      session.setlist.clear();
      session.director.clear();
      session.state = PlanState::Loaded;
      session.revision += 1;
    }
    Ok(())
  }

  // -------- Mutaciones del setlist --------

  fn mutate<R>(&self, f: impl FnOnce(&mut Session) -> (R, bool)) -> R {
    let mut session = self.session.borrow_mut();
    let (out, changed) = f(&mut *session);
    if changed {
      session.revision += 1;
      if session.state == PlanState::Loaded {
        session.state = PlanState::Dirty;
      }
    }
    out
  }

  pub fn add_song(&self, song: &Song) -> SlotId {
    self.mutate(|s| (s.setlist.add(song), true))
  }

  pub fn remove_song(&self, slot_id: SlotId) -> bool {
    self.mutate(|s| {
      let changed = s.setlist.remove(slot_id);
      (changed, changed)
    })
  }

  pub fn reorder(&self, from: usize, to: usize) -> bool {
    self.mutate(|s| {
      let changed = s.setlist.reorder(from, to);
      (changed, changed)
    })
  }

  pub fn set_category(&self, slot_id: SlotId, category: Option<ServiceCategory>) -> bool {
    self.mutate(|s| {
      let changed = s.setlist.set_category(slot_id, category);
      (changed, changed)
    })
  }

  pub fn set_transposition(&self, slot_id: SlotId, semitones: i32) -> bool {
    self.mutate(|s| {
      let changed = s.setlist.set_transposition(slot_id, semitones);
      (changed, changed)
    })
  }

  pub fn set_director(&self, director: &str) -> bool {
    self.mutate(|s| {
      let changed = s.director != director;
      if changed {
        s.director = director.to_string();
      }
      (changed, changed)
    })
  }

  // -------- Lectura --------

  pub fn state(&self) -> PlanState {
    self.session.borrow().state
  }

  pub fn active_date(&self) -> Option<PlanDate> {
    self.session.borrow().active_date
  }

  pub fn director(&self) -> String {
    self.session.borrow().director.clone()
  }

  /// Acceso de lectura al setlist. No llamar a mutaciones desde `f`.
  pub fn with_setlist<R>(&self, f: impl FnOnce(&SetlistModel) -> R) -> R {
    f(&self.session.borrow().setlist)
  }

  pub fn share_groups(&self) -> Vec<ShareGroup> {
    self.with_setlist(SetlistModel::share_groups)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::InMemoryDocumentStore;
  use crate::domain::{PlannedSong, SongId, SongRef};
  use crate::ports::StoreError;
  use serde_json::Value;
  use std::sync::Mutex;
  use std::sync::atomic::{AtomicBool, Ordering};
  use tokio::sync::oneshot;

  fn date(s: &str) -> PlanDate {
    s.parse().unwrap()
  }

  fn song(id: &str, title: &str, key: &str) -> Song {
    Song {
      id: SongId::from(id),
      title: title.to_string(),
      base_key: key.to_string(),
      lyrics_with_chords: format!("{key}\n{title}"),
      rhythm_category: String::new(),
      artist: String::new(),
    }
  }

  fn planned(id: &str, title: &str) -> PlannedSong {
    PlannedSong {
      song: SongRef::from(&song(id, title, "D")),
      service_category: None,
    }
  }

  fn controller(store: InMemoryDocumentStore) -> PlanController<InMemoryDocumentStore> {
    PlanController::new(PlanRepository::new(store))
  }

  #[tokio::test]
  async fn starts_empty_and_loads_unknown_date_as_blank() {
    let ctl = controller(InMemoryDocumentStore::new());
    assert_eq!(ctl.state(), PlanState::Empty);

    let outcome = ctl.select_date(date("2024-05-05")).await.unwrap();

    assert_eq!(outcome, LoadOutcome::NotFound);
    assert_eq!(ctl.state(), PlanState::Loaded);
    assert_eq!(ctl.director(), "");
    assert!(ctl.with_setlist(SetlistModel::is_empty));
  }

  #[tokio::test]
  async fn mutations_mark_dirty_and_save_cleans() {
    let store = InMemoryDocumentStore::new();
    let ctl = controller(store.clone());
    let d = date("2024-05-05");
    ctl.select_date(d).await.unwrap();

    assert!(!ctl.remove_song(SlotId::new()));
    assert_eq!(ctl.state(), PlanState::Loaded);

    let slot = ctl.add_song(&song("s1", "Alabad", "G"));
    ctl.set_director("Juan");
    assert_eq!(ctl.state(), PlanState::Dirty);

    ctl.set_transposition(slot, 2);
    ctl.save().await.unwrap();
    assert_eq!(ctl.state(), PlanState::Loaded);

    let plan = PlanRepository::new(store).load(d).await.unwrap().unwrap();
    assert_eq!(plan.director, "Juan");
    assert_eq!(plan.items.len(), 1);
    assert_eq!(plan.items[0].song.base_key, "G");
  }

  #[tokio::test]
  async fn reload_resets_transposition_and_keeps_order() {
    let ctl = controller(InMemoryDocumentStore::new());
    let d = date("2024-05-05");
    ctl.select_date(d).await.unwrap();

    let a = ctl.add_song(&song("s1", "Alabad", "G"));
    ctl.add_song(&song("s2", "Santo", "D"));
    ctl.set_category(a, Some(ServiceCategory::Bienvenida));
    ctl.set_transposition(a, 3);
    assert!(ctl.reorder(0, 1));
    ctl.save().await.unwrap();

    ctl.select_date(d).await.unwrap();

    ctl.with_setlist(|setlist| {
      let titles: Vec<_> = setlist.items().iter().map(|i| i.song.title.as_str()).collect();
      assert_eq!(titles, ["Santo", "Alabad"]);
      assert!(setlist.items().iter().all(|i| i.transposition_offset == 0));
      assert_eq!(setlist.items()[1].service_category, Some(ServiceCategory::Bienvenida));
    });
  }

  #[tokio::test]
  async fn switching_dates_discards_unsaved_edits() {
    let ctl = controller(InMemoryDocumentStore::new());
    ctl.select_date(date("2024-05-05")).await.unwrap();
    ctl.add_song(&song("s1", "Alabad", "G"));
    assert_eq!(ctl.state(), PlanState::Dirty);

    ctl.select_date(date("2024-05-12")).await.unwrap();
    ctl.select_date(date("2024-05-05")).await.unwrap();

    assert!(ctl.with_setlist(SetlistModel::is_empty));
    assert_eq!(ctl.state(), PlanState::Loaded);
  }

  #[tokio::test]
  async fn delete_plan_clears_everything() {
    let store = InMemoryDocumentStore::new();
    let ctl = controller(store.clone());
    let d = date("2024-05-05");
    ctl.select_date(d).await.unwrap();
    ctl.add_song(&song("s1", "Alabad", "G"));
    ctl.set_director("Juan");
    ctl.save().await.unwrap();

    ctl.delete_plan().await.unwrap();

    assert_eq!(ctl.state(), PlanState::Loaded);
    assert_eq!(ctl.director(), "");
    assert!(ctl.with_setlist(SetlistModel::is_empty));
    assert!(store.is_empty());
  }

  #[tokio::test]
  async fn save_without_date_is_rejected() {
    let ctl = controller(InMemoryDocumentStore::new());
    ctl.add_song(&song("s1", "Alabad", "G"));

    assert!(matches!(ctl.save().await, Err(CoreError::NoActiveDate)));
    assert!(matches!(ctl.delete_plan().await, Err(CoreError::NoActiveDate)));
    assert_eq!(ctl.state(), PlanState::Empty);
  }

  /// Almacén que puede fallar a demanda.
  #[derive(Default)]
  struct FlakyStore {
    inner: InMemoryDocumentStore,
    failing: AtomicBool,
  }

  #[async_trait::async_trait]
  impl DocumentStore for FlakyStore {
    async fn get_by_key(&self, key: &str) -> Result<Option<Value>, StoreError> {
      if self.failing.load(Ordering::SeqCst) {
        return Err(StoreError::Unavailable("timeout".into()));
      }
      self.inner.get_by_key(key).await
    }
    async fn upsert_by_key(&self, key: &str, document: Value) -> Result<(), StoreError> {
      if self.failing.load(Ordering::SeqCst) {
        return Err(StoreError::Unavailable("timeout".into()));
      }
      self.inner.upsert_by_key(key, document).await
    }
    async fn delete_by_key(&self, key: &str) -> Result<(), StoreError> {
      if self.failing.load(Ordering::SeqCst) {
        return Err(StoreError::Unavailable("timeout".into()));
      }
      self.inner.delete_by_key(key).await
    }
  }

  #[tokio::test]
  async fn failed_save_keeps_edits_and_dirty_state() {
    let ctl = PlanController::new(PlanRepository::new(FlakyStore::default()));
    ctl.select_date(date("2024-05-05")).await.unwrap();
    ctl.add_song(&song("s1", "Alabad", "G"));

    ctl.repository().store().failing.store(true, Ordering::SeqCst);
    let err = ctl.save().await.unwrap_err();

    assert!(matches!(err, CoreError::Repository(StoreError::Unavailable(_))));
    assert_eq!(ctl.state(), PlanState::Dirty);
    assert_eq!(ctl.with_setlist(SetlistModel::len), 1);
  }

  #[tokio::test]
  async fn failed_load_leaves_previous_plan_in_place() {
    let ctl = PlanController::new(PlanRepository::new(FlakyStore::default()));
    let d = date("2024-05-05");
    ctl.select_date(d).await.unwrap();
    ctl.add_song(&song("s1", "Alabad", "G"));

    ctl.repository().store().failing.store(true, Ordering::SeqCst);
    assert!(ctl.select_date(date("2024-05-12")).await.is_err());

    assert_eq!(ctl.active_date(), Some(d));
    assert_eq!(ctl.state(), PlanState::Dirty);
    assert_eq!(ctl.with_setlist(SetlistModel::len), 1);
  }

  #[tokio::test]
  async fn failed_delete_keeps_plan_and_state() {
    let ctl = PlanController::new(PlanRepository::new(FlakyStore::default()));
    let d = date("2024-05-05");
    ctl.select_date(d).await.unwrap();
    ctl.add_song(&song("s1", "Alabad", "G"));
    ctl.set_director("Juan");
    ctl.save().await.unwrap();

    ctl.repository().store().failing.store(true, Ordering::SeqCst);
    let err = ctl.delete_plan().await.unwrap_err();

    assert!(matches!(err, CoreError::Repository(StoreError::Unavailable(_))));
    assert_eq!(ctl.state(), PlanState::Loaded);
    assert_eq!(ctl.director(), "Juan");
    assert_eq!(ctl.with_setlist(SetlistModel::len), 1);

    ctl.add_song(&song("s2", "Santo", "D"));
    assert!(ctl.delete_plan().await.is_err());
    assert_eq!(ctl.state(), PlanState::Dirty);
    assert_eq!(ctl.with_setlist(SetlistModel::len), 2);
  }

  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  enum Op {
    Get,
    Upsert,
    Delete,
  }

  /// Almacén en el que una operación sobre una clave concreta espera a que se
  /// abra la compuerta.
  struct GatedStore {
    inner: InMemoryDocumentStore,
    gated_op: Op,
    gated_key: String,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
  }

  impl GatedStore {
    fn new(inner: InMemoryDocumentStore, gated_op: Op, gated_date: PlanDate) -> (Self, oneshot::Sender<()>) {
      let (open_gate, gate) = oneshot::channel();
      let store = GatedStore { inner, gated_op, gated_key: gated_date.key(), gate: Mutex::new(Some(gate)) };
      (store, open_gate)
    }

    async fn pass(&self, op: Op, key: &str) {
      if op == self.gated_op && key == self.gated_key {
        let rx = self.gate.lock().unwrap().take();
        if let Some(rx) = rx {
          let _ = rx.await;
        }
      }
    }
  }

  #[async_trait::async_trait]
  impl DocumentStore for GatedStore {
    async fn get_by_key(&self, key: &str) -> Result<Option<Value>, StoreError> {
      self.pass(Op::Get, key).await;
      self.inner.get_by_key(key).await
    }
    async fn upsert_by_key(&self, key: &str, document: Value) -> Result<(), StoreError> {
      self.pass(Op::Upsert, key).await;
      self.inner.upsert_by_key(key, document).await
    }
    async fn delete_by_key(&self, key: &str) -> Result<(), StoreError> {
      self.pass(Op::Delete, key).await;
      self.inner.delete_by_key(key).await
    }
  }

  /// Dos fechas guardadas: `a` con dos canciones (Ana) y `b` con una (Beto).
  async fn seeded(a: PlanDate, b: PlanDate) -> InMemoryDocumentStore {
    let inner = InMemoryDocumentStore::new();
    let seed = PlanRepository::new(inner.clone());
    seed.save(a, "Ana", &[planned("s1", "Alabad"), planned("s2", "Santo")]).await.unwrap();
    seed.save(b, "Beto", &[planned("s3", "Digno")]).await.unwrap();
    inner
  }

  fn assert_showing_b(ctl: &PlanController<GatedStore>, b: PlanDate) {
    assert_eq!(ctl.active_date(), Some(b));
    assert_eq!(ctl.state(), PlanState::Loaded);
    assert_eq!(ctl.director(), "Beto");
    ctl.with_setlist(|setlist| {
      let titles: Vec<_> = setlist.items().iter().map(|i| i.song.title.as_str()).collect();
      assert_eq!(titles, ["Digno"]);
    });
  }

  #[tokio::test]
  async fn slow_load_never_overwrites_newer_date() {
    let a = date("2024-05-05");
    let b = date("2024-05-12");

    let (store, open_gate) = GatedStore::new(seeded(a, b).await, Op::Get, a);
    let ctl = PlanController::new(PlanRepository::new(store));

    let load_a = ctl.select_date(a);
    let load_b = async {
      let outcome = ctl.select_date(b).await;
      let _ = open_gate.send(());
      outcome
    };
    let (ra, rb) = tokio::join!(load_a, load_b);

    assert_eq!(ra.unwrap(), LoadOutcome::Stale);
    assert_eq!(rb.unwrap(), LoadOutcome::Found);
    assert_showing_b(&ctl, b);
  }

  #[tokio::test]
  async fn slow_save_does_not_touch_newer_date() {
    let a = date("2024-05-05");
    let b = date("2024-05-12");

    let inner = seeded(a, b).await;
    let (store, open_gate) = GatedStore::new(inner.clone(), Op::Upsert, a);
    let ctl = PlanController::new(PlanRepository::new(store));
    ctl.select_date(a).await.unwrap();
    ctl.add_song(&song("s4", "Cuán grande", "C"));

    let save_a = ctl.save();
    let switch_to_b = async {
      let outcome = ctl.select_date(b).await;
      let _ = open_gate.send(());
      outcome
    };
    let (saved, switched) = tokio::join!(save_a, switch_to_b);

    saved.unwrap();
    assert_eq!(switched.unwrap(), LoadOutcome::Found);
    assert_showing_b(&ctl, b);

    let stored_a = PlanRepository::new(inner).load(a).await.unwrap().unwrap();
    assert_eq!(stored_a.items.len(), 3);
  }

  #[tokio::test]
  async fn slow_delete_does_not_touch_newer_date() {
    let a = date("2024-05-05");
    let b = date("2024-05-12");

    let inner = seeded(a, b).await;
    let (store, open_gate) = GatedStore::new(inner.clone(), Op::Delete, a);
    let ctl = PlanController::new(PlanRepository::new(store));
    ctl.select_date(a).await.unwrap();

    let delete_a = ctl.delete_plan();
    let switch_to_b = async {
      let outcome = ctl.select_date(b).await;
      let _ = open_gate.send(());
      outcome
    };
    let (deleted, switched) = tokio::join!(delete_a, switch_to_b);

    deleted.unwrap();
    assert_eq!(switched.unwrap(), LoadOutcome::Found);
    assert_showing_b(&ctl, b);

    let repo = PlanRepository::new(inner);
    assert_eq!(repo.load(a).await.unwrap(), None);
    assert!(repo.load(b).await.unwrap().is_some());
  }

  #[tokio::test]
  async fn share_groups_use_current_keys() {
    let ctl = controller(InMemoryDocumentStore::new());
    ctl.select_date(date("2024-05-05")).await.unwrap();
    let slot = ctl.add_song(&song("s1", "Alabad", "G"));
    ctl.set_category(slot, Some(ServiceCategory::Alabanza));
    ctl.set_transposition(slot, 2);

    let groups = ctl.share_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].entries[0].display_key, "A");
  }
}
