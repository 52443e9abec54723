use odre_core::domain::{PlanDate, PlannedSong, ServiceCategory, SongId, SongRef};
use odre_core::services::PlanRepository;
use odre_storage::SqliteDocumentStore;

#[tokio::main(flavor = "current_thread")]
async fn main() {
  // usa la base configurada en [storage] de odre.toml
  let store = SqliteDocumentStore::new_from_config().expect("failed to open store");
  let repo = PlanRepository::new(store);

  let date = PlanDate::today();
  let items = vec![PlannedSong {
    song: SongRef {
      song_id: SongId::from("smoke-1"),
      title: "Canción de prueba".to_string(),
      base_key: "G".to_string(),
      lyrics_with_chords: "G   D\nLetra de prueba".to_string(),
    },
    service_category: Some(ServiceCategory::Alabanza),
  }];

  println!("Saving plan for {date}");

  repo.save(date, "Smoke", &items).await.expect("failed to save plan");

  let loaded = repo.load(date).await.expect("failed to load plan");

  println!("Loaded from DB: {loaded:?}");
}
