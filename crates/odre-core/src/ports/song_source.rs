use crate::domain::Song;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
  #[error("io error: {0}")]
  Io(String),

  #[error("invalid catalog format: {0}")]
  Format(String),
}

/// Port que abstrae la obtención del repertorio completo.
///
/// Se llama una sola vez al arrancar; no hay paginación ni actualización
/// incremental. El adapter es quien normaliza los nombres de campo de la
/// fuente al esquema canónico de [`Song`].
#[async_trait::async_trait]
pub trait SongSource: Send + Sync {
  async fn fetch_all_songs(&self) -> Result<Vec<Song>, SourceError>;
}
