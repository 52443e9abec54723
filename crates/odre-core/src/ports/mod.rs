pub mod document_store;
pub mod song_source;

pub use document_store::{DocumentStore, StoreError};
pub use song_source::{SongSource, SourceError};
