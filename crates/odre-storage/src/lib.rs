pub mod config;
pub mod json_source;
pub mod models;
pub mod schema;
pub mod sqlite_store;

pub use config::{CatalogConfig, StorageConfig};
pub use json_source::JsonSongSource;
pub use sqlite_store::SqliteDocumentStore;
