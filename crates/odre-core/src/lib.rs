pub mod adapters;
pub mod catalog;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod services;
pub mod setlist;
pub mod text;
pub mod transposer;

pub use catalog::{CatalogFilter, SongCatalog};
pub use errors::CoreError;
pub use setlist::{SetlistItem, SetlistModel, ShareEntry, ShareGroup};
pub use transposer::transpose;
