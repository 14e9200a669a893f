//! In-memory collaborator adapters.

mod library;
mod web;

pub use library::{InMemoryDocumentLibrary, StoredDocument};
pub use web::InMemoryWebSearch;
