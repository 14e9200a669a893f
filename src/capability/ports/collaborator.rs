//! Collaborator services reached only through capabilities.
//!
//! Document retrieval, section-locator extraction, page lookup, recent
//! listings and web search are external systems. The orchestration core
//! knows them solely by these contracts.

use crate::conversation::domain::{ArtifactReference, LocatorMap};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Arc;
use thiserror::Error;

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Short description of a document in a recent listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document identifier.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Abstract or summary text.
    pub summary: String,
}

/// Document search, retrieval and page access.
#[async_trait]
pub trait DocumentLibrary: Send + Sync {
    /// Retrieves a document by identifier and returns where it is stored.
    async fn retrieve(&self, document_id: &str) -> CollaboratorResult<ArtifactReference>;

    /// Extracts section locators (section label to page number).
    async fn extract_locators(&self, artifact: &ArtifactReference)
    -> CollaboratorResult<LocatorMap>;

    /// Reads the text of the given zero-based pages. Pages past the end of
    /// the document are skipped.
    async fn read_pages(
        &self,
        artifact: &ArtifactReference,
        pages: RangeInclusive<u32>,
    ) -> CollaboratorResult<Vec<String>>;

    /// Lists recently published documents in a subject domain.
    async fn recent(&self, domain: &str) -> CollaboratorResult<Vec<DocumentSummary>>;
}

/// General web search that returns a summarised answer.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Searches the web and summarises the results for `query`.
    async fn search(&self, query: &str) -> CollaboratorResult<String>;
}

/// Errors returned by collaborator adapters.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    /// The requested item does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The collaborator could not be reached.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// Generic collaborator failure.
    #[error("collaborator error: {0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl CollaboratorError {
    /// Wraps a collaborator failure.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(err))
    }
}
