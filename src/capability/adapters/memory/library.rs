//! In-memory document library.

use crate::capability::ports::{
    CollaboratorError, CollaboratorResult, DocumentLibrary, DocumentSummary,
};
use crate::conversation::domain::{ArtifactReference, LocatorMap};
use async_trait::async_trait;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::{Arc, RwLock};

/// A document held by [`InMemoryDocumentLibrary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Document identifier.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Abstract or summary.
    pub summary: String,
    /// Subject domain used by recent listings.
    pub domain: String,
    /// Page texts, zero-based.
    pub pages: Vec<String>,
    /// Section label to page number.
    pub locators: LocatorMap,
}

impl StoredDocument {
    /// Creates a document with no pages or locators.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            domain: String::new(),
            pages: Vec::new(),
            locators: LocatorMap::new(),
        }
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the subject domain.
    #[must_use]
    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Appends a page.
    #[must_use]
    pub fn with_page(mut self, text: impl Into<String>) -> Self {
        self.pages.push(text.into());
        self
    }

    /// Records a section locator.
    #[must_use]
    pub fn with_section(mut self, label: impl Into<String>, page: u32) -> Self {
        self.locators.insert(label, page.to_string());
        self
    }

    fn artifact(&self) -> ArtifactReference {
        ArtifactReference::new(format!("documents/{}.pdf", self.id))
    }
}

/// Thread-safe in-memory document library.
///
/// Retrieval "downloads" a document by recording its artifact reference;
/// pages and locators can only be read for retrieved artifacts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentLibrary {
    state: Arc<RwLock<LibraryState>>,
}

#[derive(Debug, Default)]
struct LibraryState {
    documents: HashMap<String, StoredDocument>,
    retrieved: HashMap<ArtifactReference, String>,
}

impl InMemoryDocumentLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a document.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when lock acquisition fails.
    pub fn add_document(&self, document: StoredDocument) -> CollaboratorResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| CollaboratorError::other(std::io::Error::other(err.to_string())))?;
        state.documents.insert(document.id.clone(), document);
        Ok(())
    }

    fn with_retrieved<T>(
        &self,
        artifact: &ArtifactReference,
        read: impl FnOnce(&StoredDocument) -> T,
    ) -> CollaboratorResult<T> {
        let state = self
            .state
            .read()
            .map_err(|err| CollaboratorError::other(std::io::Error::other(err.to_string())))?;
        state
            .retrieved
            .get(artifact)
            .and_then(|id| state.documents.get(id))
            .map(read)
            .ok_or_else(|| CollaboratorError::NotFound(artifact.to_string()))
    }
}

#[async_trait]
impl DocumentLibrary for InMemoryDocumentLibrary {
    async fn retrieve(&self, document_id: &str) -> CollaboratorResult<ArtifactReference> {
        let mut state = self
            .state
            .write()
            .map_err(|err| CollaboratorError::other(std::io::Error::other(err.to_string())))?;
        let id = document_id.trim();
        let artifact = state
            .documents
            .get(id)
            .map(StoredDocument::artifact)
            .ok_or_else(|| CollaboratorError::NotFound(id.to_owned()))?;
        state.retrieved.insert(artifact.clone(), id.to_owned());
        Ok(artifact)
    }

    async fn extract_locators(
        &self,
        artifact: &ArtifactReference,
    ) -> CollaboratorResult<LocatorMap> {
        self.with_retrieved(artifact, |document| document.locators.clone())
    }

    async fn read_pages(
        &self,
        artifact: &ArtifactReference,
        pages: RangeInclusive<u32>,
    ) -> CollaboratorResult<Vec<String>> {
        self.with_retrieved(artifact, |document| {
            pages
                .filter_map(|page| usize::try_from(page).ok())
                .filter_map(|index| document.pages.get(index).cloned())
                .collect()
        })
    }

    async fn recent(&self, domain: &str) -> CollaboratorResult<Vec<DocumentSummary>> {
        let state = self
            .state
            .read()
            .map_err(|err| CollaboratorError::other(std::io::Error::other(err.to_string())))?;
        let wanted = domain.trim().to_ascii_lowercase();
        let mut listing: Vec<DocumentSummary> = state
            .documents
            .values()
            .filter(|document| document.domain.to_ascii_lowercase() == wanted)
            .map(|document| DocumentSummary {
                id: document.id.clone(),
                title: document.title.clone(),
                summary: document.summary.clone(),
            })
            .collect();
        listing.sort_by(|left, right| right.id.cmp(&left.id));
        Ok(listing)
    }
}
