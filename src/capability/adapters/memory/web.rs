//! In-memory web search.

use crate::capability::ports::{CollaboratorError, CollaboratorResult, WebSearch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Web search adapter answering from a fixed table of query summaries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWebSearch {
    answers: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryWebSearch {
    /// Creates an adapter with no answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the summary returned for `query` (matched case-insensitively).
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when lock acquisition fails.
    pub fn set_answer(
        &self,
        query: impl AsRef<str>,
        summary: impl Into<String>,
    ) -> CollaboratorResult<()> {
        let mut answers = self
            .answers
            .write()
            .map_err(|err| CollaboratorError::other(std::io::Error::other(err.to_string())))?;
        answers.insert(normalize(query.as_ref()), summary.into());
        Ok(())
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

#[async_trait]
impl WebSearch for InMemoryWebSearch {
    async fn search(&self, query: &str) -> CollaboratorResult<String> {
        let answers = self
            .answers
            .read()
            .map_err(|err| CollaboratorError::other(std::io::Error::other(err.to_string())))?;
        answers
            .get(&normalize(query))
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(query.trim().to_owned()))
    }
}
