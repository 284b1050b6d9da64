//! Catalog ingestion
//!
//! Turns search candidates into stored authors and books without ever
//! creating a second row for the same author name or book title. Every
//! candidate resolves to exactly one [`IngestOutcome`].
//!
//! Per candidate, in input order:
//! 1. a book with the same title already stored → `AlreadyPresent`, whatever
//!    else the candidate carries
//! 2. the first listed author is resolved by exact name, created if absent
//! 3. the book is stored with the first listed language → `Registered`
//!
//! Steps 2 and 3 commit together, so a failed book insert never leaves a new
//! author behind. Candidates that cannot be catalogued become `Failed` and the
//! batch moves on. A store failure stops the batch; candidates handled before
//! it stay stored.

use crate::error::{CoreError, Result};
use core_library::models::{NewAuthor, NewCatalogEntry};
use core_library::repositories::{BookRepository, Resolved};
use core_library::LibraryError;
use core_metadata::CandidateBook;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// What happened to one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestOutcome {
    /// A book with this title was already stored; nothing changed
    AlreadyPresent { title: String },
    /// The book was stored and linked to `author_name`
    Registered { title: String, author_name: String },
    /// The candidate could not be catalogued
    Failed { title: String, reason: String },
}

impl IngestOutcome {
    pub fn title(&self) -> &str {
        match self {
            IngestOutcome::AlreadyPresent { title }
            | IngestOutcome::Registered { title, .. }
            | IngestOutcome::Failed { title, .. } => title,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, IngestOutcome::Registered { .. })
    }
}

impl fmt::Display for IngestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestOutcome::AlreadyPresent { title } => {
                write!(f, "'{}' is already registered", title)
            }
            IngestOutcome::Registered { title, author_name } => {
                write!(f, "Registered '{}' by {}", title, author_name)
            }
            IngestOutcome::Failed { title, reason } => {
                write!(f, "Could not register '{}': {}", title, reason)
            }
        }
    }
}

/// Outcomes of a batch, in candidate order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub outcomes: Vec<IngestOutcome>,
}

impl IngestReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn registered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_registered()).count()
    }

    pub fn already_present(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, IngestOutcome::AlreadyPresent { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, IngestOutcome::Failed { .. }))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IngestOutcome> {
        self.outcomes.iter()
    }
}

/// Writes candidates into the catalog store
pub struct Reconciler {
    books: Arc<dyn BookRepository>,
}

impl Reconciler {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// Reconcile every candidate in order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] when the store fails; outcomes reached
    /// before the failure are already persisted.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn ingest(&self, candidates: &[CandidateBook]) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        for candidate in candidates {
            let outcome = self.reconcile(candidate).await?;
            report.outcomes.push(outcome);
        }

        info!(
            registered = report.registered(),
            already_present = report.already_present(),
            failed = report.failed(),
            "Batch ingest finished"
        );
        Ok(report)
    }

    /// Reconcile the first candidate whose title contains `match_title`,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] when no candidate matches
    /// - [`CoreError::Store`] when the store fails
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn ingest_one(
        &self,
        candidates: &[CandidateBook],
        match_title: &str,
    ) -> Result<IngestOutcome> {
        let candidate = candidates
            .iter()
            .find(|candidate| candidate.title_contains(match_title))
            .ok_or_else(|| {
                CoreError::NotFound(format!("no search result matches '{}'", match_title))
            })?;

        self.reconcile(candidate).await
    }

    async fn reconcile(&self, candidate: &CandidateBook) -> Result<IngestOutcome> {
        let title = candidate.title.clone();

        if self.books.find_by_title(&title).await?.is_some() {
            debug!(%title, "Book already stored");
            return Ok(IngestOutcome::AlreadyPresent { title });
        }

        if let Err(reason) = candidate.validate() {
            warn!(%title, %reason, "Skipping unusable candidate");
            return Ok(IngestOutcome::Failed { title, reason });
        }

        let (author, language) = match (candidate.primary_author(), candidate.primary_language()) {
            (Some(author), Some(language)) => (author, language),
            _ => {
                return Ok(IngestOutcome::Failed {
                    title,
                    reason: "no author or language listed".to_string(),
                })
            }
        };

        let entry = NewCatalogEntry::new(
            NewAuthor::new(author.name.clone(), author.birth_year, author.death_year),
            title.clone(),
            language,
            candidate.download_count,
        );
        match self.books.register(&entry).await {
            Ok(Resolved::Created(book)) => {
                info!(title = %book.title, author = %entry.author.name, "Book registered");
                Ok(IngestOutcome::Registered {
                    title: book.title,
                    author_name: entry.author.name,
                })
            }
            Ok(Resolved::Existing(_)) => {
                debug!(%title, "Book stored concurrently");
                Ok(IngestOutcome::AlreadyPresent { title })
            }
            Err(err) => rejected(title, err),
        }
    }
}

/// Invalid records fail the candidate; anything else fails the batch.
fn rejected(title: String, err: LibraryError) -> Result<IngestOutcome> {
    match err {
        LibraryError::InvalidInput { message, .. } => {
            warn!(%title, reason = %message, "Candidate rejected by the store");
            Ok(IngestOutcome::Failed {
                title,
                reason: message,
            })
        }
        other => Err(CoreError::Store(other)),
    }
}
