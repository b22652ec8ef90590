//! In-memory state for one interactive session.
//!
//! The session owns the drug roster and the currently displayed report or
//! error. Everything is single-threaded: state changes only on completed
//! user actions or completed network responses.

use std::time::Duration;

use crate::entities::{AnalysisResult, DrugEntry};

/// Window within which a newer catalog query supersedes a pending one.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
pub struct Session {
    drugs: Vec<DrugEntry>,
    result: Option<AnalysisResult>,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster in insertion order, which is also display order.
    pub fn drugs(&self) -> &[DrugEntry] {
        &self.drugs
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the roster already contains the same drug (matching id, or
    /// name matching case-insensitively).
    pub fn contains_same_drug(&self, entry: &DrugEntry) -> bool {
        self.drugs.iter().any(|d| d.is_same_drug(entry))
    }

    /// Appends an entry unless the same drug is already present.
    ///
    /// Returns whether the entry was added; a held report is invalidated
    /// only when the roster actually changes.
    pub fn add(&mut self, entry: DrugEntry) -> bool {
        if self.contains_same_drug(&entry) {
            return false;
        }
        self.drugs.push(entry);
        self.result = None;
        true
    }

    /// Removes the entry with the given id; a second call is a no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.drugs.len();
        self.drugs.retain(|d| d.id != id);
        let removed = self.drugs.len() != before;
        if removed {
            self.result = None;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.drugs.clear();
        self.result = None;
        self.error = None;
    }

    pub fn set_result(&mut self, result: AnalysisResult) {
        self.error = None;
        self.result = Some(result);
    }

    /// Records a failed analysis; any partial result is discarded so the
    /// next attempt starts fresh.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.result = None;
        self.error = Some(message.into());
    }
}

/// Ticketing for debounced catalog search.
///
/// Each new query takes a fresh generation; a completed search is applied
/// only if its ticket still matches the live generation, so a stale response
/// can never overwrite the results of a newer query.
#[derive(Debug, Default)]
pub struct SearchDebouncer {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new live query, superseding any pending ticket.
    pub fn begin(&mut self, query: &str) -> SearchTicket {
        self.generation += 1;
        SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Accepts a completed search only if its ticket is still current.
    pub fn accept(
        &self,
        ticket: &SearchTicket,
        candidates: Vec<DrugEntry>,
    ) -> Option<Vec<DrugEntry>> {
        self.is_current(ticket).then_some(candidates)
    }
}
