//! Application state management and transition operations.
//!
//! This module defines [`AppState`], the serializable view state for the
//! search/selection workflow, and [`StateStore`], the single owner of that
//! state. It serves as the single source of truth read by the UI and the
//! workflow coordinator.
//!
//! # Architecture
//!
//! State is mutated only through the named transition operations on
//! `StateStore`; there is no other write path. Every mutation publishes a
//! fresh snapshot on a `tokio::sync::watch` channel, which is how the map
//! binding adapter observes "selected place changed" without coupling to the
//! coordinator.
//!
//! # Invariants
//!
//! - `AppState` holds plain serializable data only; live vendor handles
//!   never enter it.
//! - History entries are unique by place identifier, newest first, and
//!   bounded to [`HISTORY_CAP`] entries.
//! - A selection commit is always published before its history entry, so
//!   observers never see a history entry referencing an unselected place.

use crate::domain::{Place, SearchHistoryEntry};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Maximum number of recent-search history entries kept in state.
pub const HISTORY_CAP: usize = 20;

/// Serializable view state for the search/selection workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// The query text of the most recently submitted search.
    pub query: String,

    /// Current autocomplete suggestion list.
    pub suggestions: Vec<Place>,

    /// The committed selected place, at most one at a time.
    pub selected: Option<Place>,

    /// Recent-search history, newest first, bounded to [`HISTORY_CAP`].
    pub history: Vec<SearchHistoryEntry>,

    /// Whether a search or selection workflow is in flight.
    pub loading: bool,

    /// Transient user-facing error message, cleared on the next operation.
    pub error: Option<String>,

    /// Non-fatal degradation notice, e.g. "no location data".
    pub notice: Option<String>,
}

impl AppState {
    /// Filters history entries against a typed filter string.
    ///
    /// Splits the filter into whitespace tokens and keeps entries whose place
    /// name or originating query fuzzy-matches every token. An empty filter
    /// returns the whole history in its stored order.
    #[must_use]
    pub fn filtered_history(&self, filter: &str) -> Vec<&SearchHistoryEntry> {
        let tokens: Vec<String> = filter
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        if tokens.is_empty() {
            return self.history.iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        self.history
            .iter()
            .filter(|entry| {
                let haystack =
                    format!("{} {}", entry.place.name, entry.query).to_lowercase();
                tokens
                    .iter()
                    .all(|token| matcher.fuzzy_match(&haystack, token).is_some())
            })
            .collect()
    }
}

/// Owner of the application state.
///
/// Cloning the store is cheap; all clones share one underlying state. Every
/// transition operation publishes the resulting snapshot to all subscribers.
#[derive(Debug, Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<AppState>>,
}

impl Default for StateStore {
    fn default() -> Self {
        let (tx, _) = watch::channel(AppState::default());
        Self { tx: Arc::new(tx) }
    }
}

impl StateStore {
    /// Creates a store with empty initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a receiver observing every published state snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }

    /// Returns a clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Marks a new search as in flight.
    ///
    /// Clears any previous transient error; the suggestion list is left in
    /// place until fresh results arrive, avoiding a visible flicker to empty.
    pub fn begin_search(&self, query: &str) {
        tracing::debug!(query_len = query.len(), "search started");
        self.tx.send_modify(|state| {
            state.query = query.to_string();
            state.loading = true;
            state.error = None;
        });
    }

    /// Commits the suggestion list of the current search.
    pub fn commit_suggestions(&self, suggestions: Vec<Place>) {
        tracing::debug!(count = suggestions.len(), "suggestions committed");
        self.tx.send_modify(|state| {
            state.suggestions = suggestions;
            state.loading = false;
            state.error = None;
        });
    }

    /// Records a failed search as a transient message.
    ///
    /// History and any committed selection are unaffected.
    pub fn fail_search(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(error = %message, "search failed");
        self.tx.send_modify(|state| {
            state.loading = false;
            state.error = Some(message.clone());
        });
    }

    /// Marks a selection workflow as in flight.
    pub fn begin_selection(&self) {
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
            state.notice = None;
        });
    }

    /// Records an aborted selection workflow.
    ///
    /// The previously selected place, if any, is left untouched; only the
    /// message and loading flag change.
    pub fn fail_selection(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(error = %message, "selection aborted");
        self.tx.send_modify(|state| {
            state.loading = false;
            state.error = Some(message.clone());
        });
    }

    /// Commits a place as selected.
    pub fn commit_selection(&self, place: Place) {
        tracing::debug!(place_id = %place.id, has_geometry = place.geometry.is_some(), "selection committed");
        self.tx.send_modify(|state| {
            state.selected = Some(place);
            state.loading = false;
            state.error = None;
        });
    }

    /// Sets a non-fatal degradation notice.
    pub fn set_notice(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(notice = %message, "notice recorded");
        self.tx.send_modify(|state| {
            state.notice = Some(message.clone());
        });
    }

    /// Appends a history entry for a resolved place.
    ///
    /// Entries are unique by place identifier: re-recording a known place
    /// moves its entry to the front and refreshes the timestamp and query.
    /// The history never exceeds [`HISTORY_CAP`] entries; the oldest entry
    /// is evicted on overflow.
    pub fn record_history(&self, place: &Place, query: &str) {
        self.tx.send_modify(|state| {
            state.history.retain(|entry| entry.place.id != place.id);
            state
                .history
                .insert(0, SearchHistoryEntry::new(place.clone(), query.to_string()));
            state.history.truncate(HISTORY_CAP);
        });
        tracing::debug!(place_id = %place.id, "history entry recorded");
    }

    /// Clears the search history.
    ///
    /// Only ever triggered by an explicit user action.
    pub fn clear_history(&self) {
        tracing::debug!("history cleared");
        self.tx.send_modify(|state| state.history.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Geometry, LatLng};

    fn place(id: &str, name: &str) -> Place {
        Place {
            id: id.to_string(),
            name: name.to_string(),
            formatted_address: String::new(),
            geometry: Some(Geometry {
                location: LatLng::new(3.0, 101.0),
                viewport: None,
            }),
            tags: vec![],
        }
    }

    #[test]
    fn duplicate_history_entry_moves_to_front() {
        let store = StateStore::new();
        store.record_history(&place("a", "Alpha"), "alpha");
        store.record_history(&place("b", "Beta"), "beta");
        store.record_history(&place("a", "Alpha"), "alpha again");

        let state = store.snapshot();
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[0].place.id, "a");
        assert_eq!(state.history[0].query, "alpha again");
        assert_eq!(state.history[1].place.id, "b");
    }

    #[test]
    fn history_is_bounded_and_evicts_oldest() {
        let store = StateStore::new();
        for i in 0..(HISTORY_CAP + 5) {
            store.record_history(&place(&format!("p{i}"), "Place"), "q");
        }

        let state = store.snapshot();
        assert_eq!(state.history.len(), HISTORY_CAP);
        // Newest first; the first five recorded entries are gone.
        assert_eq!(state.history[0].place.id, format!("p{}", HISTORY_CAP + 4));
        assert!(state.history.iter().all(|e| e.place.id != "p0"));
    }

    #[test]
    fn clear_history_empties_the_panel() {
        let store = StateStore::new();
        store.record_history(&place("a", "Alpha"), "alpha");
        store.clear_history();
        assert!(store.snapshot().history.is_empty());
    }

    #[test]
    fn filtered_history_requires_all_tokens() {
        let store = StateStore::new();
        store.record_history(&place("a", "Petronas Towers"), "kl towers");
        store.record_history(&place("b", "Merdeka Square"), "kl square");

        let state = store.snapshot();
        let hits = state.filtered_history("towers kl");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].place.id, "a");

        assert_eq!(state.filtered_history("").len(), 2);
        assert!(state.filtered_history("nowhere").is_empty());
    }

    #[test]
    fn search_failure_keeps_selection_and_history() {
        let store = StateStore::new();
        let selected = place("a", "Alpha");
        store.commit_selection(selected.clone());
        store.record_history(&selected, "alpha");

        store.begin_search("beta");
        store.fail_search("Search failed (REQUEST_DENIED)");

        let state = store.snapshot();
        assert_eq!(state.selected, Some(selected));
        assert_eq!(state.history.len(), 1);
        assert!(!state.loading);
        assert!(state.error.is_some());
    }
}
