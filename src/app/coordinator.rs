//! Workflow coordination for search and selection.
//!
//! This module implements [`WorkflowCoordinator`], the control-flow layer
//! between user intent and the map service adapter. It owns the two
//! workflows of the application:
//!
//! - **Search**: each submission is debounced, and a new submission cancels
//!   any live search task before starting, so at most one search task is
//!   ever in flight and results are committed in submission order. A
//!   monotonic epoch guards the commit point: a late result from a
//!   superseded task can never mutate state, even if its network response
//!   arrives after the final task resolved.
//! - **Selection**: a single linear async function (no re-dispatch, no
//!   recursion) that normalizes the payload, resolves missing details,
//!   commits the selection, then records history, in that order. A mutex
//!   makes the workflow non-re-entrant; it may interleave with an unrelated
//!   search, never with itself.
//!
//! Adapter errors never escape this layer uncaught: they are classified into
//! a user-facing message and a cleared loading flag on the state store.

use crate::app::state::StateStore;
use crate::domain::error::PlacemarkError;
use crate::domain::Place;
use crate::maps::MapService;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Default debounce window applied to search submissions.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// The payload of a user selection.
///
/// The hosting UI may hand over a bare place (e.g. from the history panel)
/// or an envelope carrying the query text that produced the suggestion.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionPayload {
    /// A bare place with no originating query.
    Place(Place),

    /// A place together with the query text that led to it.
    WithQuery {
        /// The chosen place.
        place: Place,
        /// The originating query text.
        query: String,
    },
}

impl SelectionPayload {
    /// Normalizes the payload into a place and an optional originating query.
    fn into_parts(self) -> (Place, Option<String>) {
        match self {
            Self::Place(place) => (place, None),
            Self::WithQuery { place, query } => (place, Some(query)),
        }
    }
}

/// Terminal outcome of one selection workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Selection and history committed with resolved geometry.
    Committed,

    /// Selection and history committed, but the place has no location data;
    /// no map update will follow.
    CommittedWithoutLocation,

    /// The workflow aborted on a recoverable error; state carries the
    /// message and neither selection nor history changed.
    Aborted,
}

/// Sequencer for debounced search and the selection workflow.
///
/// Constructed once per application with its collaborators injected; cheap
/// to share behind an `Arc`.
pub struct WorkflowCoordinator {
    service: Arc<MapService>,
    store: StateStore,
    debounce: Duration,

    /// Monotonic search submission counter; the commit guard.
    epoch: Arc<AtomicU64>,

    /// The live search task, if any. Replaced (and the old task aborted) on
    /// every submission.
    live_search: StdMutex<Option<JoinHandle<()>>>,

    /// Serializes selection workflow runs.
    selection_gate: Mutex<()>,
}

impl WorkflowCoordinator {
    /// Creates a coordinator over the given service and store.
    #[must_use]
    pub fn new(service: Arc<MapService>, store: StateStore, debounce: Duration) -> Self {
        Self {
            service,
            store,
            debounce,
            epoch: Arc::new(AtomicU64::new(0)),
            live_search: StdMutex::new(None),
            selection_gate: Mutex::new(()),
        }
    }

    fn live_search(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.live_search
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Submits a search query.
    ///
    /// Cancels any previous search still debouncing or in flight, then
    /// spawns a task that waits out the debounce window, queries the
    /// service, and commits the result, but only if no newer submission has
    /// happened in the meantime. Returns immediately.
    pub fn submit_search(&self, query: impl Into<String>) {
        let query = query.into();
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = self.live_search().take() {
            tracing::debug!("cancelling superseded search task");
            previous.abort();
        }

        self.store.begin_search(&query);

        let service = Arc::clone(&self.service);
        let store = self.store.clone();
        let epochs = Arc::clone(&self.epoch);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if epochs.load(Ordering::SeqCst) != epoch {
                return;
            }

            let result = service.search_places(&query).await;

            // A newer submission may have started while the lookup was in
            // flight; its results own the state now.
            if epochs.load(Ordering::SeqCst) != epoch {
                tracing::debug!(epoch, "discarding late result of superseded search");
                return;
            }

            match result {
                Ok(places) => store.commit_suggestions(places),
                Err(err) => {
                    tracing::debug!(error = %err, "search task failed");
                    store.fail_search(user_message(&err));
                }
            }
        });

        *self.live_search() = Some(handle);
    }

    /// Cancels any pending or in-flight search without submitting a new one.
    pub fn cancel_search(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.live_search().take() {
            tracing::debug!("search cancelled");
            previous.abort();
        }
    }

    /// Runs the selection workflow for one user selection.
    ///
    /// The workflow is linear and not re-entrant: normalize the payload,
    /// resolve full details when geometry is missing, then commit the
    /// serialized place as selected and append a history entry using the
    /// originating query (or the place's own name when none was supplied).
    /// The state commit strictly precedes the history append.
    ///
    /// Errors never propagate out; a recoverable failure records a
    /// user-facing message and returns [`SelectionOutcome::Aborted`] with
    /// the previous selection untouched.
    pub async fn select_place(&self, payload: SelectionPayload) -> SelectionOutcome {
        let _gate = self.selection_gate.lock().await;

        let (place, query) = payload.into_parts();
        let query_label = query.unwrap_or_else(|| place.name.clone());
        tracing::debug!(place_id = %place.id, "selection workflow started");

        self.store.begin_selection();

        let resolved = if place.needs_details() {
            match self.service.place_details(&place.id).await {
                Ok(full) => full,
                Err(err) => {
                    tracing::warn!(place_id = %place.id, error = %err, "detail resolution failed");
                    self.store.fail_selection(user_message(&err));
                    return SelectionOutcome::Aborted;
                }
            }
        } else {
            place
        };

        let has_location = resolved.geometry.is_some();
        if !has_location {
            // Non-fatal: the place resolved but carries no position. The
            // selection is still committed for display purposes and the map
            // binding leaves the previous pin in place.
            tracing::warn!(place_id = %resolved.id, "resolved place has no location data");
            self.store.set_notice("No location data for this place.");
        }

        self.store.commit_selection(resolved.clone());
        self.store.record_history(&resolved, &query_label);

        if has_location {
            SelectionOutcome::Committed
        } else {
            SelectionOutcome::CommittedWithoutLocation
        }
    }
}

impl Drop for WorkflowCoordinator {
    fn drop(&mut self) {
        if let Some(task) = self.live_search().take() {
            task.abort();
        }
    }
}

/// Converts an adapter error into the message shown to the user.
fn user_message(err: &PlacemarkError) -> String {
    match err {
        PlacemarkError::Search { status } => {
            format!("Search failed ({status}). Please try again.")
        }
        PlacemarkError::Transport(_) => {
            "Network problem while contacting the places service.".to_string()
        }
        PlacemarkError::Initialization(message) => {
            format!("Map services failed to initialize: {message}")
        }
        PlacemarkError::Details(_) => "Could not load details for that place.".to_string(),
        PlacemarkError::Serialization(_) => "No location data for this place.".to_string(),
        other => other.to_string(),
    }
}
