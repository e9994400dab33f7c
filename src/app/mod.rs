//! Application layer: state store and workflow coordination.
//!
//! # Organization
//!
//! - [`state`]: [`AppState`] and the [`StateStore`] transition operations
//! - [`coordinator`]: [`WorkflowCoordinator`] sequencing debounced search,
//!   cancellation, and the selection workflow

pub mod coordinator;
pub mod state;

pub use coordinator::{
    SelectionOutcome, SelectionPayload, WorkflowCoordinator, DEFAULT_DEBOUNCE,
};
pub use state::{AppState, StateStore, HISTORY_CAP};
