//! Placemark: place search, selection and map-pin workflow.
//!
//! Placemark lets an application search for places through a vendor
//! autocomplete API, resolve a selected candidate to full details, and pin
//! the result on a live map instance, with a bounded, deduplicated
//! recent-search history. It is an orchestration layer: the vendor
//! mapping/places API is abstracted behind an injected gateway, and all
//! vendor-shaped data is normalized into plain serializable records at one
//! boundary.
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host shell (main.rs)                               │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Workflows
//! │  - State store with transition operations           │
//! │  - Debounced search with cancellation               │
//! │  - Linear selection workflow                        │
//! └─────────────────────────────────────────────────────┘
//!         │                                   │
//! ┌──────────────────────┐   ┌──────────────────────────┐
//! │ Maps Layer (maps/)   │   │ Binding Layer (binding/) │
//! │ - Gateway trait      │   │ - Surface registry       │
//! │ - HTTP gateway       │   │ - Readiness waiting      │
//! │ - Wire normalization │   │ - Marker reconciliation  │
//! │ - Map service        │   │                          │
//! └──────────────────────┘   └──────────────────────────┘
//!         │                                   │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Configuration (infrastructure/)                  │
//! │  - Error types (domain/error)                       │
//! │  - Place model (domain/place)                       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber setup                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Workflow
//!
//! 1. **Search**: each submission through
//!    [`WorkflowCoordinator::submit_search`] cancels any live search task,
//!    waits out a debounce window, queries the vendor, and commits the
//!    suggestion list, guarded so only the latest submission's results ever
//!    reach state.
//! 2. **Selection**: [`WorkflowCoordinator::select_place`] resolves missing
//!    geometry through a detail fetch, commits the serialized place as
//!    selected, then records a history entry.
//! 3. **Binding**: [`MapBinding`] observes the store and pins the selected
//!    place on the map once the display surface is ready.
//!
//! # Example
//!
//! ```no_run
//! use placemark::{
//!     Config, HttpGateway, MapService, StateStore, SurfaceRegistry, WorkflowCoordinator,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> placemark::Result<()> {
//! let config = Config::load(None)?;
//! let registry = Arc::new(SurfaceRegistry::new());
//! let gateway = Arc::new(HttpGateway::new(&config.endpoint));
//! let service = Arc::new(MapService::new(
//!     gateway,
//!     Arc::clone(&registry),
//!     &config.api_key,
//!     config.restrictions(),
//! ));
//! let store = StateStore::new();
//! let coordinator = WorkflowCoordinator::new(service, store.clone(), config.debounce());
//!
//! coordinator.submit_search("Petronas Towers");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod binding;
pub mod domain;
pub mod infrastructure;
pub mod maps;
pub mod observability;

pub use app::{
    AppState, SelectionOutcome, SelectionPayload, StateStore, WorkflowCoordinator,
    DEFAULT_DEBOUNCE, HISTORY_CAP,
};
pub use binding::{BindingOptions, BindingStatus, MapBinding, SurfaceRegistry, SELECTION_ZOOM};
pub use domain::{
    Geometry, LatLng, Marker, Place, PlacemarkError, Result, SearchHistoryEntry, Viewport,
};
pub use infrastructure::Config;
pub use maps::{HttpGateway, MapService, PlacesGateway, SearchRestrictions};
