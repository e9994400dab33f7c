//! UI-facing map binding layer.
//!
//! # Organization
//!
//! - [`surface`]: display-surface registry with explicit readiness signaling
//! - [`adapter`]: [`MapBinding`], the observer that pins selections on the map

pub mod adapter;
pub mod surface;

pub use adapter::{BindingOptions, BindingStatus, MapBinding, SELECTION_ZOOM};
pub use surface::{SurfaceRegistry, SurfaceSize};
