//! Domain layer for Placemark.
//!
//! This module contains the core domain types for the search and selection
//! workflows, independent of the vendor API or infrastructure concerns. Every
//! type here is plain serde data and safe to store in application state.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`place`]: Place, geometry and search-history models
//!
//! # Examples
//!
//! ```
//! use placemark::domain::{LatLng, Place};
//!
//! let place = Place {
//!     id: "pid-1".to_string(),
//!     name: "Petronas Towers".to_string(),
//!     formatted_address: "Kuala Lumpur, Malaysia".to_string(),
//!     geometry: None,
//!     tags: vec!["landmark".to_string()],
//! };
//! assert!(place.needs_details());
//! assert_eq!(LatLng::new(3.0, 101.0).lat, 3.0);
//! ```

pub mod error;
pub mod place;

pub use error::{PlacemarkError, Result};
pub use place::{Geometry, LatLng, Marker, Place, SearchHistoryEntry, Viewport};
