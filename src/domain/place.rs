//! Place domain model and related plain-data types.
//!
//! This module defines the core [`Place`] type representing a searchable real-world
//! location, along with its geometry records and the [`SearchHistoryEntry`] type
//! used by the recent-search panel. Every type here is plain serde data: live
//! vendor SDK handles never appear in these structures, so all of them can be
//! stored in application state and serialized freely.

use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// A plain coordinate pair in degrees.
///
/// Both fields are always plain numbers. Vendor payloads that deliver
/// coordinates in other shapes are normalized into this type at the adapter
/// boundary before they reach any other component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A bounding viewport described by its corner coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// North-east corner of the viewport.
    pub northeast: LatLng,
    /// South-west corner of the viewport.
    pub southwest: LatLng,
}

/// Coordinate data describing a place's position.
///
/// The location is mandatory once geometry exists at all; the viewport is a
/// vendor-supplied suggestion for framing the place and may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Point position of the place.
    pub location: LatLng,
    /// Optional bounding viewport around the place.
    pub viewport: Option<Viewport>,
}

/// A search result or fully resolved place.
///
/// Places are created transiently from a predictions response (partial, usually
/// without geometry) or from a detail-fetch response (complete). They are
/// discarded and replaced rather than mutated: a superseded selection is simply
/// dropped.
///
/// # Invariant
///
/// Once stored in application state a `Place` contains only plain
/// numeric/string/array data. The serialization boundary in the map service
/// adapter guarantees this; nothing downstream needs to re-check it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Opaque vendor identifier for the place.
    pub id: String,

    /// Display name of the place.
    pub name: String,

    /// Formatted postal-style address, empty when the vendor omitted it.
    pub formatted_address: String,

    /// Position and optional viewport, absent on partial results.
    pub geometry: Option<Geometry>,

    /// Vendor category tags such as `"establishment"` or `"locality"`.
    pub tags: Vec<String>,
}

impl Place {
    /// Returns the point location when geometry has been resolved.
    #[must_use]
    pub fn location(&self) -> Option<LatLng> {
        self.geometry.map(|g| g.location)
    }

    /// Returns `true` when this place still needs a detail fetch to be pinned.
    #[must_use]
    pub fn needs_details(&self) -> bool {
        self.geometry.is_none() && !self.id.is_empty()
    }
}

/// A point marker shown on the map for a selected place.
///
/// This is the plain-data description of a marker; the live counterpart created
/// on a map instance is owned by the map binding adapter and never persisted
/// beyond the current map session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Identifier of the place the marker pins.
    pub id: String,
    /// Marker position.
    pub position: LatLng,
    /// Marker title, shown on hover by most map renderers.
    pub title: String,
}

/// One entry in the recent-search history panel.
///
/// Entries are unique by the underlying place identifier: selecting the same
/// place again moves its entry to the front and refreshes the timestamp rather
/// than creating a duplicate. The history is bounded; the oldest entry is
/// evicted on overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    /// The resolved place, fully serialized.
    pub place: Place,

    /// The query text that led to this place, or the place's own name when
    /// no originating query was supplied.
    pub query: String,

    /// Unix timestamp of when the entry was recorded or last refreshed.
    pub recorded_at: i64,
}

impl SearchHistoryEntry {
    /// Creates a history entry recorded at the current time.
    #[must_use]
    pub fn new(place: Place, query: String) -> Self {
        Self {
            place,
            query,
            recorded_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Returns a human-readable string describing how long ago the entry was recorded.
    ///
    /// The format varies based on the time elapsed:
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago" (e.g., "5m ago")
    /// - Less than 1 day: "Xh ago" (e.g., "3h ago")
    /// - 1 day or more: "Xd ago" (e.g., "7d ago")
    #[must_use]
    pub fn time_ago(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let diff = now - self.recorded_at;

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: &str, geometry: Option<Geometry>) -> Place {
        Place {
            id: id.to_string(),
            name: "somewhere".to_string(),
            formatted_address: String::new(),
            geometry,
            tags: vec![],
        }
    }

    #[test]
    fn needs_details_only_without_geometry_and_with_id() {
        let geometry = Geometry {
            location: LatLng::new(3.0, 101.0),
            viewport: None,
        };

        assert!(place("abc", None).needs_details());
        assert!(!place("abc", Some(geometry)).needs_details());
        assert!(!place("", None).needs_details());
    }

    #[test]
    fn time_ago_formats_ranges() {
        let now = chrono::Utc::now().timestamp();
        let mut entry = SearchHistoryEntry::new(place("abc", None), "query".to_string());

        assert_eq!(entry.time_ago(), "just now");

        entry.recorded_at = now - 300;
        assert_eq!(entry.time_ago(), "5m ago");

        entry.recorded_at = now - 3 * 3600;
        assert_eq!(entry.time_ago(), "3h ago");

        entry.recorded_at = now - 7 * 86400;
        assert_eq!(entry.time_ago(), "7d ago");
    }
}
