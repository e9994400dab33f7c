//! Vendor wire types and the geometry serialization boundary.
//!
//! This module defines the raw response shapes returned by the vendor
//! places API. These types are separate from domain models to maintain a
//! clear boundary between the vendor representation and application state:
//! everything leaving this module is plain `f64`/`String` data.
//!
//! # The coordinate union
//!
//! Depending on vendor API version and call path, coordinates arrive either
//! as `{"lat": .., "lng": ..}` or as `{"latitude": .., "longitude": ..}`,
//! and the numbers themselves are occasionally string-encoded. [`RawLatLng`]
//! models that union explicitly, and [`normalize_lat_lng`] is the single
//! function that collapses it into a plain [`LatLng`]. No component beyond
//! this module may depend on the vendor shapes.

use crate::domain::error::{PlacemarkError, Result};
use crate::domain::{Geometry, LatLng, Place, Viewport};
use serde::{Deserialize, Serialize};

/// Status codes returned by vendor lookup endpoints.
///
/// `ZeroResults` is a successful outcome (empty candidate list); every other
/// non-`Ok` status is surfaced as [`PlacemarkError::Search`] carrying the
/// code verbatim. Codes this crate does not recognize collapse into
/// [`UnknownError`](Self::UnknownError) rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    /// The lookup succeeded and returned at least one candidate.
    Ok,

    /// The lookup succeeded but matched nothing.
    ZeroResults,

    /// The request was malformed (missing input, bad restriction syntax).
    InvalidRequest,

    /// The credential has exhausted its quota.
    OverQueryLimit,

    /// The credential was rejected.
    RequestDenied,

    /// Any status code this crate does not recognize.
    UnknownError,
}

impl LookupStatus {
    /// Parses a vendor status code, mapping unrecognized codes to
    /// [`UnknownError`](Self::UnknownError).
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "OK" => Self::Ok,
            "ZERO_RESULTS" => Self::ZeroResults,
            "INVALID_REQUEST" => Self::InvalidRequest,
            "OVER_QUERY_LIMIT" => Self::OverQueryLimit,
            "REQUEST_DENIED" => Self::RequestDenied,
            _ => Self::UnknownError,
        }
    }

    /// Returns the vendor status code as its wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::OverQueryLimit => "OVER_QUERY_LIMIT",
            Self::RequestDenied => "REQUEST_DENIED",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl Serialize for LookupStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LookupStatus {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

/// A single coordinate value as the vendor delivers it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawCoord {
    /// Plain numeric field.
    Number(f64),
    /// String-encoded number, seen on some legacy call paths.
    Text(String),
}

/// A coordinate pair in either vendor dialect.
///
/// The variants cover the two field-name dialects the vendor uses across
/// SDK versions. Construct domain coordinates from this type only through
/// [`normalize_lat_lng`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawLatLng {
    /// Classic short field names.
    Short {
        /// Latitude value.
        lat: RawCoord,
        /// Longitude value.
        lng: RawCoord,
    },

    /// Spelled-out field names used by newer detail responses.
    Long {
        /// Latitude value.
        latitude: RawCoord,
        /// Longitude value.
        longitude: RawCoord,
    },
}

/// Corner pair describing a bounding viewport on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawBounds {
    /// North-east corner.
    pub northeast: RawLatLng,
    /// South-west corner.
    pub southwest: RawLatLng,
}

/// Geometry record as delivered by the vendor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawGeometry {
    /// Point position of the place.
    pub location: RawLatLng,

    /// Optional bounding viewport around the place.
    #[serde(default)]
    pub viewport: Option<RawBounds>,
}

/// Secondary text split of a prediction's description.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawStructuredFormatting {
    /// Primary display line, usually the place name.
    pub main_text: String,

    /// Secondary display line, usually the locality or address.
    #[serde(default)]
    pub secondary_text: String,
}

/// One autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawPrediction {
    /// Opaque place identifier.
    pub place_id: String,

    /// Full human-readable description of the candidate.
    #[serde(default)]
    pub description: String,

    /// Optional split of the description into main/secondary text.
    #[serde(default)]
    pub structured_formatting: Option<RawStructuredFormatting>,

    /// Vendor category tags.
    #[serde(default)]
    pub types: Vec<String>,
}

/// Response envelope of the predictions lookup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionsResponse {
    /// Vendor status code for the lookup.
    pub status: LookupStatus,

    /// Candidate list, empty on `ZERO_RESULTS`.
    #[serde(default)]
    pub predictions: Vec<RawPrediction>,

    /// Optional vendor-supplied diagnostic message.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Fully detailed place record as delivered by the detail lookup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawPlaceDetail {
    /// Opaque place identifier.
    pub place_id: String,

    /// Display name of the place.
    #[serde(default)]
    pub name: String,

    /// Formatted postal-style address.
    #[serde(default)]
    pub formatted_address: String,

    /// Geometry, absent when the vendor has no location data.
    #[serde(default)]
    pub geometry: Option<RawGeometry>,

    /// Vendor category tags.
    #[serde(default)]
    pub types: Vec<String>,
}

/// Response envelope of the place-details lookup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DetailsResponse {
    /// Vendor status code for the lookup.
    pub status: LookupStatus,

    /// The detailed place, present on `OK`.
    #[serde(default)]
    pub result: Option<RawPlaceDetail>,

    /// Optional vendor-supplied diagnostic message.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Normalizes a single coordinate value into a plain number.
fn normalize_coord(raw: &RawCoord, field: &str) -> Result<f64> {
    match raw {
        RawCoord::Number(value) => Ok(*value),
        RawCoord::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            PlacemarkError::Serialization(format!("{field} is not numeric: {text:?}"))
        }),
    }
}

/// Normalizes a vendor coordinate pair into a plain [`LatLng`].
///
/// This is the single point where the vendor dialects are eliminated; both
/// field-name variants and string-encoded numbers collapse into plain `f64`
/// fields here.
///
/// # Errors
///
/// Returns [`PlacemarkError::Serialization`] when a string-encoded
/// coordinate cannot be parsed as a number.
pub fn normalize_lat_lng(raw: &RawLatLng) -> Result<LatLng> {
    match raw {
        RawLatLng::Short { lat, lng } => Ok(LatLng {
            lat: normalize_coord(lat, "lat")?,
            lng: normalize_coord(lng, "lng")?,
        }),
        RawLatLng::Long {
            latitude,
            longitude,
        } => Ok(LatLng {
            lat: normalize_coord(latitude, "latitude")?,
            lng: normalize_coord(longitude, "longitude")?,
        }),
    }
}

/// Normalizes a vendor geometry record, viewport included, into domain geometry.
///
/// # Errors
///
/// Returns [`PlacemarkError::Serialization`] when any contained coordinate
/// fails to normalize.
pub fn normalize_geometry(raw: &RawGeometry) -> Result<Geometry> {
    let location = normalize_lat_lng(&raw.location)?;
    let viewport = raw
        .viewport
        .as_ref()
        .map(|bounds| {
            Ok::<_, PlacemarkError>(Viewport {
                northeast: normalize_lat_lng(&bounds.northeast)?,
                southwest: normalize_lat_lng(&bounds.southwest)?,
            })
        })
        .transpose()?;

    Ok(Geometry { location, viewport })
}

/// Converts an autocomplete candidate into a partial domain [`Place`].
///
/// Predictions carry no geometry; the place stays partial until a detail
/// fetch resolves it.
#[must_use]
pub fn prediction_to_place(raw: RawPrediction) -> Place {
    let (name, formatted_address) = match raw.structured_formatting {
        Some(formatting) => (formatting.main_text, formatting.secondary_text),
        None => (raw.description.clone(), String::new()),
    };

    Place {
        id: raw.place_id,
        name,
        formatted_address,
        geometry: None,
        tags: raw.types,
    }
}

/// Converts a detailed place record into a complete domain [`Place`].
///
/// Geometry is normalized here; a record without geometry converts to a
/// place without geometry (the workflow coordinator decides how to degrade).
///
/// # Errors
///
/// Returns [`PlacemarkError::Serialization`] when present geometry cannot be
/// normalized.
pub fn detail_to_place(raw: RawPlaceDetail) -> Result<Place> {
    let geometry = raw.geometry.as_ref().map(normalize_geometry).transpose()?;

    Ok(Place {
        id: raw.place_id,
        name: raw.name,
        formatted_address: raw.formatted_address,
        geometry,
        tags: raw.types,
    })
}
