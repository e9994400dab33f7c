//! Error types for the Placemark crate.
//!
//! This module defines the centralized error type [`PlacemarkError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for Placemark operations.
///
/// This enum consolidates all error conditions that can occur during the search,
/// selection and map-binding workflows, from vendor SDK loading to geometry
/// normalization. Variants carry enough context to classify an error as fatal,
/// retryable or recoverable without inspecting the source.
///
/// # Classification
///
/// - [`Initialization`](Self::Initialization): fatal until an explicit reset
/// - [`SurfaceNotFound`](Self::SurfaceNotFound): retryable once the surface exists
/// - [`Search`](Self::Search): recoverable, shown as a transient message
/// - [`Details`](Self::Details): recoverable, aborts one selection workflow
/// - [`Serialization`](Self::Serialization): non-fatal, degrades to "no location data"
#[derive(Debug, Error)]
pub enum PlacemarkError {
    /// Vendor SDK failed to load.
    ///
    /// Occurs when the SDK load call fails (invalid credential, network failure)
    /// or when surface readiness never arrives within its budget. Cached as a
    /// permanent failure until an explicit reset is requested.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// No display surface with the requested identifier exists.
    ///
    /// Occurs when map construction is attempted before the hosting UI has
    /// registered a surface with non-zero rendered dimensions.
    #[error("display surface error: {0}")]
    SurfaceNotFound(String),

    /// Vendor lookup returned a non-success, non-empty status.
    ///
    /// The string carries the vendor status code verbatim so it can be shown
    /// in a transient message. A "no results" status is not an error and is
    /// mapped to an empty candidate list instead.
    #[error("search error: vendor status {status}")]
    Search {
        /// Vendor status code returned by the predictions lookup.
        status: String,
    },

    /// Place-details fetch failed.
    ///
    /// Occurs when the place identifier is absent or the vendor detail call
    /// fails. Aborts the selection workflow for that one selection.
    #[error("details error: {0}")]
    Details(String),

    /// Geometry was missing or malformed at the serialization boundary.
    ///
    /// The string describes which part of the vendor payload could not be
    /// normalized into plain coordinate data.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Transport-level failure talking to the vendor web API.
    ///
    /// Wraps reqwest failures (connection refused, timeout, bad TLS) that
    /// never produced a vendor status code.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values (notably the access
    /// credential) are missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for Placemark operations.
///
/// This is a type alias for `std::result::Result<T, PlacemarkError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, PlacemarkError>;
