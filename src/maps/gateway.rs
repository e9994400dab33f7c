//! Vendor gateway abstraction.
//!
//! This module defines the [`PlacesGateway`] trait that abstracts over the
//! vendor mapping/places API. The rest of the crate talks to an injected
//! `Arc<dyn PlacesGateway>`, which keeps the vendor swappable and lets tests
//! substitute a scripted gateway without global mutable state.
//!
//! # Design Philosophy
//!
//! The trait is minimal and mirrors the vendor surface this application
//! actually consumes: SDK load, predictions lookup, detail lookup. Map and
//! marker construction live on [`MapService`](crate::maps::MapService)
//! because they are bound to a local display surface, not to a remote call.

use crate::domain::error::Result;
use crate::maps::wire::{DetailsResponse, PredictionsResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Fields requested from every place-details lookup.
///
/// Kept to the minimum the selection workflow needs; requesting fewer fields
/// keeps vendor billing tiers low.
pub const DETAIL_FIELDS: &[&str] = &["place_id", "name", "formatted_address", "geometry", "types"];

/// Country and category restrictions applied to predictions lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRestrictions {
    /// Two-letter country code to restrict candidates to, if any.
    pub country: Option<String>,

    /// Vendor place-type filters, e.g. `"establishment"`. Empty means no filter.
    pub place_types: Vec<String>,
}

/// Session data returned by a successful vendor SDK load.
///
/// This is plain data describing the loaded session; the cheaply cloneable
/// handle the rest of the crate passes around is
/// [`SdkHandle`](crate::maps::SdkHandle).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SdkSession {
    /// Vendor-assigned identifier of the loaded session.
    pub session_id: String,
}

/// Abstraction over the vendor mapping/places API.
///
/// Implementations perform one vendor call per method and never retry;
/// retry and cancellation policy belongs to the workflow coordinator.
///
/// # Implementations
///
/// - [`HttpGateway`](crate::maps::HttpGateway): reqwest-backed web API client
/// - test suites provide scripted gateways
#[async_trait]
pub trait PlacesGateway: Send + Sync {
    /// Loads the vendor SDK, gated by the supplied access credential.
    ///
    /// Called at most once per successful initialization; the service layer
    /// caches the outcome and guarantees concurrent callers share one load.
    ///
    /// # Errors
    ///
    /// Returns an error when the credential is rejected or the load fails in
    /// transport.
    async fn load_sdk(&self, credential: &str) -> Result<SdkSession>;

    /// Runs a predictions lookup for a free-text query.
    ///
    /// Returns the raw vendor envelope including its status code; status
    /// classification happens in the service layer.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure, never for vendor status
    /// codes.
    async fn autocomplete(
        &self,
        query: &str,
        restrictions: &SearchRestrictions,
    ) -> Result<PredictionsResponse>;

    /// Fetches the detailed record for a place identifier.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure, never for vendor status
    /// codes.
    async fn place_details(&self, place_id: &str, fields: &[&str]) -> Result<DetailsResponse>;
}
