//! Map service adapter layer.
//!
//! This module wraps the vendor mapping/places API behind a small, injectable
//! surface. It owns all direct vendor calls and the serialization boundary
//! that turns vendor-shaped payloads into plain domain data.
//!
//! # Organization
//!
//! - [`gateway`]: the [`PlacesGateway`] trait and lookup restriction types
//! - [`http`]: reqwest-backed gateway implementation
//! - [`wire`]: raw vendor response shapes and coordinate normalization
//! - [`service`]: [`MapService`], the adapter the rest of the crate uses

pub mod gateway;
pub mod http;
pub mod service;
pub mod wire;

pub use gateway::{PlacesGateway, SdkSession, SearchRestrictions, DETAIL_FIELDS};
pub use http::HttpGateway;
pub use service::{MapHandle, MapService, MarkerHandle, SdkHandle, MIN_QUERY_CHARS};
pub use wire::{DetailsResponse, LookupStatus, PredictionsResponse};
