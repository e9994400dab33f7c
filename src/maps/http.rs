//! HTTP-backed vendor gateway.
//!
//! This module implements [`PlacesGateway`] against the vendor's places web
//! API using `reqwest`. One method maps to one HTTP request; no retries are
//! performed here. The SDK-load call validates the access credential and
//! binds it to this gateway instance for the follow-up lookups.

use crate::domain::error::{PlacemarkError, Result};
use crate::maps::gateway::{PlacesGateway, SdkSession, SearchRestrictions};
use crate::maps::wire::{DetailsResponse, PredictionsResponse};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::Instrument;

/// Vendor web API client.
///
/// The gateway is constructed with the vendor endpoint base URL; the access
/// credential arrives through [`PlacesGateway::load_sdk`] and is kept for
/// the session, mirroring how the vendor's script SDK binds its key at load
/// time.
pub struct HttpGateway {
    /// Shared HTTP client with connection pooling.
    client: reqwest::Client,

    /// Vendor endpoint base URL, without a trailing slash.
    base_url: String,

    /// Credential bound by the last successful SDK load.
    session_key: RwLock<Option<String>>,
}

impl HttpGateway {
    /// Creates a gateway against the given vendor endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_key: RwLock::new(None),
        }
    }

    /// Returns the bound credential or fails when no SDK load has happened.
    async fn require_key(&self) -> Result<String> {
        self.session_key.read().await.clone().ok_or_else(|| {
            PlacemarkError::Initialization("vendor SDK has not been loaded".to_string())
        })
    }
}

#[async_trait]
impl PlacesGateway for HttpGateway {
    async fn load_sdk(&self, credential: &str) -> Result<SdkSession> {
        async move {
            let url = format!("{}/session", self.base_url);
            let response = self
                .client
                .get(&url)
                .query(&[("key", credential)])
                .send()
                .await
                .map_err(|e| PlacemarkError::Initialization(format!("sdk load failed: {e}")))?;

            if !response.status().is_success() {
                return Err(PlacemarkError::Initialization(format!(
                    "sdk load rejected with http status {}",
                    response.status()
                )));
            }

            let session: SdkSession = response
                .json()
                .await
                .map_err(|e| PlacemarkError::Initialization(format!("sdk load response: {e}")))?;

            *self.session_key.write().await = Some(credential.to_string());

            tracing::debug!(session_id = %session.session_id, "vendor sdk loaded");
            Ok(session)
        }
        .instrument(tracing::debug_span!("http_load_sdk"))
        .await
    }

    async fn autocomplete(
        &self,
        query: &str,
        restrictions: &SearchRestrictions,
    ) -> Result<PredictionsResponse> {
        let span = tracing::debug_span!("http_autocomplete", query_len = query.len());
        async move {
            let key = self.require_key().await?;

            let mut params = vec![("input", query.to_string()), ("key", key)];
            if let Some(country) = &restrictions.country {
                params.push(("components", format!("country:{country}")));
            }
            if !restrictions.place_types.is_empty() {
                params.push(("types", restrictions.place_types.join("|")));
            }

            let url = format!("{}/autocomplete", self.base_url);
            let response = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(|e| PlacemarkError::Transport(e.to_string()))?;

            if !response.status().is_success() {
                return Err(PlacemarkError::Transport(format!(
                    "autocomplete returned http status {}",
                    response.status()
                )));
            }

            let parsed: PredictionsResponse = response
                .json()
                .await
                .map_err(|e| PlacemarkError::Transport(format!("autocomplete response: {e}")))?;

            tracing::debug!(
                status = parsed.status.as_str(),
                candidates = parsed.predictions.len(),
                "predictions lookup complete"
            );
            Ok(parsed)
        }
        .instrument(span)
        .await
    }

    async fn place_details(&self, place_id: &str, fields: &[&str]) -> Result<DetailsResponse> {
        let span = tracing::debug_span!("http_place_details", place_id = %place_id);
        async move {
            let key = self.require_key().await?;

            let url = format!("{}/details", self.base_url);
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("place_id", place_id.to_string()),
                    ("fields", fields.join(",")),
                    ("key", key),
                ])
                .send()
                .await
                .map_err(|e| PlacemarkError::Transport(e.to_string()))?;

            if !response.status().is_success() {
                return Err(PlacemarkError::Transport(format!(
                    "details returned http status {}",
                    response.status()
                )));
            }

            let parsed: DetailsResponse = response
                .json()
                .await
                .map_err(|e| PlacemarkError::Transport(format!("details response: {e}")))?;

            tracing::debug!(status = parsed.status.as_str(), "details lookup complete");
            Ok(parsed)
        }
        .instrument(span)
        .await
    }
}
