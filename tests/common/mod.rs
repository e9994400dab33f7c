//! Shared scripted gateway for the integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use placemark::maps::wire::{
    DetailsResponse, LookupStatus, PredictionsResponse, RawCoord, RawGeometry, RawLatLng,
    RawPlaceDetail, RawPrediction, RawStructuredFormatting,
};
use placemark::maps::{PlacesGateway, SdkSession, SearchRestrictions};
use placemark::{PlacemarkError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// One scripted predictions lookup: an optional artificial latency plus the
/// response to deliver.
#[derive(Clone)]
pub struct ScriptedLookup {
    pub delay: Option<Duration>,
    pub response: PredictionsResponse,
}

/// Gateway whose responses are scripted per query / place id.
///
/// Unscripted queries answer `ZERO_RESULTS`; unscripted place ids answer
/// `UNKNOWN_ERROR`. Call counters let tests assert which vendor calls were
/// (not) made.
#[derive(Default)]
pub struct MockGateway {
    pub load_calls: AtomicUsize,
    pub autocomplete_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
    fail_load: AtomicBool,
    predictions: Mutex<HashMap<String, ScriptedLookup>>,
    details: Mutex<HashMap<String, DetailsResponse>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn script_predictions(
        &self,
        query: &str,
        delay: Option<Duration>,
        response: PredictionsResponse,
    ) {
        self.predictions
            .lock()
            .expect("lock")
            .insert(query.to_string(), ScriptedLookup { delay, response });
    }

    pub fn script_details(&self, place_id: &str, response: DetailsResponse) {
        self.details
            .lock()
            .expect("lock")
            .insert(place_id.to_string(), response);
    }
}

#[async_trait]
impl PlacesGateway for MockGateway {
    async fn load_sdk(&self, _credential: &str) -> Result<SdkSession> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(PlacemarkError::Initialization(
                "credential rejected".to_string(),
            ));
        }
        Ok(SdkSession {
            session_id: "session-1".to_string(),
        })
    }

    async fn autocomplete(
        &self,
        query: &str,
        _restrictions: &SearchRestrictions,
    ) -> Result<PredictionsResponse> {
        self.autocomplete_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.predictions.lock().expect("lock").get(query).cloned();
        match scripted {
            Some(lookup) => {
                if let Some(delay) = lookup.delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(lookup.response)
            }
            None => Ok(zero_results()),
        }
    }

    async fn place_details(&self, place_id: &str, _fields: &[&str]) -> Result<DetailsResponse> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .details
            .lock()
            .expect("lock")
            .get(place_id)
            .cloned()
            .unwrap_or(DetailsResponse {
                status: LookupStatus::UnknownError,
                result: None,
                error_message: None,
            }))
    }
}

/// Builds a prediction candidate for scripting.
pub fn prediction(place_id: &str, main_text: &str, secondary_text: &str) -> RawPrediction {
    RawPrediction {
        place_id: place_id.to_string(),
        description: format!("{main_text}, {secondary_text}"),
        structured_formatting: Some(RawStructuredFormatting {
            main_text: main_text.to_string(),
            secondary_text: secondary_text.to_string(),
        }),
        types: vec!["establishment".to_string()],
    }
}

/// A successful predictions envelope.
pub fn ok_predictions(candidates: Vec<RawPrediction>) -> PredictionsResponse {
    PredictionsResponse {
        status: LookupStatus::Ok,
        predictions: candidates,
        error_message: None,
    }
}

/// An empty-but-successful predictions envelope.
pub fn zero_results() -> PredictionsResponse {
    PredictionsResponse {
        status: LookupStatus::ZeroResults,
        predictions: vec![],
        error_message: None,
    }
}

/// A predictions envelope carrying a failure status.
pub fn failed_predictions(status: LookupStatus) -> PredictionsResponse {
    PredictionsResponse {
        status,
        predictions: vec![],
        error_message: None,
    }
}

/// A successful details envelope with geometry in the short dialect.
pub fn ok_details(place_id: &str, name: &str, lat: f64, lng: f64) -> DetailsResponse {
    DetailsResponse {
        status: LookupStatus::Ok,
        result: Some(RawPlaceDetail {
            place_id: place_id.to_string(),
            name: name.to_string(),
            formatted_address: format!("{name}, somewhere"),
            geometry: Some(RawGeometry {
                location: RawLatLng::Short {
                    lat: RawCoord::Number(lat),
                    lng: RawCoord::Number(lng),
                },
                viewport: None,
            }),
            types: vec!["establishment".to_string()],
        }),
        error_message: None,
    }
}

/// A successful details envelope without any geometry.
pub fn details_without_geometry(place_id: &str, name: &str) -> DetailsResponse {
    DetailsResponse {
        status: LookupStatus::Ok,
        result: Some(RawPlaceDetail {
            place_id: place_id.to_string(),
            name: name.to_string(),
            formatted_address: String::new(),
            geometry: None,
            types: vec![],
        }),
        error_message: None,
    }
}

/// A details envelope carrying a failure status.
pub fn failed_details(status: LookupStatus) -> DetailsResponse {
    DetailsResponse {
        status,
        result: None,
        error_message: None,
    }
}
