//! Map service adapter over the vendor gateway.
//!
//! [`MapService`] owns every direct vendor interaction: the lazy one-time SDK
//! load, the predictions and detail lookups, and construction of map and
//! marker instances bound to a display surface. It is constructed explicitly
//! and injected wherever it is needed; there is no global singleton.
//!
//! # Initialization contract
//!
//! `initialize` is idempotent and concurrency-safe: concurrent callers during
//! an in-flight load all await one shared future and resolve to the same
//! [`SdkHandle`]. A failed load is cached as a permanent failure until
//! [`MapService::reset_initialization`] is called.
//!
//! # Serialization boundary
//!
//! Every `Place` this service returns has already passed through
//! [`crate::maps::wire`] normalization: plain numbers only, no vendor
//! object shapes. The live [`MapHandle`]/[`MarkerHandle`] types returned by
//! the constructors deliberately do not implement `Serialize` and must never
//! be stored in application state.

use crate::binding::surface::SurfaceRegistry;
use crate::domain::error::{PlacemarkError, Result};
use crate::domain::{LatLng, Marker, Place};
use crate::maps::gateway::{PlacesGateway, SdkSession, SearchRestrictions, DETAIL_FIELDS};
use crate::maps::wire::{detail_to_place, prediction_to_place, LookupStatus};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

/// Minimum query length (in characters) before a vendor lookup is issued.
pub const MIN_QUERY_CHARS: usize = 2;

/// Initial zoom level of a freshly created map.
const DEFAULT_ZOOM: u8 = 12;

/// Shared in-flight SDK load. The error side is a plain string so the future
/// output stays cloneable across all waiters.
type LoadFuture = Shared<BoxFuture<'static, std::result::Result<SdkHandle, String>>>;

/// Lifecycle of the lazy SDK load.
enum InitState {
    /// No load attempted since construction or the last reset.
    Idle,
    /// A load is in flight; new callers join this future.
    Loading(LoadFuture),
    /// The SDK loaded; all callers get this handle.
    Ready(SdkHandle),
    /// The load failed; cached until an explicit reset.
    Failed(String),
}

/// Cheaply cloneable handle to the loaded vendor SDK session.
#[derive(Debug, Clone)]
pub struct SdkHandle {
    session: Arc<SdkSession>,
}

impl SdkHandle {
    fn new(session: SdkSession) -> Self {
        Self {
            session: Arc::new(session),
        }
    }

    /// Vendor-assigned identifier of the loaded session.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    /// Returns `true` when both handles refer to the same loaded session.
    #[must_use]
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }
}

/// Current view of a live map instance.
#[derive(Debug)]
struct MapView {
    center: LatLng,
    zoom: u8,
    markers: Vec<Marker>,
}

/// Live handle to a map instance bound to a display surface.
///
/// This is a vendor-side object: it is cheap to clone and safe to mutate from
/// the binding adapter, but it is intentionally not serializable and must not
/// cross into application state.
#[derive(Debug, Clone)]
pub struct MapHandle {
    id: u64,
    surface_id: String,
    view: Arc<StdMutex<MapView>>,
}

impl MapHandle {
    fn new(id: u64, surface_id: &str, center: LatLng) -> Self {
        Self {
            id,
            surface_id: surface_id.to_string(),
            view: Arc::new(StdMutex::new(MapView {
                center,
                zoom: DEFAULT_ZOOM,
                markers: Vec::new(),
            })),
        }
    }

    fn view(&self) -> std::sync::MutexGuard<'_, MapView> {
        self.view
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Instance identifier, unique within this service.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Identifier of the display surface this map is bound to.
    #[must_use]
    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// Current map center.
    #[must_use]
    pub fn center(&self) -> LatLng {
        self.view().center
    }

    /// Current zoom level.
    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.view().zoom
    }

    /// Plain-data snapshot of the markers currently on the map.
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        self.view().markers.clone()
    }

    /// Re-centers the map.
    pub fn set_center(&self, center: LatLng) {
        self.view().center = center;
    }

    /// Sets the zoom level.
    pub fn set_zoom(&self, zoom: u8) {
        self.view().zoom = zoom;
    }

    /// Removes every marker from the map.
    pub fn clear_markers(&self) {
        self.view().markers.clear();
    }

    fn add_marker(&self, marker: Marker) {
        self.view().markers.push(marker);
    }
}

/// Live handle to a marker created on a map instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerHandle {
    id: u64,
    /// Marker position.
    pub position: LatLng,
    /// Marker title.
    pub title: String,
}

impl MarkerHandle {
    /// Instance identifier, unique within this service.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Adapter owning all direct vendor-API calls.
///
/// No retries are performed here; retry and cancellation policy lives in the
/// workflow coordinator above.
pub struct MapService {
    gateway: Arc<dyn PlacesGateway>,
    surfaces: Arc<SurfaceRegistry>,
    credential: String,
    restrictions: SearchRestrictions,
    init: Mutex<InitState>,
    next_object_id: AtomicU64,
}

impl MapService {
    /// Creates a service over an injected gateway and surface registry.
    ///
    /// The access credential is read once at startup and handed in here; its
    /// validity is only established by the first `initialize` call.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PlacesGateway>,
        surfaces: Arc<SurfaceRegistry>,
        credential: impl Into<String>,
        restrictions: SearchRestrictions,
    ) -> Self {
        Self {
            gateway,
            surfaces,
            credential: credential.into(),
            restrictions,
            init: Mutex::new(InitState::Idle),
            next_object_id: AtomicU64::new(1),
        }
    }

    /// Loads the vendor SDK lazily, once.
    ///
    /// Concurrent callers during an in-flight load all resolve to the same
    /// eventual handle. A failed load is cached and every later call fails
    /// with the same [`PlacemarkError::Initialization`] until
    /// [`reset_initialization`](Self::reset_initialization) is called.
    ///
    /// # Errors
    ///
    /// Returns [`PlacemarkError::Initialization`] when the SDK load fails
    /// (invalid credential, transport failure) or a previous failure is
    /// cached.
    pub async fn initialize(&self) -> Result<SdkHandle> {
        let load = {
            let mut slot = self.init.lock().await;
            match &*slot {
                InitState::Ready(handle) => return Ok(handle.clone()),
                InitState::Failed(message) => {
                    return Err(PlacemarkError::Initialization(message.clone()));
                }
                InitState::Loading(load) => load.clone(),
                InitState::Idle => {
                    tracing::debug!("starting vendor sdk load");
                    let gateway = Arc::clone(&self.gateway);
                    let credential = self.credential.clone();
                    let load: LoadFuture = async move {
                        gateway
                            .load_sdk(&credential)
                            .await
                            .map(SdkHandle::new)
                            .map_err(|e| e.to_string())
                    }
                    .boxed()
                    .shared();
                    *slot = InitState::Loading(load.clone());
                    load
                }
            }
        };

        let outcome = load.await;

        let mut slot = self.init.lock().await;
        match outcome {
            Ok(handle) => {
                if matches!(&*slot, InitState::Loading(_)) {
                    tracing::debug!(session_id = %handle.session_id(), "vendor sdk ready");
                    *slot = InitState::Ready(handle.clone());
                }
                Ok(handle)
            }
            Err(message) => {
                if matches!(&*slot, InitState::Loading(_)) {
                    tracing::warn!(error = %message, "vendor sdk load failed, caching failure");
                    *slot = InitState::Failed(message.clone());
                }
                Err(PlacemarkError::Initialization(message))
            }
        }
    }

    /// Clears a cached initialization outcome so the next call loads again.
    ///
    /// Backs the user-facing retry action after a fatal-looking
    /// initialization failure.
    pub async fn reset_initialization(&self) {
        let mut slot = self.init.lock().await;
        tracing::debug!("initialization state reset");
        *slot = InitState::Idle;
    }

    /// Looks up autocomplete candidates for a free-text query.
    ///
    /// Queries shorter than [`MIN_QUERY_CHARS`] characters return an empty
    /// list without any vendor call. A vendor "no results" status also maps
    /// to an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`PlacemarkError::Search`] carrying the vendor status code for
    /// any other non-success status, [`PlacemarkError::Transport`] on
    /// transport failure, or [`PlacemarkError::Initialization`] when the SDK
    /// cannot load.
    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            tracing::trace!(query_len = trimmed.len(), "query below minimum, skipping lookup");
            return Ok(Vec::new());
        }

        self.initialize().await?;

        let response = self.gateway.autocomplete(trimmed, &self.restrictions).await?;
        match response.status {
            LookupStatus::Ok => {
                let places: Vec<Place> = response
                    .predictions
                    .into_iter()
                    .map(prediction_to_place)
                    .collect();
                tracing::debug!(candidates = places.len(), "search complete");
                Ok(places)
            }
            LookupStatus::ZeroResults => {
                tracing::debug!("search matched nothing");
                Ok(Vec::new())
            }
            status => Err(PlacemarkError::Search {
                status: status.as_str().to_string(),
            }),
        }
    }

    /// Fetches the fully resolved place for an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PlacemarkError::Details`] when the identifier is blank or
    /// the vendor call fails, and [`PlacemarkError::Serialization`] when the
    /// returned geometry cannot be normalized.
    pub async fn place_details(&self, place_id: &str) -> Result<Place> {
        if place_id.trim().is_empty() {
            return Err(PlacemarkError::Details(
                "place identifier is empty".to_string(),
            ));
        }

        self.initialize().await?;

        let response = self
            .gateway
            .place_details(place_id, DETAIL_FIELDS)
            .await
            .map_err(|e| match e {
                PlacemarkError::Transport(message) => PlacemarkError::Details(message),
                other => other,
            })?;

        match (response.status, response.result) {
            (LookupStatus::Ok, Some(raw)) => detail_to_place(raw),
            (LookupStatus::Ok, None) => Err(PlacemarkError::Details(
                "vendor returned OK without a result".to_string(),
            )),
            (status, _) => Err(PlacemarkError::Details(format!(
                "vendor status {}",
                status.as_str()
            ))),
        }
    }

    /// Creates a map instance bound to a registered display surface.
    ///
    /// # Errors
    ///
    /// Returns [`PlacemarkError::SurfaceNotFound`] when no surface with that
    /// identifier exists, or it exists with zero rendered size, at call time.
    /// Initialization errors propagate from the lazy SDK load.
    pub async fn create_map(&self, surface_id: &str, center: LatLng) -> Result<MapHandle> {
        self.initialize().await?;

        let size = match self.surfaces.get(surface_id) {
            None => {
                return Err(PlacemarkError::SurfaceNotFound(format!(
                    "no display surface {surface_id:?}"
                )));
            }
            Some(size) if !size.is_rendered() => {
                return Err(PlacemarkError::SurfaceNotFound(format!(
                    "display surface {surface_id:?} has zero rendered size"
                )));
            }
            Some(size) => size,
        };

        let id = self.next_object_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            surface = %surface_id,
            width = size.width,
            height = size.height,
            "map instance created"
        );
        Ok(MapHandle::new(id, surface_id, center))
    }

    /// Creates a marker on a map instance.
    pub fn create_marker(&self, map: &MapHandle, position: LatLng, title: &str) -> MarkerHandle {
        let id = self.next_object_id.fetch_add(1, Ordering::Relaxed);
        map.add_marker(Marker {
            id: format!("marker-{id}"),
            position,
            title: title.to_string(),
        });
        tracing::debug!(marker = id, lat = position.lat, lng = position.lng, "marker created");
        MarkerHandle {
            id,
            position,
            title: title.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::wire::{
        DetailsResponse, PredictionsResponse, RawPrediction, RawStructuredFormatting,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedGateway {
        load_calls: AtomicUsize,
        autocomplete_calls: AtomicUsize,
        details_calls: AtomicUsize,
        fail_load: std::sync::atomic::AtomicBool,
        load_delay: Option<Duration>,
        predictions: StdMutex<HashMap<String, PredictionsResponse>>,
        details: StdMutex<HashMap<String, DetailsResponse>>,
    }

    impl ScriptedGateway {
        fn with_predictions(query: &str, response: PredictionsResponse) -> Self {
            let gateway = Self::default();
            gateway
                .predictions
                .lock()
                .expect("lock")
                .insert(query.to_string(), response);
            gateway
        }
    }

    #[async_trait]
    impl PlacesGateway for ScriptedGateway {
        async fn load_sdk(&self, _credential: &str) -> Result<SdkSession> {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.load_delay {
                tokio::time::sleep(delay).await;
            }
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
            Ok(self
                .predictions
                .lock()
                .expect("lock")
                .get(query)
                .cloned()
                .unwrap_or(PredictionsResponse {
                    status: LookupStatus::ZeroResults,
                    predictions: vec![],
                    error_message: None,
                }))
        }

        async fn place_details(
            &self,
            place_id: &str,
            _fields: &[&str],
        ) -> Result<DetailsResponse> {
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

    fn service_over(gateway: Arc<ScriptedGateway>) -> MapService {
        MapService::new(
            gateway,
            Arc::new(SurfaceRegistry::new()),
            "test-credential",
            SearchRestrictions::default(),
        )
    }

    #[tokio::test]
    async fn short_query_skips_the_vendor_entirely() {
        let gateway = Arc::new(ScriptedGateway::default());
        let service = service_over(Arc::clone(&gateway));

        let places = service.search_places("K").await.expect("empty result");

        assert!(places.is_empty());
        assert_eq!(gateway.autocomplete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.load_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_results_is_an_empty_list_not_an_error() {
        let gateway = Arc::new(ScriptedGateway::with_predictions(
            "KL",
            PredictionsResponse {
                status: LookupStatus::ZeroResults,
                predictions: vec![],
                error_message: None,
            },
        ));
        let service = service_over(Arc::clone(&gateway));

        let places = service.search_places("KL").await.expect("success");
        assert!(places.is_empty());
        assert_eq!(gateway.autocomplete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_success_status_maps_to_search_error() {
        let gateway = Arc::new(ScriptedGateway::with_predictions(
            "KL",
            PredictionsResponse {
                status: LookupStatus::RequestDenied,
                predictions: vec![],
                error_message: None,
            },
        ));
        let service = service_over(gateway);

        let err = service.search_places("KL").await.expect_err("denied");
        match err {
            PlacemarkError::Search { status } => assert_eq!(status, "REQUEST_DENIED"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn successful_search_converts_predictions() {
        let gateway = Arc::new(ScriptedGateway::with_predictions(
            "Petronas",
            PredictionsResponse {
                status: LookupStatus::Ok,
                predictions: vec![RawPrediction {
                    place_id: "pid-1".to_string(),
                    description: "Petronas Towers, Kuala Lumpur".to_string(),
                    structured_formatting: Some(RawStructuredFormatting {
                        main_text: "Petronas Towers".to_string(),
                        secondary_text: "Kuala Lumpur".to_string(),
                    }),
                    types: vec![],
                }],
                error_message: None,
            },
        ));
        let service = service_over(gateway);

        let places = service.search_places("Petronas").await.expect("success");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, "pid-1");
        assert_eq!(places[0].name, "Petronas Towers");
        assert!(places[0].geometry.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_initialize_loads_once() {
        let gateway = Arc::new(ScriptedGateway {
            load_delay: Some(Duration::from_millis(50)),
            ..ScriptedGateway::default()
        });
        let service = Arc::new(service_over(Arc::clone(&gateway)));

        let (a, b, c) = tokio::join!(
            service.initialize(),
            service.initialize(),
            service.initialize()
        );

        let a = a.expect("a");
        let b = b.expect("b");
        let c = c.expect("c");
        assert!(a.same_session(&b));
        assert!(b.same_session(&c));
        assert_eq!(gateway.load_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_cached_until_reset() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.fail_load.store(true, Ordering::SeqCst);
        let service = service_over(Arc::clone(&gateway));

        let first = service.initialize().await.expect_err("rejected");
        assert!(matches!(first, PlacemarkError::Initialization(_)));

        // Even with the underlying condition fixed, the failure stays cached.
        gateway.fail_load.store(false, Ordering::SeqCst);
        let second = service.initialize().await.expect_err("still cached");
        assert!(matches!(second, PlacemarkError::Initialization(_)));
        assert_eq!(gateway.load_calls.load(Ordering::SeqCst), 1);

        service.reset_initialization().await;
        let handle = service.initialize().await.expect("loads after reset");
        assert_eq!(handle.session_id(), "session-1");
        assert_eq!(gateway.load_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn blank_identifier_is_a_details_error_without_vendor_calls() {
        let gateway = Arc::new(ScriptedGateway::default());
        let service = service_over(Arc::clone(&gateway));

        let err = service.place_details("  ").await.expect_err("blank id");
        assert!(matches!(err, PlacemarkError::Details(_)));
        assert_eq!(gateway.details_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_map_requires_a_rendered_surface() {
        let gateway = Arc::new(ScriptedGateway::default());
        let surfaces = Arc::new(SurfaceRegistry::new());
        let service = MapService::new(
            gateway,
            Arc::clone(&surfaces),
            "test-credential",
            SearchRestrictions::default(),
        );
        let center = LatLng::new(3.1578, 101.7118);

        let missing = service.create_map("map", center).await.expect_err("missing");
        assert!(matches!(missing, PlacemarkError::SurfaceNotFound(_)));

        surfaces.register("map", 0, 0);
        let unrendered = service.create_map("map", center).await.expect_err("zero size");
        assert!(matches!(unrendered, PlacemarkError::SurfaceNotFound(_)));

        surfaces.resize("map", 800, 600);
        let map = service.create_map("map", center).await.expect("created");
        assert_eq!(map.surface_id(), "map");
        assert_eq!(map.center(), center);

        let marker = service.create_marker(&map, center, "Petronas Towers");
        assert_eq!(marker.position, center);
        assert_eq!(map.markers().len(), 1);
        map.clear_markers();
        assert!(map.markers().is_empty());
    }
}
