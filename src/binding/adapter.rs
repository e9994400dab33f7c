//! Map binding: reconciles the selected place onto the live map.
//!
//! [`MapBinding`] observes the state store for a selected place and turns it
//! into imperative map calls: clear the previous markers, pin one marker at
//! the place's location, re-center, and apply a fixed close-in zoom. It is
//! the only component that mutates the map instance and its marker set, and
//! it performs every update as clear-then-add so stale and fresh markers are
//! never visible together.
//!
//! The display surface is owned by a UI layer that mounts asynchronously, so
//! the binding waits for surface readiness with a bounded budget. A terminal
//! readiness timeout (or a failed SDK load) publishes a retryable
//! [`BindingStatus::Failed`]; the host triggers another attempt through the
//! retry handle.

use crate::app::AppState;
use crate::binding::surface::SurfaceRegistry;
use crate::domain::error::Result;
use crate::domain::{LatLng, Place};
use crate::maps::{MapHandle, MapService, MarkerHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};

/// Zoom level applied when pinning a selected place.
pub const SELECTION_ZOOM: u8 = 15;

/// Lifecycle of the binding as visible to the hosting UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingStatus {
    /// No map instance exists yet.
    Detached,

    /// The map is attached to its surface and following selections.
    Ready,

    /// Attaching failed; the host should offer a manual retry action.
    Failed {
        /// User-facing description of the failure.
        message: String,
    },
}

/// Tuning knobs for surface readiness waiting.
#[derive(Debug, Clone, Copy)]
pub struct BindingOptions {
    /// Maximum number of readiness attempts before failing terminally.
    pub readiness_attempts: u32,

    /// Wait per readiness attempt.
    pub readiness_wait: Duration,

    /// Zoom level applied on selection.
    pub zoom: u8,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            readiness_attempts: 10,
            readiness_wait: Duration::from_millis(500),
            zoom: SELECTION_ZOOM,
        }
    }
}

/// Observer task reconciling selection changes onto the map instance.
pub struct MapBinding {
    service: Arc<MapService>,
    registry: Arc<SurfaceRegistry>,
    surface_id: String,
    options: BindingOptions,

    status: watch::Sender<BindingStatus>,
    map_out: watch::Sender<Option<MapHandle>>,
    retry: Arc<Notify>,

    map: Option<MapHandle>,
    markers: Vec<MarkerHandle>,
    last_pinned: Option<(String, LatLng)>,
}

impl MapBinding {
    /// Creates a binding for one display surface.
    #[must_use]
    pub fn new(
        service: Arc<MapService>,
        registry: Arc<SurfaceRegistry>,
        surface_id: impl Into<String>,
        options: BindingOptions,
    ) -> Self {
        let (status, _) = watch::channel(BindingStatus::Detached);
        let (map_out, _) = watch::channel(None);
        Self {
            service,
            registry,
            surface_id: surface_id.into(),
            options,
            status,
            map_out,
            retry: Arc::new(Notify::new()),
            map: None,
            markers: Vec::new(),
            last_pinned: None,
        }
    }

    /// Returns a receiver observing the binding lifecycle.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<BindingStatus> {
        self.status.subscribe()
    }

    /// Returns a receiver observing the live map handle.
    ///
    /// Publishes `Some` once the map attaches; hosts use it to wire gesture
    /// input to the instance. The handle must not be stored in application
    /// state.
    #[must_use]
    pub fn map_handle(&self) -> watch::Receiver<Option<MapHandle>> {
        self.map_out.subscribe()
    }

    /// Returns the handle backing the manual retry action.
    ///
    /// Notifying it after a [`BindingStatus::Failed`] makes the binding
    /// attempt to attach again. When the failure came from a cached SDK load
    /// failure the host should also call
    /// [`MapService::reset_initialization`] first.
    #[must_use]
    pub fn retry_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.retry)
    }

    /// Runs the binding until the state store is dropped.
    ///
    /// After a failure the binding parks until either the retry handle is
    /// notified (re-attempting the same selection) or the selection changes.
    pub async fn run(mut self, mut states: watch::Receiver<AppState>) {
        loop {
            let selected = states.borrow_and_update().selected.clone();

            if let Some(place) = selected {
                if let Err(err) = self.apply_selection(&place).await {
                    let message = err.to_string();
                    tracing::warn!(error = %message, "map binding attach failed");
                    self.status
                        .send_replace(BindingStatus::Failed { message });

                    tokio::select! {
                        () = self.retry.notified() => continue,
                        changed = states.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            continue;
                        }
                    }
                }
            }

            if states.changed().await.is_err() {
                break;
            }
        }
        tracing::debug!("map binding stopped");
    }

    /// Reconciles one selected place onto the map.
    ///
    /// A place without geometry is a no-op: the previous pin stays on the
    /// map rather than blanking it.
    async fn apply_selection(&mut self, place: &Place) -> Result<()> {
        let Some(location) = place.location() else {
            tracing::debug!(place_id = %place.id, "selected place has no geometry, keeping previous pin");
            return Ok(());
        };

        if self.last_pinned.as_ref() == Some(&(place.id.clone(), location)) {
            return Ok(());
        }

        self.ensure_map(location).await?;
        let Some(map) = self.map.as_ref() else {
            return Ok(());
        };

        let stale = self.markers.len();
        if stale > 0 {
            tracing::debug!(stale, "clearing previous markers");
        }
        map.clear_markers();
        self.markers.clear();

        let marker = self.service.create_marker(map, location, &place.name);
        self.markers.push(marker);
        map.set_center(location);
        map.set_zoom(self.options.zoom);

        self.last_pinned = Some((place.id.clone(), location));
        tracing::debug!(
            place_id = %place.id,
            lat = location.lat,
            lng = location.lng,
            zoom = self.options.zoom,
            "selection pinned"
        );
        Ok(())
    }

    /// Attaches the map on first use.
    ///
    /// Waits for the display surface to exist with non-zero rendered size
    /// before any map construction call is attempted; a terminal readiness
    /// timeout therefore never constructs a map.
    async fn ensure_map(&mut self, center: LatLng) -> Result<()> {
        if self.map.is_some() {
            return Ok(());
        }

        let size = self
            .registry
            .wait_ready(
                &self.surface_id,
                self.options.readiness_attempts,
                self.options.readiness_wait,
            )
            .await?;
        tracing::debug!(
            surface = %self.surface_id,
            width = size.width,
            height = size.height,
            "surface ready"
        );

        let map = self.service.create_map(&self.surface_id, center).await?;
        self.map = Some(map.clone());
        self.map_out.send_replace(Some(map));
        self.status.send_replace(BindingStatus::Ready);
        Ok(())
    }
}
