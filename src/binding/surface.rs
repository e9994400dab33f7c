//! Display-surface registry and readiness signaling.
//!
//! The map display surface is owned by a hosting UI layer that mounts
//! asynchronously: it may not exist, or may have zero rendered size, when the
//! map binding starts observing. The [`SurfaceRegistry`] is the integration
//! point: the host registers surfaces (and size changes) as explicit
//! notifications, and [`SurfaceRegistry::wait_ready`] awaits those
//! notifications with a bounded attempt budget instead of busy-polling the
//! surface.

use crate::domain::error::{PlacemarkError, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;

/// Rendered dimensions of a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    /// Rendered width in pixels.
    pub width: u32,
    /// Rendered height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Returns `true` when the surface has non-zero rendered dimensions.
    #[must_use]
    pub const fn is_rendered(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Registry of display surfaces announced by the hosting UI layer.
///
/// All methods are synchronous and cheap; every mutation bumps a revision
/// watch channel so waiters re-check without polling.
#[derive(Debug)]
pub struct SurfaceRegistry {
    /// Announced surfaces by identifier.
    surfaces: Mutex<HashMap<String, SurfaceSize>>,

    /// Revision counter bumped on every announcement.
    revision: watch::Sender<u64>,
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            surfaces: Mutex::new(HashMap::new()),
            revision,
        }
    }
}

impl SurfaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn surfaces(&self) -> std::sync::MutexGuard<'_, HashMap<String, SurfaceSize>> {
        self.surfaces
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn announce(&self, id: &str, size: SurfaceSize) {
        self.surfaces().insert(id.to_string(), size);
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    /// Registers a surface, replacing any previous announcement for the id.
    ///
    /// The host calls this once the surface element exists; a zero size is a
    /// valid announcement for a surface that has mounted but not yet laid out.
    pub fn register(&self, id: &str, width: u32, height: u32) {
        tracing::debug!(surface = %id, width, height, "surface registered");
        self.announce(id, SurfaceSize { width, height });
    }

    /// Updates the rendered size of an already registered surface.
    pub fn resize(&self, id: &str, width: u32, height: u32) {
        tracing::debug!(surface = %id, width, height, "surface resized");
        self.announce(id, SurfaceSize { width, height });
    }

    /// Removes a surface, typically when the hosting view unmounts.
    pub fn remove(&self, id: &str) {
        if self.surfaces().remove(id).is_some() {
            tracing::debug!(surface = %id, "surface removed");
            self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
        }
    }

    /// Returns the announced size of a surface, rendered or not.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<SurfaceSize> {
        self.surfaces().get(id).copied()
    }

    /// Returns the size of a surface that exists and has non-zero dimensions.
    #[must_use]
    pub fn rendered(&self, id: &str) -> Option<SurfaceSize> {
        self.get(id).filter(|size| size.is_rendered())
    }

    /// Awaits readiness of a surface with a bounded attempt budget.
    ///
    /// Each attempt waits up to `wait_per_attempt` for a registry
    /// announcement before re-checking. The wait fails terminally once the
    /// budget is exhausted; it never retries forever.
    ///
    /// # Errors
    ///
    /// Returns [`PlacemarkError::Initialization`] when the surface has not
    /// reached a non-zero rendered size within the budget.
    pub async fn wait_ready(
        &self,
        id: &str,
        attempts: u32,
        wait_per_attempt: Duration,
    ) -> Result<SurfaceSize> {
        let mut revision = self.revision.subscribe();

        for attempt in 1..=attempts {
            if let Some(size) = self.rendered(id) {
                return Ok(size);
            }

            match tokio::time::timeout(wait_per_attempt, revision.changed()).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => break,
                Err(_elapsed) => {
                    tracing::debug!(surface = %id, attempt, "surface not ready yet");
                }
            }
        }

        if let Some(size) = self.rendered(id) {
            return Ok(size);
        }

        Err(PlacemarkError::Initialization(format!(
            "display surface {id:?} did not become ready within {attempts} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn wait_ready_resolves_when_surface_appears_late() {
        let registry = Arc::new(SurfaceRegistry::new());

        let waiter = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry
                    .wait_ready("map", 10, Duration::from_millis(100))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(250)).await;
        registry.register("map", 0, 0);
        tokio::time::sleep(Duration::from_millis(50)).await;
        registry.resize("map", 800, 600);

        let size = waiter.await.expect("join").expect("ready");
        assert_eq!(
            size,
            SurfaceSize {
                width: 800,
                height: 600
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wait_ready_fails_terminally_after_budget() {
        let registry = SurfaceRegistry::new();
        registry.register("map", 0, 0);

        let err = registry
            .wait_ready("map", 3, Duration::from_millis(100))
            .await
            .expect_err("budget exhausted");

        assert!(matches!(err, PlacemarkError::Initialization(_)));
    }
}
