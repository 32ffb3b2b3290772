//! Atomically swappable manifest for long-lived servers
//!
//! Readers take an `Arc` snapshot at the start of a request and keep it for
//! the whole request; a rebuild publishes a new manifest with one pointer
//! swap. Readers never wait on a rebuild.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::log::LogRecord;
use crate::manifest::RouteManifest;

pub struct ManifestHandle {
    generation: AtomicU64,
    current: ArcSwap<RouteManifest>,
}

impl ManifestHandle {
    pub fn new(manifest: RouteManifest) -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: ArcSwap::new(Arc::new(manifest)),
        }
    }

    /// Current manifest; stays valid even if a newer one is published
    pub fn load(&self) -> Arc<RouteManifest> {
        self.current.load_full()
    }

    /// Publishes `manifest` for every later [`load`](Self::load)
    pub fn store(&self, manifest: RouteManifest) {
        self.current.store(Arc::new(manifest));
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, routes = self.current.load().len(), "route manifest swapped");
    }

    /// Number of manifests published since construction
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Runs `build` and publishes its manifest on success
    ///
    /// On error the previous manifest stays in place and the error is
    /// returned. On success the build's warning records are returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::{build_manifest, FileRoute, ManifestHandle, RouteManifest, RoutingOptions};
    ///
    /// let handle = ManifestHandle::new(RouteManifest::default());
    ///
    /// let broken = handle.rebuild_with(|| {
    ///     build_manifest(vec![FileRoute::new("[oops.astro", "x")], vec![], vec![], RoutingOptions::default())
    /// });
    /// assert!(broken.is_err());
    /// assert_eq!(handle.generation(), 0);
    ///
    /// handle
    ///     .rebuild_with(|| {
    ///         build_manifest(vec![FileRoute::new("about.astro", "about")], vec![], vec![], RoutingOptions::default())
    ///     })
    ///     .unwrap();
    /// assert_eq!(handle.load().len(), 1);
    /// ```
    pub fn rebuild_with<F, E>(&self, build: F) -> Result<Vec<LogRecord>, E>
    where
        F: FnOnce() -> Result<(RouteManifest, Vec<LogRecord>), E>,
    {
        let (manifest, warnings) = build()?;
        self.store(manifest);
        Ok(warnings)
    }
}

impl Default for ManifestHandle {
    fn default() -> Self {
        Self::new(RouteManifest::default())
    }
}

impl std::fmt::Debug for ManifestHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestHandle")
            .field("generation", &self.generation())
            .field("routes", &self.current.load().len())
            .finish()
    }
}
