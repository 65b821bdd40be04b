//! Process-wide site snapshot cache.
//!
//! [`SiteLoader`] keeps the current [`Site`] and rebuilds it from disk when
//! invalidated. Rebuilds replace the snapshot wholesale; readers holding an
//! older `Arc<Site>` keep using it.
//!
//! # Thread Safety
//!
//! - `get()` returns `Arc<Site>` with minimal locking (just Arc clone)
//! - `reload_if_needed()` uses double-checked locking
//! - `invalidate()` is lock-free (atomic flag)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use folio_site::{SiteLoader, SiteLoaderConfig};
//!
//! let loader = Arc::new(SiteLoader::new(SiteLoaderConfig::new("content")));
//! let site = loader.reload_if_needed()?;
//! println!("{} documents", site.document_count());
//! # Ok::<(), folio_site::SiteError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use folio_content::ContentTree;

use crate::site::{Site, SiteConfig, SiteError};

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Configuration for [`SiteLoader`].
#[derive(Clone, Debug)]
pub struct SiteLoaderConfig {
    /// Content root directory.
    pub source_dir: PathBuf,
    /// Options applied to every snapshot.
    pub site: SiteConfig,
}

impl SiteLoaderConfig {
    /// Default site options for a content root.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            site: SiteConfig::default(),
        }
    }
}

/// Holds the current site snapshot and rebuilds it on demand.
///
/// - Uses internal `RwLock<Arc<Site>>` for the current site snapshot
/// - Uses `Mutex<()>` for serializing reload operations
/// - Uses `AtomicBool` for cache validity tracking
pub struct SiteLoader {
    config: SiteLoaderConfig,
    /// Mutex for serializing reload operations.
    reload_lock: Mutex<()>,
    /// Current site snapshot (atomically swappable).
    current_site: RwLock<Arc<Site>>,
    /// Cache validity flag.
    cache_valid: AtomicBool,
}

impl SiteLoader {
    /// Create a loader holding an empty snapshot; nothing is read until
    /// the first [`reload_if_needed`](Self::reload_if_needed).
    pub fn new(config: SiteLoaderConfig) -> Self {
        let initial_site = Arc::new(Site::from_tree(
            config.source_dir.clone(),
            ContentTree::default(),
            &config.site,
        ));
        Self {
            config,
            reload_lock: Mutex::new(()),
            current_site: RwLock::new(initial_site),
            cache_valid: AtomicBool::new(false),
        }
    }

    /// Current snapshot, without checking validity.
    pub fn get(&self) -> Arc<Site> {
        Arc::clone(
            &self
                .current_site
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Rebuild the snapshot if it was invalidated (or never built).
    ///
    /// On failure the previous snapshot stays current and the cache stays
    /// invalid, so the next call retries.
    pub fn reload_if_needed(&self) -> Result<Arc<Site>, SiteError> {
        let start = Instant::now();

        if self.cache_valid.load(Ordering::Acquire) {
            return Ok(self.get());
        }

        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Double-check after acquiring lock
        if self.cache_valid.load(Ordering::Acquire) {
            return Ok(self.get());
        }

        let site = match Site::build(self.config.source_dir.clone(), &self.config.site) {
            Ok(site) => Arc::new(site),
            Err(e) => {
                tracing::warn!(
                    path = %self.config.source_dir.display(),
                    error = %e,
                    "Site reload failed"
                );
                return Err(e);
            }
        };

        *self
            .current_site
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&site);
        self.cache_valid.store(true, Ordering::Release);

        tracing::info!(
            document_count = site.document_count(),
            elapsed_ms = elapsed_ms(start),
            "Site reloaded"
        );
        Ok(site)
    }

    /// Mark the snapshot stale. The next `reload_if_needed()` rebuilds.
    pub fn invalidate(&self) {
        self.cache_valid.store(false, Ordering::Release);
    }

    /// Content root directory.
    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }
}
