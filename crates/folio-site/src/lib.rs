//! Site snapshots, lookups, navigation and search for Folio.
//!
//! This crate provides:
//! - [`Site`]: immutable snapshot of the content tree with lookups, routes,
//!   navigation, page compilation and search
//! - [`SiteLoader`]: process-wide cache that swaps snapshots on rebuild
//!
//! # Quick Start
//!
//! ```no_run
//! use folio_site::{Site, SiteConfig};
//!
//! let site = Site::build("content", &SiteConfig::default())?;
//! for route in site.routes() {
//!     let page = site.render(&route.section, &route.slug)?;
//!     println!("{} -> {} bytes", route.path(), page.html.len());
//! }
//! let hits = site.search("hooks");
//! # Ok::<(), folio_site::SiteError>(())
//! ```

mod navigation;
mod search;
mod site;
mod site_loader;

pub use navigation::{NavItem, Navigation};
pub use search::{SearchHit, SearchIndex};
pub use site::{CompiledPage, RenderedPage, Route, Site, SiteConfig, SiteError};
pub use site_loader::{SiteLoader, SiteLoaderConfig};

// Re-export for convenience
pub use folio_content::{Diagnostic, DiagnosticKind, DocContent, DocSection, TreeConfig};
pub use folio_renderer::{CompileError, TocEntry};
