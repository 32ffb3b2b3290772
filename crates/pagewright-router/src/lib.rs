//! # Pagewright Router
//!
//! The routing core of a site build/serve framework. It turns three route
//! sources into one ordered, immutable manifest and matches request paths
//! against it:
//! - Filesystem routes (`blog/[slug].md`, `docs/[...path].astro`)
//! - Injected routes declared in code or config
//! - Redirect rules (`/old/[id]` → `/new/[id]`, or an external URL)
//!
//! ## Ordering
//!
//! Routes sort most specific first: at each position a static segment beats
//! a dynamic one, which beats a rest segment. In legacy mode the route kind
//! is compared first (endpoints, pages, redirects); in global mode only the
//! specificity counts, with source nesting depth breaking ties. Equal keys
//! keep declaration order.
//!
//! ## Concurrency
//!
//! A [`RouteManifest`] never changes after it is built. [`match_all`] and
//! [`resolve`] only read it and return per-request [`MatchResult`]s; a
//! [`ManifestHandle`] swaps in a rebuilt manifest without blocking readers.
//!
//! ## Example
//!
//! ```
//! use pagewright_router::{FileRoute, ManifestBuilder, ResolveContext, RoutingOptions, resolve};
//!
//! let (manifest, warnings) = ManifestBuilder::new(RoutingOptions::default())
//!     .with_file(FileRoute::new("about.astro", "src/pages/about.astro"))
//!     .with_file(FileRoute::new("users/[id].astro", "src/pages/users/[id].astro"))
//!     .build()
//!     .unwrap();
//! assert!(warnings.is_empty());
//!
//! let candidates = resolve(manifest.match_all("/users/123"), &ResolveContext::server());
//! assert_eq!(candidates[0].params.get("id"), Some(&"123".to_string()));
//! ```

use std::collections::HashMap;

pub mod compile;
pub mod config;
pub mod error;
pub mod log;
pub mod manifest;
pub mod matcher;
pub mod path;
pub mod resolve;
pub mod route;
pub mod snapshot;

/// Parameter values keyed by name
pub type Params = HashMap<String, String>;

pub use compile::CompiledMatcher;
pub use config::{RoutePriority, RoutingOptions, TrailingSlash};
pub use error::{Result, RouteError};
pub use log::{LogLevel, LogRecord, ROUTER_LABEL, STATIC_PATHS_LABEL};
pub use manifest::{
    build_manifest, detect_collisions, Destination, FileRoute, InjectedPriority, InjectedRoute,
    ManifestBuilder, RedirectRule, RedirectTarget, RouteDefinition, RouteKind, RouteManifest,
    RouteOrigin, StaticPaths,
};
pub use matcher::{match_all, MatchResult};
pub use resolve::{resolve, RenderMode, ResolveContext};
pub use route::{classify_segment, PathSegment, RouteTemplate, SegmentRank, SpecificityScore};
pub use snapshot::ManifestHandle;
