// Pagewright - file-based site framework
// Config loading, page discovery and route manifest builds on top of pagewright-router

pub mod config;
pub mod route_loader;
pub mod site;

pub use config::{Config, DevConfig, RedirectConfig, RouteConfig, RoutingConfig, ServerConfig};
pub use route_loader::RouteLoader;
pub use site::Site;

// Re-export the routing core
pub use pagewright_router as router;
pub use pagewright_router::{
    resolve, LogRecord, ManifestHandle, MatchResult, ResolveContext, RouteDefinition, RouteKind,
    RouteManifest, RoutingOptions, TrailingSlash,
};
