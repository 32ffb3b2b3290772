mod dispatch;
mod hot_reload;

use anyhow::{Context, Result};
use pagewright::{Config, ManifestHandle, Site};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_livereload::LiveReloadLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::dispatch::AppState;
use crate::hot_reload::{create_watcher, spawn_rebuilds};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagewright=debug,pagewright_router=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("pagewright starting");

    let config = Config::load_default().unwrap_or_else(|e| {
        warn!("Failed to load config: {:#}, using defaults", e);
        Config::default()
    });

    info!(
        port = config.server.port,
        pages_dir = %config.routing.pages_dir,
        trailing_slash = ?config.routing.options.trailing_slash,
        priority = ?config.routing.options.priority,
        "Configuration loaded"
    );

    let hot_reload_enabled = config.hot_reload_enabled();
    let addr = format!("{}:{}", config.server.host, config.server.port);

    // A broken route tree at startup is fatal; later rebuilds keep the last good manifest
    let site = Site::new(config);
    let (manifest, _) = site.build()?;
    for route in manifest.iter() {
        info!("  {} -> {:?} {}", route.route_string(), route.kind(), route.component());
    }

    let manifest = Arc::new(ManifestHandle::new(manifest));
    let state = AppState {
        manifest: manifest.clone(),
    };

    let app = dispatch::router(state).layer(TraceLayer::new_for_http());

    let app = if hot_reload_enabled {
        info!("Hot reload: enabled");
        let livereload = LiveReloadLayer::new();
        match create_watcher(&site) {
            Ok(watcher) => spawn_rebuilds(watcher, manifest, site, livereload.reloader()),
            Err(e) => error!("Failed to create file watcher: {:#}", e),
        }
        app.layer(livereload)
    } else {
        app
    };

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
