// File: src/site.rs
// Purpose: Runs the route collaborators and builds the manifest

use anyhow::{Context, Result};
use pagewright_router::{LogRecord, ManifestBuilder, RouteManifest, ROUTER_LABEL};
use std::path::PathBuf;

use crate::config::Config;
use crate::route_loader::RouteLoader;

/// A site: its config plus the collaborators feeding the route manifest
#[derive(Debug, Clone)]
pub struct Site {
    config: Config,
    loader: RouteLoader,
}

impl Site {
    pub fn new(config: Config) -> Self {
        let loader = RouteLoader::new(&config.routing.pages_dir);
        Self { config, loader }
    }

    /// Site rooted at `root`: the pages directory is resolved against it
    pub fn with_root(config: Config, root: impl Into<PathBuf>) -> Self {
        let loader = RouteLoader::new(root.into().join(&config.routing.pages_dir));
        Self { config, loader }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.loader.pages_dir().to_path_buf()
    }

    /// Builds a fresh manifest from disk and config
    ///
    /// Every warning record is emitted through `tracing` and also returned.
    /// Fatal routing errors abort with context and no manifest.
    pub fn build(&self) -> Result<(RouteManifest, Vec<LogRecord>)> {
        let files = self.loader.discover()?;
        let injected = self.config.injected_routes();

        let mut warnings = Vec::new();
        if !self.loader.exists() && injected.is_empty() {
            warnings.push(LogRecord::warn(
                ROUTER_LABEL,
                format!(
                    "Missing pages directory: {}",
                    self.loader.pages_dir().display()
                ),
            ));
        }

        let static_paths = self.config.static_paths();
        let (manifest, build_warnings) = ManifestBuilder::new(self.config.routing.options.clone())
            .with_files(files)
            .with_injected_routes(injected)
            .with_redirects(self.config.redirect_rules())
            .with_static_paths(&static_paths)
            .build()
            .context("Failed to build route manifest")?;
        warnings.extend(build_warnings);

        for record in &warnings {
            record.emit();
        }
        tracing::info!(routes = manifest.len(), warnings = warnings.len(), "route manifest ready");

        Ok((manifest, warnings))
    }
}
