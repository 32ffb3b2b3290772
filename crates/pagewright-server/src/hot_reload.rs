use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use pagewright::config::CONFIG_FILE;
use pagewright::{Config, LogRecord, ManifestHandle, Site};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_livereload::Reloader;
use tracing::{error, info, warn};

/// What kind of file changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// A file under the pages directory was added, edited or removed
    Page,
    /// The site config file changed
    Config,
    /// Any other watched path
    Source,
}

/// Represents a file change event
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: PathBuf,
    pub change_type: ChangeType,
}

/// Watches the site's route sources and broadcasts changes
pub struct HotReloadWatcher {
    tx: broadcast::Sender<FileChange>,
    _watcher: notify::RecommendedWatcher,
}

impl HotReloadWatcher {
    pub fn new(pages_dir: PathBuf, config_file: PathBuf, watch_paths: Vec<PathBuf>) -> Result<Self> {
        let (tx, _) = broadcast::channel(100);
        let tx_clone = tx.clone();
        // Events carry absolute paths while the config may hold relative ones
        let classify_pages_dir = pages_dir.canonicalize().unwrap_or_else(|_| pages_dir.clone());
        let config_name = config_file.file_name().map(|name| name.to_os_string());

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    // Removed pages drop routes, so removals count too
                    if !matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    ) {
                        return;
                    }

                    for path in event.paths {
                        let change_type = if path.file_name().map(|n| n.to_os_string()) == config_name {
                            ChangeType::Config
                        } else if path.starts_with(&classify_pages_dir) {
                            ChangeType::Page
                        } else {
                            ChangeType::Source
                        };

                        info!("File changed: {:?} ({:?})", path, change_type);
                        // Ignore send errors: nobody may be listening yet
                        let _ = tx_clone.send(FileChange { path, change_type });
                    }
                }
                Err(e) => error!("Watch error: {:?}", e),
            }
        })?;

        if config_file.exists() {
            watcher.watch(&config_file, RecursiveMode::NonRecursive)?;
            info!("Watching: {:?}", config_file);
        }

        for path in std::iter::once(pages_dir).chain(watch_paths) {
            if path.exists() {
                watcher.watch(&path, RecursiveMode::Recursive)?;
                info!("Watching: {:?}", path);
            } else {
                warn!("Path does not exist: {:?}", path);
            }
        }

        Ok(Self {
            tx,
            _watcher: watcher,
        })
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<FileChange> {
        self.tx.subscribe()
    }
}

/// Creates a watcher for the pages directory, the config file and `dev.watch_paths`
pub fn create_watcher(site: &Site) -> Result<HotReloadWatcher> {
    let watch_paths = site
        .config()
        .dev
        .watch_paths
        .iter()
        .map(PathBuf::from)
        .collect();

    HotReloadWatcher::new(site.pages_dir(), PathBuf::from(CONFIG_FILE), watch_paths)
}

/// Rebuilds the manifest on every change and swaps it in
///
/// A failed rebuild is logged and the previous manifest keeps serving.
/// Connected browsers reload only after a successful swap.
pub fn spawn_rebuilds(
    watcher: HotReloadWatcher,
    manifest: Arc<ManifestHandle>,
    mut site: Site,
    reloader: Reloader,
) {
    let mut changes = watcher.subscribe();

    tokio::spawn(async move {
        let _watcher = watcher;
        loop {
            let change = match changes.recv().await {
                Ok(change) => Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "file change events dropped, rebuilding anyway");
                    None
                }
                Err(RecvError::Closed) => break,
            };

            if let Some(FileChange { change_type: ChangeType::Config, path }) = change {
                info!("Reloading config from {:?}", path);
                match Config::load(CONFIG_FILE) {
                    Ok(config) => site = Site::new(config),
                    Err(e) => {
                        error!("Failed to reload config: {:#}", e);
                        continue;
                    }
                }
            }

            match rebuild(&manifest, &site).await {
                Ok(warnings) => {
                    info!(
                        generation = manifest.generation(),
                        warnings = warnings.len(),
                        "route manifest rebuilt"
                    );
                    reloader.reload();
                }
                Err(e) => error!("Route rebuild failed, keeping previous manifest: {:#}", e),
            }
        }
    });
}

/// Builds the site on the blocking pool and swaps the result in
///
/// The walk reads the filesystem, so it stays off the async workers that
/// serve requests. On failure the current manifest is left in place.
pub async fn rebuild(manifest: &Arc<ManifestHandle>, site: &Site) -> Result<Vec<LogRecord>> {
    let manifest = Arc::clone(manifest);
    let site = site.clone();

    tokio::task::spawn_blocking(move || manifest.rebuild_with(|| site.build()))
        .await
        .context("Route rebuild task panicked")?
}
