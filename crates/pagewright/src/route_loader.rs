// File: src/route_loader.rs
// Purpose: Discovers route files under the pages directory

use anyhow::{Context, Result};
use pagewright_router::FileRoute;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name exempt from the dot-file rule
const WELL_KNOWN: &str = ".well-known";

/// Walks the pages directory and yields one [`FileRoute`] per candidate file
///
/// Names starting with `_` are private and skipped, as are dot-files and
/// dot-directories other than `.well-known`. Entries are visited in sorted
/// order so the declaration order handed to the manifest builder never
/// depends on the filesystem. Extensions are not checked here; the builder
/// warns about files it cannot route.
#[derive(Debug, Clone)]
pub struct RouteLoader {
    pages_dir: PathBuf,
}

impl RouteLoader {
    pub fn new(pages_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
        }
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    pub fn exists(&self) -> bool {
        self.pages_dir.is_dir()
    }

    /// All route files, or an empty list when the directory is missing
    pub fn discover(&self) -> Result<Vec<FileRoute>> {
        let mut routes = Vec::new();
        if !self.exists() {
            return Ok(routes);
        }

        self.load_directory(&self.pages_dir, &mut routes)?;
        tracing::debug!(
            pages_dir = %self.pages_dir.display(),
            files = routes.len(),
            "discovered route files"
        );
        Ok(routes)
    }

    /// Recursively collect route files from a directory
    fn load_directory(&self, dir: &Path, routes: &mut Vec<FileRoute>) -> Result<()> {
        let mut entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read pages directory: {:?}", dir))?
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to list pages directory: {:?}", dir))?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if is_hidden(&name) {
                continue;
            }

            if path.is_dir() {
                self.load_directory(&path, routes)?;
            } else {
                routes.push(self.file_route(&path)?);
            }
        }

        Ok(())
    }

    fn file_route(&self, path: &Path) -> Result<FileRoute> {
        let relative = path
            .strip_prefix(&self.pages_dir)
            .with_context(|| format!("Route file outside pages directory: {:?}", path))?;

        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        Ok(FileRoute::new(relative, path.to_string_lossy()))
    }
}

/// Private (`_`) or dot-prefixed names, except `.well-known`
fn is_hidden(name: &str) -> bool {
    name.starts_with('_') || (name.starts_with('.') && name != WELL_KNOWN)
}
