// File: src/config.rs
// Purpose: Configuration parsing from pagewright.toml

use anyhow::{Context, Result};
use indexmap::IndexMap;
use pagewright_router::{
    InjectedPriority, InjectedRoute, Params, RedirectRule, RouteKind, RoutingOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Default config file name
pub const CONFIG_FILE: &str = "pagewright.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    /// Injected routes, declared as `[[routes]]`
    #[serde(default)]
    pub routes: Vec<RouteConfig>,

    /// `source = "destination"` or `source = { destination, status }`, in file order
    #[serde(default)]
    pub redirects: IndexMap<String, RedirectConfig>,

    /// Pre-rendered param sets keyed by route string
    #[serde(default)]
    pub static_paths: BTreeMap<String, Vec<BTreeMap<String, String>>>,

    #[serde(default)]
    pub dev: DevConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directory containing page and endpoint files (default: "pages")
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    #[serde(flatten)]
    pub options: RoutingOptions,
}

/// One injected route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub pattern: String,

    /// Component or handler backing the route
    pub entrypoint: String,

    /// Overrides the kind guessed from the entrypoint extension
    #[serde(default)]
    pub kind: Option<RouteKind>,

    #[serde(default)]
    pub priority: Option<InjectedPriority>,
}

/// Redirect destination, bare or with an explicit status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RedirectConfig {
    Destination(String),
    Detailed {
        destination: String,
        #[serde(default = "default_redirect_status")]
        status: u16,
    },
}

/// Development configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default = "default_true")]
    pub hot_reload: bool,

    /// Extra paths watched besides the pages directory and the config file
    #[serde(default)]
    pub watch_paths: Vec<String>,
}

// Default values
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_redirect_status() -> u16 {
    301
}

fn default_true() -> bool {
    true
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            options: RoutingOptions::default(),
        }
    }
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            hot_reload: true,
            watch_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a pagewright.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from the default path (./pagewright.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(CONFIG_FILE)
    }

    /// Whether the dev server rebuilds on file changes
    ///
    /// `HOT_RELOAD=true|false` overrides `[dev] hot_reload`.
    pub fn hot_reload_enabled(&self) -> bool {
        std::env::var("HOT_RELOAD")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(self.dev.hot_reload)
    }

    /// Injected routes in declaration order
    pub fn injected_routes(&self) -> Vec<InjectedRoute> {
        self.routes
            .iter()
            .map(|route| {
                let kind = route.kind.unwrap_or_else(|| self.entrypoint_kind(&route.entrypoint));
                InjectedRoute {
                    pattern: route.pattern.clone(),
                    component: route.entrypoint.clone(),
                    kind,
                    priority: route.priority,
                }
            })
            .collect()
    }

    /// Redirect rules in declaration order
    pub fn redirect_rules(&self) -> Vec<RedirectRule> {
        self.redirects
            .iter()
            .map(|(source, target)| match target {
                RedirectConfig::Destination(destination) => {
                    RedirectRule::new(source.clone(), destination.clone())
                }
                RedirectConfig::Detailed {
                    destination,
                    status,
                } => RedirectRule::new(source.clone(), destination.clone()).with_status(*status),
            })
            .collect()
    }

    /// Static param sets keyed by lower-cased route string
    pub fn static_paths(&self) -> HashMap<String, Vec<Params>> {
        self.static_paths
            .iter()
            .map(|(route, sets)| {
                let sets = sets
                    .iter()
                    .map(|set| set.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .collect();
                (route.to_lowercase(), sets)
            })
            .collect()
    }

    fn entrypoint_kind(&self, entrypoint: &str) -> RouteKind {
        Path::new(entrypoint)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.routing.options.kind_for_extension(ext))
            .unwrap_or(RouteKind::Page)
    }
}
