//! Inputs handed to the manifest builder by its collaborators

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{InjectedPriority, RouteKind};
use crate::Params;

/// A file under the routes root, as yielded by the filesystem walker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRoute {
    /// Routes-root-relative path including its extension (`blog/[slug].md`)
    pub path: String,
    pub component: String,
}

impl FileRoute {
    pub fn new(path: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component: component.into(),
        }
    }
}

/// A route declared in code or config rather than on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectedRoute {
    pub pattern: String,
    pub component: String,
    pub kind: RouteKind,
    #[serde(default)]
    pub priority: Option<InjectedPriority>,
}

impl InjectedRoute {
    pub fn page(pattern: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            component: component.into(),
            kind: RouteKind::Page,
            priority: None,
        }
    }

    pub fn endpoint(pattern: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            kind: RouteKind::Endpoint,
            ..Self::page(pattern, component)
        }
    }

    pub fn with_priority(mut self, priority: InjectedPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// `source -> destination` with an HTTP status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub source: String,
    pub destination: String,
    #[serde(default = "default_redirect_status")]
    pub status: u16,
}

fn default_redirect_status() -> u16 {
    301
}

impl RedirectRule {
    /// Permanent (301) redirect
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            status: default_redirect_status(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

/// Static-path-generation collaborator
///
/// Returns the concrete param sets of a route declared as pre-rendered,
/// keyed by its lower-cased route string. `None` means the route resolves
/// dynamically at request time.
pub trait StaticPaths {
    fn static_params(&self, route_string: &str) -> Option<Vec<Params>>;
}

/// No route is pre-rendered
impl StaticPaths for () {
    fn static_params(&self, _route_string: &str) -> Option<Vec<Params>> {
        None
    }
}

impl StaticPaths for HashMap<String, Vec<Params>> {
    fn static_params(&self, route_string: &str) -> Option<Vec<Params>> {
        self.get(route_string).cloned()
    }
}

impl<T: StaticPaths + ?Sized> StaticPaths for &T {
    fn static_params(&self, route_string: &str) -> Option<Vec<Params>> {
        (**self).static_params(route_string)
    }
}
