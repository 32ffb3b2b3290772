/// Route definitions and the immutable manifest
///
/// A [`RouteManifest`] is produced by [`ManifestBuilder`] and never changes
/// afterwards. Request-time matching borrows it; nothing per-request is ever
/// written back.

use serde::{Deserialize, Serialize};

use crate::compile::CompiledMatcher;
use crate::config::{RoutingOptions, TrailingSlash};
use crate::matcher::{self, MatchResult};
use crate::route::{RouteTemplate, SpecificityScore};
use crate::Params;

pub mod builder;
pub mod collision;
pub mod sources;

pub use builder::{build_manifest, ManifestBuilder};
pub use collision::detect_collisions;
pub use sources::{FileRoute, InjectedRoute, RedirectRule, StaticPaths};

/// What a matched route produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Page,
    Endpoint,
    Redirect,
}

impl RouteKind {
    /// Legacy ordering rank: endpoints, then pages, then redirects
    pub fn rank(self) -> u8 {
        match self {
            RouteKind::Endpoint => 0,
            RouteKind::Page => 1,
            RouteKind::Redirect => 2,
        }
    }
}

/// Where a route was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteOrigin {
    Filesystem,
    Injected,
    Redirect,
}

/// Ordering hint an injected route may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectedPriority {
    /// Sorted ahead of filesystem routes (legacy mode)
    Legacy,
    /// Sorted among filesystem routes
    Normal,
}

/// Where a redirect points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A route of this site, interpolated with the source's params
    Internal(RouteTemplate),
    /// An absolute `http(s)://` URL, issued verbatim
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    destination: Destination,
    status: u16,
    base_prefix: String,
    trailing_slash: TrailingSlash,
}

impl RedirectTarget {
    pub(crate) fn new(
        destination: Destination,
        status: u16,
        base_prefix: String,
        trailing_slash: TrailingSlash,
    ) -> Self {
        Self {
            destination,
            status,
            base_prefix,
            trailing_slash,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Concrete `Location` for a request whose source params are `params`
    ///
    /// Returns `None` when an internal destination needs a param the
    /// request did not supply.
    pub fn location(&self, params: &Params) -> Option<String> {
        match &self.destination {
            Destination::External(url) => Some(url.clone()),
            Destination::Internal(template) => {
                let path = template.generate(params, self.trailing_slash)?;
                Some(format!("{}{}", self.base_prefix, path))
            }
        }
    }
}

/// One route of the manifest
///
/// Fields are private: a definition is immutable once built.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    template: RouteTemplate,
    route_string: String,
    component: String,
    kind: RouteKind,
    origin: RouteOrigin,
    static_params: Option<Vec<Params>>,
    priority: Option<InjectedPriority>,
    redirect: Option<RedirectTarget>,
    specificity: SpecificityScore,
    matcher: CompiledMatcher,
}

impl RouteDefinition {
    pub(crate) fn new(
        template: RouteTemplate,
        component: String,
        kind: RouteKind,
        origin: RouteOrigin,
        matcher: CompiledMatcher,
    ) -> Self {
        Self {
            route_string: template.route_string(),
            specificity: template.specificity(),
            template,
            component,
            kind,
            origin,
            static_params: None,
            priority: None,
            redirect: None,
            matcher,
        }
    }

    pub(crate) fn with_priority(mut self, priority: Option<InjectedPriority>) -> Self {
        self.priority = priority;
        self
    }

    pub(crate) fn with_redirect(mut self, redirect: RedirectTarget) -> Self {
        self.redirect = Some(redirect);
        self
    }

    pub(crate) fn with_static_params(mut self, static_params: Option<Vec<Params>>) -> Self {
        self.static_params = static_params;
        self
    }

    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    /// Lower-cased route string, e.g. `/blog/[...slug]`
    pub fn route_string(&self) -> &str {
        &self.route_string
    }

    /// Opaque handler reference owned by the renderer
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn origin(&self) -> RouteOrigin {
        self.origin
    }

    pub fn priority(&self) -> Option<InjectedPriority> {
        self.priority
    }

    pub fn static_params(&self) -> Option<&[Params]> {
        self.static_params.as_deref()
    }

    /// Whether concrete instances were enumerated ahead of time
    pub fn is_prerendered(&self) -> bool {
        self.static_params.is_some()
    }

    pub fn redirect(&self) -> Option<&RedirectTarget> {
        self.redirect.as_ref()
    }

    pub fn specificity(&self) -> &SpecificityScore {
        &self.specificity
    }

    pub fn matcher(&self) -> &CompiledMatcher {
        &self.matcher
    }

    /// Whether this route is ordered ahead of filesystem routes in legacy mode
    pub(crate) fn is_legacy_injected(&self) -> bool {
        self.origin == RouteOrigin::Injected && self.priority != Some(InjectedPriority::Normal)
    }
}

/// Ordered, immutable route collection for one build
#[derive(Debug, Clone, Default)]
pub struct RouteManifest {
    routes: Vec<RouteDefinition>,
    options: RoutingOptions,
}

impl RouteManifest {
    pub(crate) fn new(routes: Vec<RouteDefinition>, options: RoutingOptions) -> Self {
        Self { routes, options }
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteDefinition> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn options(&self) -> &RoutingOptions {
        &self.options
    }

    /// First route with the given route string
    pub fn get(&self, route_string: &str) -> Option<&RouteDefinition> {
        let wanted = route_string.to_lowercase();
        self.routes.iter().find(|r| r.route_string == wanted)
    }

    /// The custom not-found page, if the site defines `/404`
    pub fn not_found_route(&self) -> Option<&RouteDefinition> {
        self.routes
            .iter()
            .find(|r| r.kind != RouteKind::Redirect && r.route_string == "/404")
    }

    /// Every route matching `pathname`, in manifest order
    ///
    /// See [`match_all`](crate::match_all).
    pub fn match_all(&self, pathname: &str) -> Vec<MatchResult<'_>> {
        matcher::match_all(pathname, self)
    }

    /// Concrete pathnames of every prerendered route instance, base included
    pub fn static_pathnames(&self) -> Vec<String> {
        let base = self.options.base_prefix();
        self.routes
            .iter()
            .filter_map(|route| {
                let sets = route.static_params()?;
                let policy = route.matcher.trailing_slash();
                Some(
                    sets.iter()
                        .filter_map(|params| route.template.generate(params, policy))
                        .map(|path| format!("{}{}", base, path))
                        .collect::<Vec<_>>(),
                )
            })
            .flatten()
            .collect()
    }
}

impl<'a> IntoIterator for &'a RouteManifest {
    type Item = &'a RouteDefinition;
    type IntoIter = std::slice::Iter<'a, RouteDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
