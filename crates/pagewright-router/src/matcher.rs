//! Request-time matching
//!
//! [`match_all`] only reads the manifest. Everything it learns about a
//! request lives in the returned [`MatchResult`]s, so any number of requests
//! can match against one shared manifest at once.

use crate::manifest::{RouteDefinition, RouteManifest};
use crate::path::{decode_pathname, matchable_path, strip_base, strip_html_suffix};
use crate::Params;

/// One route that matched a request, with the values extracted for it
#[derive(Debug, Clone)]
pub struct MatchResult<'m> {
    pub route: &'m RouteDefinition,
    /// Decoded parameter values keyed by name
    pub params: Params,
    /// Pathname the route matched, base removed
    pub resolved_pathname: String,
}

/// Every route matching `pathname`, in manifest order
///
/// The pathname has the configured base removed and is percent-decoded
/// before matching, except for reserved escapes such as `%2F`; captured
/// values are decoded afterwards. Paths outside the base match nothing. A `.html` request
/// is first tried without its suffix. An empty result means "not found".
///
/// # Examples
///
/// ```
/// use pagewright_router::{match_all, FileRoute, ManifestBuilder, RoutingOptions};
///
/// let (manifest, _) = ManifestBuilder::new(RoutingOptions::default())
///     .with_file(FileRoute::new("[dynamic].astro", "dynamic"))
///     .with_file(FileRoute::new("[...rest].astro", "rest"))
///     .with_file(FileRoute::new("static.astro", "static"))
///     .build()
///     .unwrap();
///
/// let matches = match_all("/foo", &manifest);
/// let routes: Vec<&str> = matches.iter().map(|m| m.route.route_string()).collect();
/// assert_eq!(routes, vec!["/[dynamic]", "/[...rest]"]);
/// assert_eq!(matches[0].params["dynamic"], "foo");
/// ```
pub fn match_all<'m>(pathname: &str, manifest: &'m RouteManifest) -> Vec<MatchResult<'m>> {
    let base = manifest.options().base_prefix();
    let decoded = decode_pathname(pathname);
    let Some(path) = strip_base(&decoded, &base) else {
        return Vec::new();
    };

    manifest
        .iter()
        .filter_map(|route| match_route(route, path))
        .collect()
}

fn match_route<'m>(route: &'m RouteDefinition, path: &str) -> Option<MatchResult<'m>> {
    let matcher = route.matcher();
    let policy = matcher.trailing_slash();

    let html_stem = strip_html_suffix(path, policy);
    let candidates = html_stem.as_deref().into_iter().chain(std::iter::once(path));

    candidates.into_iter().find_map(|candidate| {
        let params = matcher.captures(matchable_path(candidate, policy))?;
        let resolved_pathname = if candidate.is_empty() { "/" } else { candidate };
        Some(MatchResult {
            route,
            params,
            resolved_pathname: resolved_pathname.to_string(),
        })
    })
}
