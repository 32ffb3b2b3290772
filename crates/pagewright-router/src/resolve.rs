//! Candidate resolution
//!
//! Narrows the raw matches of one request to the routes that can actually
//! answer it, keeping manifest order.

use crate::manifest::RouteKind;
use crate::matcher::MatchResult;
use crate::Params;

/// How the caller is serving the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// A live server: dynamic routes render on demand
    #[default]
    Server,
    /// Static output: only enumerated route instances exist
    StaticBuild,
}

/// Per-request resolution context
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    pub mode: RenderMode,
}

impl ResolveContext {
    pub fn server() -> Self {
        Self {
            mode: RenderMode::Server,
        }
    }

    pub fn static_build() -> Self {
        Self {
            mode: RenderMode::StaticBuild,
        }
    }
}

/// Filters `matches` to the routes able to serve the request
///
/// - redirects are always eligible
/// - a prerendered route is eligible when one of its static param sets
///   equals the extracted params
/// - a dynamic route is eligible in [`RenderMode::Server`]
///
/// Eligible candidates keep their manifest order: a prerendered instance is
/// never promoted above a more specific dynamic route.
///
/// # Examples
///
/// ```
/// use pagewright_router::{resolve, FileRoute, ManifestBuilder, ResolveContext, RoutingOptions};
///
/// let (manifest, _) = ManifestBuilder::new(RoutingOptions::default())
///     .with_file(FileRoute::new("[page].astro", "page"))
///     .build()
///     .unwrap();
///
/// let candidates = resolve(manifest.match_all("/hello"), &ResolveContext::server());
/// assert_eq!(candidates.len(), 1);
///
/// let candidates = resolve(manifest.match_all("/hello"), &ResolveContext::static_build());
/// assert!(candidates.is_empty());
/// ```
pub fn resolve<'m>(matches: Vec<MatchResult<'m>>, ctx: &ResolveContext) -> Vec<MatchResult<'m>> {
    matches
        .into_iter()
        .filter(|m| is_eligible(m, ctx))
        .collect()
}

fn is_eligible(result: &MatchResult<'_>, ctx: &ResolveContext) -> bool {
    let route = result.route;
    if route.kind() == RouteKind::Redirect {
        return true;
    }

    match route.static_params() {
        Some(sets) => sets.iter().any(|set| same_params(set, &result.params)),
        None => ctx.mode == RenderMode::Server,
    }
}

/// Param equality where an empty value counts as absent
fn same_params(declared: &Params, extracted: &Params) -> bool {
    present_pairs(declared) == present_pairs(extracted)
}

fn present_pairs(params: &Params) -> Vec<(&String, &String)> {
    let mut pairs: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    pairs.sort();
    pairs
}

impl MatchResult<'_> {
    /// `Location` for a matched redirect, params substituted by name
    ///
    /// Substituted values are percent-encoded again, so a request for
    /// `/more/old/%E2%80%99` redirected to `/more/[dynamic]` yields
    /// `/more/%E2%80%99`.
    pub fn redirect_location(&self) -> Option<String> {
        self.route.redirect()?.location(&self.params)
    }

    pub fn redirect_status(&self) -> Option<u16> {
        self.route.redirect().map(|target| target.status())
    }
}
