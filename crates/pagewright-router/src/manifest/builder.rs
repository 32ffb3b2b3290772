/// Manifest construction
///
/// Merges filesystem routes, injected routes and redirect rules into one
/// sorted [`RouteManifest`]. Fatal problems abort with a [`RouteError`];
/// collisions and skipped files come back as warning [`LogRecord`]s.

use std::cmp::Ordering;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::collision::detect_collisions;
use super::sources::{FileRoute, InjectedRoute, RedirectRule, StaticPaths};
use super::{
    Destination, RedirectTarget, RouteDefinition, RouteKind, RouteManifest, RouteOrigin,
};
use crate::compile::{effective_policy, CompiledMatcher};
use crate::config::{RoutePriority, RoutingOptions, TrailingSlash};
use crate::error::{Result, RouteError};
use crate::log::{LogRecord, ROUTER_LABEL, STATIC_PATHS_LABEL};
use crate::route::RouteTemplate;

// `scheme:` prefix of an absolute URL
static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").expect("scheme regex is valid"));

/// Functional builder for a [`RouteManifest`]
///
/// # Examples
///
/// ```
/// use pagewright_router::{FileRoute, ManifestBuilder, RedirectRule, RoutingOptions};
///
/// let (manifest, warnings) = ManifestBuilder::new(RoutingOptions::default())
///     .with_file(FileRoute::new("index.astro", "src/pages/index.astro"))
///     .with_file(FileRoute::new("blog/[slug].md", "src/pages/blog/[slug].md"))
///     .with_redirect(RedirectRule::new("/old", "/"))
///     .build()
///     .unwrap();
///
/// assert_eq!(manifest.len(), 3);
/// assert!(warnings.is_empty());
/// ```
pub struct ManifestBuilder<'a> {
    options: RoutingOptions,
    files: Vec<FileRoute>,
    injected: Vec<InjectedRoute>,
    redirects: Vec<RedirectRule>,
    static_paths: Box<dyn StaticPaths + 'a>,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(options: RoutingOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
            injected: Vec::new(),
            redirects: Vec::new(),
            static_paths: Box::new(()),
        }
    }

    pub fn with_file(mut self, file: FileRoute) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_files<I>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = FileRoute>,
    {
        self.files.extend(files);
        self
    }

    pub fn with_injected(mut self, route: InjectedRoute) -> Self {
        self.injected.push(route);
        self
    }

    pub fn with_injected_routes<I>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = InjectedRoute>,
    {
        self.injected.extend(routes);
        self
    }

    pub fn with_redirect(mut self, rule: RedirectRule) -> Self {
        self.redirects.push(rule);
        self
    }

    pub fn with_redirects<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RedirectRule>,
    {
        self.redirects.extend(rules);
        self
    }

    /// Supplies the static-path-generation collaborator
    pub fn with_static_paths(mut self, static_paths: impl StaticPaths + 'a) -> Self {
        self.static_paths = Box::new(static_paths);
        self
    }

    /// Builds the sorted manifest plus its warning records
    pub fn build(self) -> Result<(RouteManifest, Vec<LogRecord>)> {
        let mut warnings = Vec::new();

        let mut routes = Vec::with_capacity(self.files.len() + self.injected.len());
        for file in &self.files {
            match self.file_route(file)? {
                Some(route) => routes.push(route),
                None => warnings.push(LogRecord::warn(
                    ROUTER_LABEL,
                    format!(
                        "Unsupported file type {} found. Prefix filename with an underscore (`_`) to ignore.",
                        file.path
                    ),
                )),
            }
        }
        for injected in &self.injected {
            routes.push(self.injected_route(injected)?);
        }

        let routes = routes
            .into_iter()
            .map(|route| self.attach_static_params(route, &mut warnings))
            .collect::<Vec<_>>();

        let sources = self
            .redirects
            .iter()
            .map(|rule| RouteTemplate::parse(&rule.source).map(|t| (rule, t)))
            .collect::<Result<Vec<_>>>()?;

        let shadowed: HashSet<String> = sources.iter().map(|(_, t)| t.route_string()).collect();
        let mut routes: Vec<RouteDefinition> = routes
            .into_iter()
            .filter(|route| {
                let keep = route.origin() != RouteOrigin::Filesystem
                    || !shadowed.contains(route.route_string());
                if !keep {
                    tracing::debug!(
                        route = route.route_string(),
                        component = route.component(),
                        "file route replaced by a redirect"
                    );
                }
                keep
            })
            .collect();

        let redirects = sources
            .into_iter()
            .map(|(rule, source)| self.redirect_route(rule, source, &routes))
            .collect::<Result<Vec<_>>>()?;
        routes.extend(redirects);

        let priority = self.options.priority;
        routes.sort_by(|a, b| compare_routes(a, b, priority));

        warnings.extend(detect_collisions(&routes));

        tracing::debug!(routes = routes.len(), "route manifest built");
        Ok((RouteManifest::new(routes, self.options), warnings))
    }

    /// `None` when the extension is neither a page nor an endpoint extension
    fn file_route(&self, file: &FileRoute) -> Result<Option<RouteDefinition>> {
        let normalized = file.path.replace('\\', "/");
        let name_start = normalized.rfind('/').map_or(0, |i| i + 1);

        let split = normalized[name_start..]
            .rfind('.')
            .filter(|&dot| dot > 0)
            .map(|dot| normalized.split_at(name_start + dot));

        let Some((stem, ext)) = split else {
            return Ok(None);
        };
        let Some(kind) = self.options.kind_for_extension(ext) else {
            return Ok(None);
        };

        let template = RouteTemplate::from_file_path(stem)?;
        let matcher = self.compile(&template)?;
        Ok(Some(RouteDefinition::new(
            template,
            file.component.clone(),
            kind,
            RouteOrigin::Filesystem,
            matcher,
        )))
    }

    fn injected_route(&self, injected: &InjectedRoute) -> Result<RouteDefinition> {
        if injected.kind == RouteKind::Redirect {
            return Err(RouteError::malformed(
                &injected.pattern,
                "injected routes must be pages or endpoints; declare redirects as redirect rules",
            ));
        }

        let template = RouteTemplate::parse(&injected.pattern)?;
        let matcher = self.compile(&template)?;
        Ok(RouteDefinition::new(
            template,
            injected.component.clone(),
            injected.kind,
            RouteOrigin::Injected,
            matcher,
        )
        .with_priority(injected.priority))
    }

    fn attach_static_params(
        &self,
        route: RouteDefinition,
        warnings: &mut Vec<LogRecord>,
    ) -> RouteDefinition {
        let sets = self.static_paths.static_params(route.route_string());

        let empty_values = sets
            .iter()
            .flatten()
            .flat_map(|params| params.iter())
            .filter(|(_, value)| value.is_empty());
        for (name, _) in empty_values {
            warnings.push(LogRecord::warn(
                STATIC_PATHS_LABEL,
                format!(
                    "[{}] `undefined` expected for an optional param, but got empty string for \"{}\".",
                    route.route_string(),
                    name
                ),
            ));
        }

        route.with_static_params(sets)
    }

    fn redirect_route(
        &self,
        rule: &RedirectRule,
        source: RouteTemplate,
        routes: &[RouteDefinition],
    ) -> Result<RouteDefinition> {
        if !(300..=308).contains(&rule.status) {
            return Err(RouteError::InvalidRedirectStatus {
                source_route: rule.source.clone(),
                status: rule.status,
            });
        }

        let (destination, policy) = if SCHEME_REGEX.is_match(&rule.destination) {
            let lower = rule.destination.to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(RouteError::UnsupportedExternalRedirect {
                    source_route: rule.source.clone(),
                    destination: rule.destination.clone(),
                });
            }
            (
                Destination::External(rule.destination.clone()),
                self.options.trailing_slash,
            )
        } else {
            let template = RouteTemplate::parse(&rule.destination)?;
            let unresolvable = || RouteError::UnresolvableRedirectTarget {
                source_route: rule.source.clone(),
                destination: rule.destination.clone(),
            };

            let source_params = source.params();
            if !template.params().iter().all(|p| source_params.contains(p)) {
                return Err(unresolvable());
            }
            if !routes.iter().any(|route| resolves_to(route, &template)) {
                return Err(unresolvable());
            }

            let policy = effective_policy(&template, self.options.trailing_slash);
            (Destination::Internal(template), policy)
        };

        let matcher = self.compile(&source)?;
        let target = RedirectTarget::new(
            destination,
            rule.status,
            self.options.base_prefix(),
            policy,
        );
        Ok(RouteDefinition::new(
            source,
            rule.source.clone(),
            RouteKind::Redirect,
            RouteOrigin::Redirect,
            matcher,
        )
        .with_redirect(target))
    }

    fn compile(&self, template: &RouteTemplate) -> Result<CompiledMatcher> {
        CompiledMatcher::compile(
            template,
            effective_policy(template, self.options.trailing_slash),
            self.options.case_insensitive,
        )
    }
}

/// Builds a manifest from the three route sources
///
/// Equivalent to [`ManifestBuilder`] without static paths.
pub fn build_manifest<F, I, R>(
    files: F,
    injected: I,
    redirects: R,
    options: RoutingOptions,
) -> Result<(RouteManifest, Vec<LogRecord>)>
where
    F: IntoIterator<Item = FileRoute>,
    I: IntoIterator<Item = InjectedRoute>,
    R: IntoIterator<Item = RedirectRule>,
{
    ManifestBuilder::new(options)
        .with_files(files)
        .with_injected_routes(injected)
        .with_redirects(redirects)
        .build()
}

/// Whether an internal redirect destination names `route`
///
/// Dynamic destinations must share the route's shape; static ones may also
/// land on a dynamic route that matches them.
fn resolves_to(route: &RouteDefinition, destination: &RouteTemplate) -> bool {
    if route.kind() == RouteKind::Redirect {
        return false;
    }
    if route.template().same_shape(destination) {
        return true;
    }

    let Some(pathname) = destination.pathname() else {
        return false;
    };
    let matcher = route.matcher();
    let candidate = match matcher.trailing_slash() {
        TrailingSlash::Never if pathname == "/" => String::new(),
        TrailingSlash::Always if pathname != "/" => format!("{}/", pathname),
        _ => pathname,
    };
    matcher.matches(&candidate)
}

/// Manifest sort order; `sort_by` is stable so equal keys keep declaration order
fn compare_routes(a: &RouteDefinition, b: &RouteDefinition, priority: RoutePriority) -> Ordering {
    match priority {
        RoutePriority::Legacy => {
            let origin_rank = |r: &RouteDefinition| u8::from(!r.is_legacy_injected());
            a.kind()
                .rank()
                .cmp(&b.kind().rank())
                .then_with(|| origin_rank(a).cmp(&origin_rank(b)))
                .then_with(|| a.specificity().shape().cmp(b.specificity().shape()))
        }
        RoutePriority::Global => a
            .specificity()
            .cmp(b.specificity())
            .then_with(|| a.kind().rank().cmp(&b.kind().rank())),
    }
}
