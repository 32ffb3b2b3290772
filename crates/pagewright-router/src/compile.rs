//! Pattern compilation
//!
//! Each template compiles once, at manifest build time, into an anchored
//! regex. Matching never allocates beyond the returned params.

use regex::Regex;

use crate::config::TrailingSlash;
use crate::error::{Result, RouteError};
use crate::path::{decode_component, decode_pathname};
use crate::route::{PathSegment, RouteTemplate};
use crate::Params;

/// Positional capture slot
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Dynamic(String),
    Rest(String),
}

/// Anchored matcher plus parameter names in capture order
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    regex: Regex,
    slots: Vec<Slot>,
    trailing_slash: TrailingSlash,
}

/// Trailing-slash policy a template is compiled with
///
/// Routes whose last segment names a file (`/robots.txt`) accept both forms.
pub fn effective_policy(template: &RouteTemplate, configured: TrailingSlash) -> TrailingSlash {
    if template.has_file_extension() {
        TrailingSlash::Ignore
    } else {
        configured
    }
}

impl CompiledMatcher {
    /// Compiles `template` under the given trailing-slash policy
    ///
    /// | segment | source |
    /// |---|---|
    /// | Static | `/` + escaped decoded text |
    /// | Dynamic | `/([^/]+?)` |
    /// | Rest | `(?:/(.*?))?` |
    ///
    /// The end anchor is `$`, `/$` or `/?$` for never, always and ignore.
    /// The index route compiles to `^$`, `^/$` or `^/?$`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::{CompiledMatcher, RouteTemplate, TrailingSlash};
    ///
    /// let index = RouteTemplate::parse("/").unwrap();
    /// let matcher = CompiledMatcher::compile(&index, TrailingSlash::Never, false).unwrap();
    /// assert!(matcher.matches(""));
    /// assert!(!matcher.matches("/"));
    /// ```
    pub fn compile(
        template: &RouteTemplate,
        trailing_slash: TrailingSlash,
        case_insensitive: bool,
    ) -> Result<Self> {
        let mut source = String::from(if case_insensitive { "(?i)^" } else { "^" });
        let mut slots = Vec::new();

        if template.segments().is_empty() {
            source.push_str(match trailing_slash {
                TrailingSlash::Never => "$",
                TrailingSlash::Always => "/$",
                TrailingSlash::Ignore => "/?$",
            });
        } else {
            for segment in template.segments() {
                match segment {
                    PathSegment::Static(text) => {
                        source.push('/');
                        source.push_str(&regex::escape(&decode_pathname(text)));
                    }
                    PathSegment::Dynamic(name) => {
                        source.push_str("/([^/]+?)");
                        slots.push(Slot::Dynamic(name.clone()));
                    }
                    PathSegment::Rest { name, optional } => {
                        source.push_str(if *optional { "(?:/(.*?))?" } else { "/(.+?)" });
                        slots.push(Slot::Rest(name.clone()));
                    }
                }
            }
            source.push_str(match trailing_slash {
                TrailingSlash::Never => "$",
                TrailingSlash::Always => "/$",
                TrailingSlash::Ignore => "/?$",
            });
        }

        let regex = Regex::new(&source).map_err(|err| {
            RouteError::malformed(&template.display_string(), err.to_string())
        })?;

        Ok(Self {
            regex,
            slots,
            trailing_slash,
        })
    }

    pub fn matches(&self, pathname: &str) -> bool {
        self.regex.is_match(pathname)
    }

    /// Extracts params from a matching pathname, `None` when it does not match
    ///
    /// Rest values are trimmed of surrounding slashes; an empty or absent
    /// rest capture is left out of the map.
    pub fn captures(&self, pathname: &str) -> Option<Params> {
        let caps = self.regex.captures(pathname)?;

        let params = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let value = caps.get(i + 1).map(|m| m.as_str());
                match slot {
                    Slot::Dynamic(name) => value.map(|v| (name.clone(), decode_component(v))),
                    Slot::Rest(name) => value
                        .map(|v| v.trim_matches('/'))
                        .filter(|v| !v.is_empty())
                        .map(|v| (name.clone(), decode_component(v))),
                }
            })
            .collect();

        Some(params)
    }

    /// Policy the pattern was compiled with
    pub fn trailing_slash(&self) -> TrailingSlash {
        self.trailing_slash
    }

    /// Regex source, for diagnostics
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
