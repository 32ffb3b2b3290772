/// Route template parsing
///
/// Turns a file path (`blog/[slug]`, extension already stripped) or a user
/// pattern (`/blog/[...slug]`) into a [`RouteTemplate`]. All functions are
/// **pure**: same input, same output, no side effects.

use std::collections::HashMap;

use super::pattern::{classify_segment, PathSegment};
use crate::config::TrailingSlash;
use crate::error::{Result, RouteError};
use crate::path::has_file_extension;

/// Ordered segment list plus the source directory depth
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteTemplate {
    segments: Vec<PathSegment>,
    depth: usize,
}

/// Fold accumulator for segment-by-segment parsing
///
/// The first error short-circuits every later segment.
struct ParseState<'a> {
    source: &'a str,
    segments: Vec<PathSegment>,
}

impl<'a> ParseState<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            segments: Vec::new(),
        }
    }

    fn with_segment(mut self, segment: &str) -> Result<Self> {
        if self.segments.last().is_some_and(PathSegment::is_rest) {
            return Err(RouteError::malformed(
                self.source,
                "a rest parameter must be the last segment",
            ));
        }
        self.segments.push(classify_segment(segment, self.source)?);
        Ok(self)
    }

    fn finalize(self, depth: usize) -> RouteTemplate {
        RouteTemplate {
            segments: self.segments,
            depth,
        }
    }
}

impl RouteTemplate {
    /// Builds a template from already-classified segments
    ///
    /// Fails when a rest segment is not last.
    pub fn new(segments: Vec<PathSegment>, depth: usize) -> Result<Self> {
        let misplaced = segments
            .iter()
            .rev()
            .skip(1)
            .any(PathSegment::is_rest);

        if misplaced {
            let display = join_display(&segments);
            return Err(RouteError::malformed(
                &display,
                "a rest parameter must be the last segment",
            ));
        }

        Ok(Self { segments, depth })
    }

    /// Parses a user-declared pattern such as `/blog/[...slug]`
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::RouteTemplate;
    ///
    /// let template = RouteTemplate::parse("/blog/[...slug]").unwrap();
    /// assert_eq!(template.route_string(), "/blog/[...slug]");
    /// assert_eq!(template.params(), vec!["slug"]);
    ///
    /// assert!(RouteTemplate::parse("/[...slug]/edit").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let state = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .try_fold(ParseState::new(pattern), ParseState::with_segment)?;

        let depth = state.segments.len().saturating_sub(1);
        Ok(state.finalize(depth))
    }

    /// Parses a routes-root-relative file path with its extension stripped
    ///
    /// A final `index` segment collapses onto its parent directory. The
    /// depth is the number of separators before the final path component.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::RouteTemplate;
    ///
    /// let template = RouteTemplate::from_file_path("blog/index").unwrap();
    /// assert_eq!(template.route_string(), "/blog");
    /// assert_eq!(template.depth(), 1);
    ///
    /// let template = RouteTemplate::from_file_path("index").unwrap();
    /// assert_eq!(template.route_string(), "/");
    /// ```
    pub fn from_file_path(relative_path: &str) -> Result<Self> {
        let normalized = relative_path.replace('\\', "/");
        let components: Vec<&str> = normalized
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let depth = components.len().saturating_sub(1);
        let routed = match components.split_last() {
            Some((&"index", parents)) => parents,
            _ => &components[..],
        };

        let state = routed
            .iter()
            .copied()
            .try_fold(ParseState::new(relative_path), ParseState::with_segment)?;

        Ok(state.finalize(depth))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Source directory nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parameter names in positional order
    pub fn params(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(PathSegment::param_name)
            .collect()
    }

    /// Whether every segment is static (the index route counts)
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(PathSegment::is_static)
    }

    /// Normalized lower-case representation, e.g. `/blog/[...slug]`
    pub fn route_string(&self) -> String {
        self.display_string().to_lowercase()
    }

    /// Representation with the original static case
    pub fn display_string(&self) -> String {
        join_display(&self.segments)
    }

    /// Concrete pathname of a fully static template
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::RouteTemplate;
    ///
    /// assert_eq!(RouteTemplate::parse("/about").unwrap().pathname(), Some("/about".to_string()));
    /// assert_eq!(RouteTemplate::parse("/[id]").unwrap().pathname(), None);
    /// ```
    pub fn pathname(&self) -> Option<String> {
        self.is_static().then(|| self.display_string())
    }

    /// Whether the final static segment carries a file extension (`/robots.txt`)
    pub fn has_file_extension(&self) -> bool {
        match self.segments.last() {
            Some(PathSegment::Static(text)) => has_file_extension(text),
            _ => false,
        }
    }

    /// Structural equality: same length, same kinds, same static text
    pub fn same_shape(&self, other: &RouteTemplate) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Generates a concrete path by substituting `params` (pure function)
    ///
    /// Parameter values are percent-encoded per path component; an empty or
    /// missing rest value drops its segment. Returns `None` when a dynamic
    /// parameter is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::{RouteTemplate, TrailingSlash};
    /// use std::collections::HashMap;
    ///
    /// let template = RouteTemplate::parse("/more/[dynamic]").unwrap();
    /// let mut params = HashMap::new();
    /// params.insert("dynamic".to_string(), "\u{2019}".to_string());
    ///
    /// let path = template.generate(&params, TrailingSlash::Ignore).unwrap();
    /// assert_eq!(path, "/more/%E2%80%99");
    /// ```
    pub fn generate(
        &self,
        params: &HashMap<String, String>,
        trailing_slash: TrailingSlash,
    ) -> Option<String> {
        let parts: Option<Vec<String>> = self
            .segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Static(text) => Some(text.clone()),
                PathSegment::Dynamic(name) => params
                    .get(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| urlencoding::encode(value).into_owned()),
                PathSegment::Rest { name, .. } => Some(
                    params
                        .get(name)
                        .map(|value| {
                            value
                                .split('/')
                                .filter(|s| !s.is_empty())
                                .map(|s| urlencoding::encode(s).into_owned())
                                .collect::<Vec<_>>()
                                .join("/")
                        })
                        .unwrap_or_default(),
                ),
            })
            .collect();

        let joined = parts?
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        let path = format!("/{}", joined);
        Some(match trailing_slash {
            TrailingSlash::Always if path != "/" && !self.has_file_extension() => {
                format!("{}/", path)
            }
            _ => path,
        })
    }
}

fn join_display(segments: &[PathSegment]) -> String {
    let joined = segments
        .iter()
        .map(PathSegment::display)
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}
