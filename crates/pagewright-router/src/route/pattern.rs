/// Pattern parsing for route segments
///
/// Pure parsing of a single path segment (`about`, `[id]`, `[...slug]`) into
/// a typed [`PathSegment`]. Same input, same output, no side effects.

use crate::error::{Result, RouteError};

/// One unit of a route template
///
/// # Examples
///
/// ```
/// use pagewright_router::route::pattern::{classify_segment, PathSegment};
///
/// let seg = classify_segment("about", "about").unwrap();
/// assert!(matches!(seg, PathSegment::Static(_)));
///
/// let seg = classify_segment("[id]", "users/[id]").unwrap();
/// assert_eq!(seg, PathSegment::Dynamic("id".to_string()));
///
/// let seg = classify_segment("[...slug]", "docs/[...slug]").unwrap();
/// assert!(matches!(seg, PathSegment::Rest { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Literal text, original case retained for display
    Static(String),
    /// `[name]`: exactly one non-empty path component
    Dynamic(String),
    /// `[...name]`: zero or more path components; only valid as the last segment
    Rest { name: String, optional: bool },
}

impl PathSegment {
    /// Parameter bound by this segment, if any
    pub fn param_name(&self) -> Option<&str> {
        match self {
            PathSegment::Static(_) => None,
            PathSegment::Dynamic(name) | PathSegment::Rest { name, .. } => Some(name),
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, PathSegment::Static(_))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, PathSegment::Rest { .. })
    }

    /// Segment in route-string form, e.g. `[id]` or `[...slug]`
    pub fn display(&self) -> String {
        match self {
            PathSegment::Static(text) => text.clone(),
            PathSegment::Dynamic(name) => format!("[{}]", name),
            PathSegment::Rest { name, .. } => format!("[...{}]", name),
        }
    }

    /// Structural equality ignoring parameter names and static case
    ///
    /// `[bar]` and `[baz]` are the same shape; `about` and `About` too.
    pub fn same_shape(&self, other: &PathSegment) -> bool {
        match (self, other) {
            (PathSegment::Static(a), PathSegment::Static(b)) => a.to_lowercase() == b.to_lowercase(),
            (PathSegment::Dynamic(_), PathSegment::Dynamic(_)) => true,
            (PathSegment::Rest { .. }, PathSegment::Rest { .. }) => true,
            _ => false,
        }
    }
}

/// Classifies a segment into a [`PathSegment`] (pure function)
///
/// `template` is only used to name the offending route in errors.
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Balanced brackets**: `[` and `]` counts must agree
/// 2. **Separated params**: `][` is rejected
/// 3. **Rest**: `[...name]`
/// 4. **Dynamic**: `[name]`
/// 5. **Static**: text without brackets
///
/// Brackets mixed with static text (`a-[b]`, `x[...rest]`) are rejected: a
/// segment is wholly static, dynamic or rest.
pub fn classify_segment(segment: &str, template: &str) -> Result<PathSegment> {
    if segment.matches('[').count() != segment.matches(']').count() {
        return Err(RouteError::malformed(template, "brackets are unbalanced"));
    }
    if segment.contains("][") {
        return Err(RouteError::malformed(template, "parameters must be separated"));
    }

    let whole = segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .filter(|inner| !inner.contains('[') && !inner.contains(']'));

    match whole {
        Some(inner) => match inner.strip_prefix("...") {
            Some(name) => Ok(PathSegment::Rest {
                name: validate_param_name(name, template)?,
                optional: true,
            }),
            None => Ok(PathSegment::Dynamic(validate_param_name(inner, template)?)),
        },
        None if segment.contains("[...") => Err(RouteError::malformed(
            template,
            "rest parameter must be a standalone segment",
        )),
        None if segment.contains('[') => Err(RouteError::malformed(
            template,
            format!("parameter in \"{}\" must be a standalone segment", segment),
        )),
        None => Ok(PathSegment::Static(segment.to_string())),
    }
}

/// Parameter names must match `/^[a-zA-Z0-9_$]+$/`
fn validate_param_name(name: &str, template: &str) -> Result<String> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if valid {
        Ok(name.to_string())
    } else {
        Err(RouteError::malformed(
            template,
            "parameter name must match /^[a-zA-Z0-9_$]+$/",
        ))
    }
}
