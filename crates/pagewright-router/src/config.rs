//! Routing options shared by the manifest builder and the matcher

use serde::{Deserialize, Serialize};

use crate::manifest::RouteKind;

/// How the end of every compiled pattern treats a trailing `/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingSlash {
    /// `/foo/` does not match `/foo`
    Never,
    /// `/foo` does not match `/foo`; only `/foo/` does
    Always,
    /// Both forms match
    #[default]
    Ignore,
}

/// Manifest ordering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePriority {
    /// Kind first (endpoints, pages, redirects), injected routes ahead of files
    #[default]
    Legacy,
    /// Specificity only, across every origin and kind
    Global,
}

/// Routing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingOptions {
    #[serde(default)]
    pub trailing_slash: TrailingSlash,

    #[serde(default)]
    pub priority: RoutePriority,

    /// Base path every route lives under (e.g. "/docs")
    #[serde(default = "default_base")]
    pub base: String,

    /// Whether static segments match case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,

    /// File extensions (without the dot) that produce pages
    #[serde(default = "default_page_extensions")]
    pub page_extensions: Vec<String>,

    /// File extensions (without the dot) that produce endpoints
    #[serde(default = "default_endpoint_extensions")]
    pub endpoint_extensions: Vec<String>,
}

fn default_base() -> String {
    "/".to_string()
}

fn default_page_extensions() -> Vec<String> {
    ["astro", "md", "mdx", "html", "rsx"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_endpoint_extensions() -> Vec<String> {
    ["js", "ts", "rs"].iter().map(|ext| ext.to_string()).collect()
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            trailing_slash: TrailingSlash::default(),
            priority: RoutePriority::default(),
            base: default_base(),
            case_insensitive: false,
            page_extensions: default_page_extensions(),
            endpoint_extensions: default_endpoint_extensions(),
        }
    }
}

impl RoutingOptions {
    pub fn with_trailing_slash(mut self, trailing_slash: TrailingSlash) -> Self {
        self.trailing_slash = trailing_slash;
        self
    }

    pub fn with_priority(mut self, priority: RoutePriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Base path without its trailing slash; empty for the root base
    ///
    /// # Examples
    ///
    /// ```
    /// use pagewright_router::RoutingOptions;
    ///
    /// assert_eq!(RoutingOptions::default().base_prefix(), "");
    /// assert_eq!(RoutingOptions::default().with_base("/docs/").base_prefix(), "/docs");
    /// assert_eq!(RoutingOptions::default().with_base("docs").base_prefix(), "/docs");
    /// ```
    pub fn base_prefix(&self) -> String {
        let trimmed = self.base.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Route kind for a file extension, `None` when the extension is not routable
    pub fn kind_for_extension(&self, ext: &str) -> Option<RouteKind> {
        let ext = ext.trim_start_matches('.');
        let known = |list: &[String]| list.iter().any(|e| e.eq_ignore_ascii_case(ext));

        if known(&self.endpoint_extensions) {
            Some(RouteKind::Endpoint)
        } else if known(&self.page_extensions) {
            Some(RouteKind::Page)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RoutingOptions::default();
        assert_eq!(options.trailing_slash, TrailingSlash::Ignore);
        assert_eq!(options.priority, RoutePriority::Legacy);
        assert_eq!(options.base, "/");
        assert!(!options.case_insensitive);
    }

    #[test]
    fn test_kind_for_extension() {
        let options = RoutingOptions::default();
        assert_eq!(options.kind_for_extension("astro"), Some(RouteKind::Page));
        assert_eq!(options.kind_for_extension(".md"), Some(RouteKind::Page));
        assert_eq!(options.kind_for_extension("ts"), Some(RouteKind::Endpoint));
        assert_eq!(options.kind_for_extension("TS"), Some(RouteKind::Endpoint));
        assert_eq!(options.kind_for_extension("astro_tmp"), None);
    }

    #[test]
    fn test_enum_names_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            trailing_slash: TrailingSlash,
            priority: RoutePriority,
        }

        let parsed: Wrapper =
            serde_json::from_str(r#"{"trailing_slash":"never","priority":"global"}"#).unwrap();
        assert_eq!(parsed.trailing_slash, TrailingSlash::Never);
        assert_eq!(parsed.priority, RoutePriority::Global);
    }
}
