//! Build-time failures of the routing core
//!
//! Every variant aborts `build_manifest`; no partial manifest is produced.
//! Route collisions are not errors: they surface as warning [`LogRecord`]s.
//!
//! [`LogRecord`]: crate::LogRecord

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Unbalanced brackets, a misplaced rest segment, an invalid parameter name
    #[error("Invalid route {template}: {reason}")]
    MalformedTemplate { template: String, reason: String },

    /// Redirect destination does not name any page or endpoint of the site
    #[error("The redirect from \"{source_route}\" points to \"{destination}\", which is not a route of this site")]
    UnresolvableRedirectTarget {
        source_route: String,
        destination: String,
    },

    /// Destination carries a URL scheme other than http(s)
    #[error("The redirect from \"{source_route}\" to \"{destination}\" is not supported: external redirects must use http:// or https://")]
    UnsupportedExternalRedirect {
        source_route: String,
        destination: String,
    },

    #[error("The redirect from \"{source_route}\" uses status {status}; expected a 3xx redirect status")]
    InvalidRedirectStatus { source_route: String, status: u16 },
}

impl RouteError {
    pub(crate) fn malformed(template: &str, reason: impl Into<String>) -> Self {
        RouteError::MalformedTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_template() {
        let err = RouteError::malformed("blog/[slug", "brackets are unbalanced");
        assert_eq!(
            err.to_string(),
            "Invalid route blog/[slug: brackets are unbalanced"
        );
    }

    #[test]
    fn test_redirect_status_message() {
        let err = RouteError::InvalidRedirectStatus {
            source_route: "/old".to_string(),
            status: 200,
        };
        assert!(err.to_string().contains("status 200"));
    }
}
