/// Request path utilities
///
/// All functions are **pure**: same input, same output, no side effects.
/// Functions that usually leave their input untouched return `Cow` so the
/// common case borrows.

use std::borrow::Cow;

use crate::config::TrailingSlash;

/// Escapes that stay encoded while a pathname is matched
///
/// Decoding `%2F` would split one segment in two; decoding `%25` would let
/// a captured value be decoded a second time.
const RESERVED_ESCAPES: &[u8] = b";/?:@&=+$,#%";

/// Whether the last path component ends in a file extension (`robots.txt`)
///
/// A leading dot (`.well-known`) is not an extension.
///
/// # Examples
///
/// ```
/// use pagewright_router::path::has_file_extension;
///
/// assert!(has_file_extension("/robots.txt"));
/// assert!(has_file_extension("feed.xml"));
/// assert!(!has_file_extension("/about"));
/// assert!(!has_file_extension("/.well-known"));
/// assert!(!has_file_extension("/file."));
/// ```
pub fn has_file_extension(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rfind('.') {
        Some(0) | None => false,
        Some(dot) => {
            let ext = &last[dot + 1..];
            !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
    }
}

/// Removes the configured base from a request path
///
/// `base_prefix` is the normalized base (`""` or `/docs`). The bare root
/// comes back as `""`: that is the exact base, or `/` when there is no base.
/// A slash after the base is kept (`/docs/` gives `/`), so the index route
/// sees the trailing-slash policy the same way nested routes do. Returns
/// `None` when the path lives outside the base.
///
/// # Examples
///
/// ```
/// use pagewright_router::path::strip_base;
///
/// assert_eq!(strip_base("/docs/intro", "/docs"), Some("/intro"));
/// assert_eq!(strip_base("/docs", "/docs"), Some(""));
/// assert_eq!(strip_base("/docs/", "/docs"), Some("/"));
/// assert_eq!(strip_base("/docsify", "/docs"), None);
/// assert_eq!(strip_base("/about", ""), Some("/about"));
/// ```
pub fn strip_base<'a>(path: &'a str, base_prefix: &str) -> Option<&'a str> {
    if base_prefix.is_empty() {
        return Some(if path == "/" { "" } else { path });
    }

    let rest = path.strip_prefix(base_prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Percent-decodes a pathname for matching
///
/// Reserved escapes such as `%2F` stay encoded so an encoded slash remains
/// part of its segment; [`decode_component`] decodes captured values fully.
/// Keeps the raw text when decoding fails.
///
/// # Examples
///
/// ```
/// use pagewright_router::path::decode_pathname;
///
/// assert_eq!(decode_pathname("/more/%E2%80%99"), "/more/\u{2019}");
/// assert_eq!(decode_pathname("/blog/a%2Fb"), "/blog/a%2Fb");
/// assert_eq!(decode_pathname("/plain"), "/plain");
/// assert_eq!(decode_pathname("/bad/%FF"), "/bad/%FF");
/// ```
pub fn decode_pathname(path: &str) -> Cow<'_, str> {
    if !path.contains('%') {
        return Cow::Borrowed(path);
    }

    let bytes = path.as_bytes();
    let mut decoded = String::with_capacity(path.len());
    let mut chunk_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_reserved_escape(bytes, i) {
            i += 1;
            continue;
        }
        // Reserved escapes are ASCII, so no UTF-8 sequence spans a chunk boundary
        let Ok(chunk) = urlencoding::decode(&path[chunk_start..i]) else {
            return Cow::Borrowed(path);
        };
        decoded.push_str(&chunk);
        decoded.push_str(&path[i..i + 3]);
        i += 3;
        chunk_start = i;
    }

    match urlencoding::decode(&path[chunk_start..]) {
        Ok(chunk) => {
            decoded.push_str(&chunk);
            Cow::Owned(decoded)
        }
        Err(_) => Cow::Borrowed(path),
    }
}

/// Whether a `%XX` escape of a reserved character starts at `at`
fn is_reserved_escape(bytes: &[u8], at: usize) -> bool {
    if bytes[at] != b'%' {
        return false;
    }
    let Some(hex) = bytes.get(at + 1..at + 3) else {
        return false;
    };
    if !hex.iter().all(u8::is_ascii_hexdigit) {
        return false;
    }

    std::str::from_utf8(hex)
        .ok()
        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        .is_some_and(|byte| RESERVED_ESCAPES.contains(&byte))
}

/// Fully percent-decodes one captured value, keeping the raw text on failure
///
/// # Examples
///
/// ```
/// use pagewright_router::path::decode_component;
///
/// assert_eq!(decode_component("a%2Fb"), "a/b");
/// assert_eq!(decode_component("100%25"), "100%");
/// assert_eq!(decode_component("%FF"), "%FF");
/// ```
pub fn decode_component(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Path in the form compiled patterns expect
///
/// The bare root `""` from [`strip_base`] is the slashless form of the
/// index route. Under [`TrailingSlash::Always`] it becomes `/`, since the
/// bare root has no other way to be requested. Every other path passes
/// through, so `/docs/` reaches the index pattern as `/` and `^$` rejects
/// it under [`TrailingSlash::Never`].
pub fn matchable_path(path: &str, trailing_slash: TrailingSlash) -> &str {
    match (path, trailing_slash) {
        ("", TrailingSlash::Always) => "/",
        _ => path,
    }
}

/// Maps a `.html` request onto the route it was built from
///
/// `/about.html` becomes `/about` and `/blog/index.html` becomes `/blog`,
/// re-shaped for the trailing-slash policy; `/index.html` becomes the bare
/// root `""`. Returns `None` when the path does not end in `.html` or when
/// the file name is only the suffix (`/.html`).
///
/// # Examples
///
/// ```
/// use pagewright_router::path::strip_html_suffix;
/// use pagewright_router::TrailingSlash;
///
/// assert_eq!(strip_html_suffix("/about.html", TrailingSlash::Never), Some("/about".to_string()));
/// assert_eq!(strip_html_suffix("/blog/index.html", TrailingSlash::Always), Some("/blog/".to_string()));
/// assert_eq!(strip_html_suffix("/index.html", TrailingSlash::Never), Some(String::new()));
/// assert_eq!(strip_html_suffix("/.html", TrailingSlash::Never), None);
/// assert_eq!(strip_html_suffix("/about", TrailingSlash::Never), None);
/// ```
pub fn strip_html_suffix(path: &str, trailing_slash: TrailingSlash) -> Option<String> {
    let stem = match path.strip_suffix("/index.html") {
        Some(stem) => stem,
        None => {
            let stem = path.strip_suffix(".html")?;
            if stem.is_empty() || stem.ends_with('/') {
                return None;
            }
            stem
        }
    };

    let stem = stem.trim_end_matches('/');
    if stem.is_empty() {
        return Some(String::new());
    }

    Some(match trailing_slash {
        TrailingSlash::Always => format!("{}/", stem),
        TrailingSlash::Never | TrailingSlash::Ignore => stem.to_string(),
    })
}

/// Collapses repeated leading and trailing slashes
///
/// Returns `Cow::Borrowed` when nothing changes, so callers can compare
/// against the input to decide on a redirect. Interior `//` is kept.
///
/// # Examples
///
/// ```
/// use pagewright_router::path::collapse_slashes;
/// use std::borrow::Cow;
///
/// assert!(matches!(collapse_slashes("/about"), Cow::Borrowed("/about")));
/// assert_eq!(collapse_slashes("//about"), "/about");
/// assert_eq!(collapse_slashes("/about//"), "/about/");
/// assert_eq!(collapse_slashes("///"), "/");
/// ```
pub fn collapse_slashes(path: &str) -> Cow<'_, str> {
    let leading_repeated = path.starts_with("//");
    let trailing_repeated = path.len() > 1 && path.ends_with("//");

    if !leading_repeated && !trailing_repeated {
        return Cow::Borrowed(path);
    }

    let inner = path.trim_matches('/');
    if inner.is_empty() {
        return Cow::Borrowed("/");
    }

    let mut collapsed = String::with_capacity(path.len());
    if path.starts_with('/') {
        collapsed.push('/');
    }
    collapsed.push_str(inner);
    if path.ends_with('/') {
        collapsed.push('/');
    }
    Cow::Owned(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_base_root() {
        assert_eq!(strip_base("/", ""), Some(""));
        assert_eq!(strip_base("/a/b", ""), Some("/a/b"));
    }

    #[test]
    fn test_strip_base_nested() {
        assert_eq!(strip_base("/docs", "/docs"), Some(""));
        assert_eq!(strip_base("/docs/", "/docs"), Some("/"));
        assert_eq!(strip_base("/docs/a/", "/docs"), Some("/a/"));
        assert_eq!(strip_base("/other", "/docs"), None);
    }

    #[test]
    fn test_decode_keeps_borrowed_without_escapes() {
        assert!(matches!(decode_pathname("/about"), Cow::Borrowed("/about")));
        assert_eq!(decode_pathname("/a%20b"), "/a b");
    }

    #[test]
    fn test_decode_keeps_reserved_escapes() {
        assert_eq!(decode_pathname("/blog/a%2fb%20c"), "/blog/a%2fb c");
        assert_eq!(decode_pathname("/100%25"), "/100%25");
        assert_eq!(decode_pathname("/a%3Fb/%E2%80%99"), "/a%3Fb/\u{2019}");
        assert_eq!(decode_pathname("/cut%2"), "/cut%2");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("a%2Fb"), "a/b");
        assert_eq!(decode_component("plain"), "plain");
    }

    #[test]
    fn test_matchable_path() {
        assert_eq!(matchable_path("", TrailingSlash::Never), "");
        assert_eq!(matchable_path("", TrailingSlash::Always), "/");
        assert_eq!(matchable_path("/", TrailingSlash::Never), "/");
        assert_eq!(matchable_path("/about", TrailingSlash::Never), "/about");
    }

    #[test]
    fn test_strip_html_suffix_ignore() {
        assert_eq!(
            strip_html_suffix("/docs/intro.html", TrailingSlash::Ignore),
            Some("/docs/intro".to_string())
        );
    }

    #[test]
    fn test_strip_html_suffix_needs_a_name() {
        assert_eq!(strip_html_suffix("/.html", TrailingSlash::Ignore), None);
        assert_eq!(strip_html_suffix("/docs/.html", TrailingSlash::Never), None);
        assert_eq!(strip_html_suffix(".html", TrailingSlash::Never), None);
    }

    #[test]
    fn test_collapse_slashes_keeps_interior() {
        assert!(matches!(collapse_slashes("/a//b"), Cow::Borrowed("/a//b")));
        assert_eq!(collapse_slashes("///a//b///"), "/a//b/");
    }

    #[test]
    fn test_has_file_extension_rejects_symbols() {
        assert!(!has_file_extension("/v1.0-beta/x"));
        assert!(has_file_extension("/v1.0-beta/x.json"));
    }
}
