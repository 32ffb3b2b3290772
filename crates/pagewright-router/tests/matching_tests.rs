//! Integration tests for request matching and resolution
//!
//! Covers trailing-slash policies, `.html` requests, redirects, and matching
//! from many threads and tasks against one shared manifest.

use pagewright_router::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

fn manifest_with(paths: &[&str], options: RoutingOptions) -> RouteManifest {
    ManifestBuilder::new(options)
        .with_files(paths.iter().map(|p| FileRoute::new(*p, *p)))
        .build()
        .unwrap()
        .0
}

fn matched(manifest: &RouteManifest, pathname: &str) -> Vec<String> {
    manifest
        .match_all(pathname)
        .iter()
        .map(|m| m.route.route_string().to_string())
        .collect()
}

// ============================================================================
// Trailing slash
// ============================================================================

#[test]
fn test_index_route_under_never() {
    let template = RouteTemplate::parse("/").unwrap();
    let matcher = CompiledMatcher::compile(&template, TrailingSlash::Never, false).unwrap();
    assert!(matcher.matches(""));
    assert!(!matcher.matches("/"));
}

#[rstest]
#[case(TrailingSlash::Never, "/foo", true)]
#[case(TrailingSlash::Never, "/foo/", false)]
#[case(TrailingSlash::Always, "/foo", false)]
#[case(TrailingSlash::Always, "/foo/", true)]
#[case(TrailingSlash::Ignore, "/foo", true)]
#[case(TrailingSlash::Ignore, "/foo/", true)]
fn test_trailing_slash_policy(
    #[case] policy: TrailingSlash,
    #[case] pathname: &str,
    #[case] expected: bool,
) {
    let manifest = manifest_with(
        &["foo.astro"],
        RoutingOptions::default().with_trailing_slash(policy),
    );
    assert_eq!(!manifest.match_all(pathname).is_empty(), expected);
}

#[rstest]
#[case(TrailingSlash::Never, "/")]
#[case(TrailingSlash::Always, "/")]
#[case(TrailingSlash::Ignore, "/")]
fn test_root_request_reaches_index(#[case] policy: TrailingSlash, #[case] pathname: &str) {
    let manifest = manifest_with(
        &["index.astro"],
        RoutingOptions::default().with_trailing_slash(policy),
    );
    assert_eq!(matched(&manifest, pathname), vec!["/"]);
}

#[rstest]
#[case(TrailingSlash::Never)]
#[case(TrailingSlash::Always)]
fn test_file_routes_ignore_trailing_slash_policy(#[case] policy: TrailingSlash) {
    let manifest = manifest_with(
        &["robots.txt.ts"],
        RoutingOptions::default().with_trailing_slash(policy),
    );
    assert_eq!(matched(&manifest, "/robots.txt"), vec!["/robots.txt"]);
    assert_eq!(matched(&manifest, "/robots.txt/"), vec!["/robots.txt"]);
}

// ============================================================================
// Matching order and params
// ============================================================================

#[test]
fn test_dynamic_matches_before_rest() {
    let manifest = manifest_with(
        &["index.astro", "static.astro", "[dynamic].astro", "[...rest].astro"],
        RoutingOptions::default(),
    );
    assert_eq!(matched(&manifest, "/foo"), vec!["/[dynamic]", "/[...rest]"]);
}

#[test]
fn test_static_preferred_for_exact_request() {
    let manifest = manifest_with(
        &["[dynamic].astro", "[...rest].astro", "static.astro"],
        RoutingOptions::default(),
    );
    assert_eq!(
        matched(&manifest, "/static"),
        vec!["/static", "/[dynamic]", "/[...rest]"]
    );
}

#[test]
fn test_html_request_extracts_params() {
    let manifest = manifest_with(
        &["api/[category]/[id].ts"],
        RoutingOptions::default(),
    );
    let results = manifest.match_all("/api/books/1.html");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].params["category"], "books");
    assert_eq!(results[0].params["id"], "1");
}

#[test]
fn test_percent_encoded_static_segment() {
    let manifest = manifest_with(&["\u{2019}quote.astro"], RoutingOptions::default());
    assert_eq!(matched(&manifest, "/%E2%80%99quote"), vec!["/\u{2019}quote"]);
    assert_eq!(matched(&manifest, "/\u{2019}quote"), vec!["/\u{2019}quote"]);
}

#[test]
fn test_case_insensitive_option() {
    let manifest = manifest_with(
        &["About.astro"],
        RoutingOptions::default().with_case_insensitive(true),
    );
    assert_eq!(matched(&manifest, "/about"), vec!["/about"]);

    let manifest = manifest_with(&["About.astro"], RoutingOptions::default());
    assert!(matched(&manifest, "/about").is_empty());
    assert_eq!(matched(&manifest, "/About"), vec!["/about"]);
}

#[test]
fn test_base_path() {
    let options = RoutingOptions::default()
        .with_base("/docs/")
        .with_trailing_slash(TrailingSlash::Never);
    let manifest = manifest_with(&["index.astro", "[page].astro"], options);

    assert_eq!(matched(&manifest, "/docs"), vec!["/"]);
    assert_eq!(matched(&manifest, "/docs/intro"), vec!["/[page]"]);
    assert!(matched(&manifest, "/intro").is_empty());

    // The index route rejects a trailing slash just like nested routes do
    assert!(matched(&manifest, "/docs/").is_empty());
    assert!(matched(&manifest, "/docs/intro/").is_empty());
}

#[test]
fn test_encoded_slash_matches_one_dynamic_segment() {
    let manifest = manifest_with(
        &["blog/[slug].astro", "[...rest].astro"],
        RoutingOptions::default(),
    );
    let results = manifest.match_all("/blog/a%2Fb");

    assert_eq!(results[0].route.route_string(), "/blog/[slug]");
    assert_eq!(results[0].params["slug"], "a/b");
    assert_eq!(results[0].resolved_pathname, "/blog/a%2Fb");
}

#[test]
fn test_html_suffix_without_name_is_not_index() {
    let manifest = manifest_with(&["index.astro"], RoutingOptions::default());
    assert!(matched(&manifest, "/.html").is_empty());
    assert_eq!(matched(&manifest, "/index.html"), vec!["/"]);
}

// ============================================================================
// Redirects
// ============================================================================

#[test]
fn test_percent_decoded_dynamic_redirect() {
    let (manifest, _) = ManifestBuilder::new(RoutingOptions::default())
        .with_file(FileRoute::new("more/[dynamic].astro", "more"))
        .with_redirect(RedirectRule::new("/more/old/[dynamic]", "/more/[dynamic]"))
        .build()
        .unwrap();

    let candidates = resolve(
        manifest.match_all("/more/old/%E2%80%99"),
        &ResolveContext::server(),
    );
    let redirect = &candidates[0];
    assert_eq!(redirect.route.kind(), RouteKind::Redirect);
    assert_eq!(redirect.redirect_status(), Some(301));
    assert_eq!(
        redirect.redirect_location(),
        Some("/more/%E2%80%99".to_string())
    );
}

#[test]
fn test_rest_redirect_keeps_all_components() {
    let (manifest, _) = ManifestBuilder::new(RoutingOptions::default())
        .with_file(FileRoute::new("docs/[...slug].astro", "docs"))
        .with_redirect(RedirectRule::new("/guide/[...slug]", "/docs/[...slug]").with_status(308))
        .build()
        .unwrap();

    let matches = manifest.match_all("/guide/getting started/install");
    assert_eq!(
        matches[0].redirect_location(),
        Some("/docs/getting%20started/install".to_string())
    );
    assert_eq!(matches[0].redirect_status(), Some(308));
}

#[test]
fn test_redirect_location_follows_trailing_slash_policy() {
    let options = RoutingOptions::default().with_trailing_slash(TrailingSlash::Always);
    let (manifest, _) = ManifestBuilder::new(options)
        .with_file(FileRoute::new("new.astro", "new"))
        .with_redirect(RedirectRule::new("/old", "/new"))
        .build()
        .unwrap();

    let matches = manifest.match_all("/old/");
    assert_eq!(matches[0].redirect_location(), Some("/new/".to_string()));
}

#[test]
fn test_external_redirect_location() {
    let (manifest, _) = ManifestBuilder::new(RoutingOptions::default())
        .with_redirect(RedirectRule::new("/chat", "https://chat.example.com").with_status(302))
        .build()
        .unwrap();

    let matches = manifest.match_all("/chat");
    assert_eq!(
        matches[0].redirect_location(),
        Some("https://chat.example.com".to_string())
    );
}

// ============================================================================
// Concurrency
// ============================================================================

fn sibling_manifest() -> RouteManifest {
    manifest_with(
        &["api/[category]/[id].ts", "api/movies/[id].ts"],
        RoutingOptions::default(),
    )
}

fn check_books(manifest: &RouteManifest) {
    let results = manifest.match_all("/api/books/1.html");
    assert_eq!(results[0].route.route_string(), "/api/[category]/[id]");
    assert_eq!(results[0].params["category"], "books");
    assert_eq!(results[0].params["id"], "1");
    assert_eq!(results[0].resolved_pathname, "/api/books/1");
}

fn check_movies(manifest: &RouteManifest) {
    let results = manifest.match_all("/api/movies/99");
    assert_eq!(results[0].route.route_string(), "/api/movies/[id]");
    assert_eq!(results[0].params["id"], "99");
    assert_eq!(results[0].resolved_pathname, "/api/movies/99");

    assert_eq!(results[1].route.route_string(), "/api/[category]/[id]");
    assert_eq!(results[1].params["category"], "movies");
}

#[test]
fn test_concurrent_threads_do_not_share_request_state() {
    let manifest = sibling_manifest();

    std::thread::scope(|scope| {
        for i in 0..16 {
            let manifest = &manifest;
            scope.spawn(move || {
                for _ in 0..200 {
                    if i % 2 == 0 {
                        check_books(manifest);
                    } else {
                        check_movies(manifest);
                    }
                }
            });
        }
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_do_not_share_request_state() {
    let handle = Arc::new(ManifestHandle::new(sibling_manifest()));

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let handle = Arc::clone(&handle);
            tokio::spawn(async move {
                let manifest = handle.load();
                tokio::task::yield_now().await;
                if i % 2 == 0 {
                    check_books(&manifest);
                } else {
                    check_movies(&manifest);
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}

#[test]
fn test_readers_keep_snapshot_across_rebuild() {
    let handle = Arc::new(ManifestHandle::new(sibling_manifest()));
    let in_flight = handle.load();

    std::thread::scope(|scope| {
        let writer = Arc::clone(&handle);
        scope.spawn(move || {
            for _ in 0..20 {
                writer.store(manifest_with(&["index.astro"], RoutingOptions::default()));
            }
        });

        for _ in 0..20 {
            let reader = Arc::clone(&handle);
            scope.spawn(move || {
                let snapshot = reader.load();
                assert!(snapshot.len() == 1 || snapshot.len() == 2);
            });
        }
    });

    check_books(&in_flight);
    assert_eq!(handle.load().len(), 1);
    assert_eq!(handle.generation(), 20);
}
