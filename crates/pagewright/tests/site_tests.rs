//! Integration tests for page discovery and site builds on a real directory tree

use pagewright::router::{RouteError, STATIC_PATHS_LABEL};
use pagewright::{Config, ManifestHandle, ResolveContext, RouteKind, RouteLoader, Site};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

fn site_tree(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        touch(dir.path(), &format!("pages/{}", file));
    }
    dir
}

fn config(toml: &str) -> Config {
    toml::from_str(toml).unwrap()
}

#[test]
fn test_walker_skips_private_and_dot_files() {
    let dir = site_tree(&[
        "index.astro",
        "_draft.astro",
        "_partials/card.astro",
        ".DS_Store",
        ".hidden/secret.astro",
        ".well-known/security.txt.ts",
        "blog/[slug].md",
    ]);

    let files = RouteLoader::new(dir.path().join("pages")).discover().unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();

    assert_eq!(
        paths,
        vec![".well-known/security.txt.ts", "blog/[slug].md", "index.astro"]
    );
}

#[test]
fn test_walker_order_is_sorted() {
    let dir = site_tree(&["b.astro", "a.astro", "c/index.astro", "[x].astro"]);

    let files = RouteLoader::new(dir.path().join("pages")).discover().unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();

    assert_eq!(paths, vec!["[x].astro", "a.astro", "b.astro", "c/index.astro"]);
}

#[test]
fn test_site_build_from_disk() {
    let dir = site_tree(&[
        "index.astro",
        "about.md",
        "blog/[slug].astro",
        "api/[id].ts",
        "notes.txt",
    ]);

    let site = Site::with_root(Config::default(), dir.path());
    let (manifest, warnings) = site.build().unwrap();

    assert_eq!(manifest.len(), 4);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("Unsupported file type notes.txt"));
    assert_eq!(manifest.get("/api/[id]").unwrap().kind(), RouteKind::Endpoint);
}

#[test]
fn test_missing_pages_directory_warns() {
    let dir = TempDir::new().unwrap();
    let site = Site::with_root(Config::default(), dir.path());

    let (manifest, warnings) = site.build().unwrap();
    assert!(manifest.is_empty());
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.starts_with("Missing pages directory"));
}

#[test]
fn test_injected_routes_without_pages_directory() {
    let dir = TempDir::new().unwrap();
    let config = config(
        r#"
        [[routes]]
        pattern = "/health"
        entrypoint = "@lib/health.ts"
        "#,
    );

    let (manifest, warnings) = Site::with_root(config, dir.path()).build().unwrap();
    assert!(warnings.is_empty());
    assert_eq!(manifest.get("/health").unwrap().kind(), RouteKind::Endpoint);
}

#[test]
fn test_config_redirects_and_static_paths() {
    let dir = site_tree(&["posts/[slug].astro", "index.astro"]);
    let config = config(
        r#"
        [routing]
        trailing_slash = "never"

        [redirects]
        "/blog/[slug]" = { destination = "/posts/[slug]", status = 308 }

        [static_paths]
        "/posts/[slug]" = [{ slug = "hello" }, { slug = "" }]
        "#,
    );

    let (manifest, warnings) = Site::with_root(config, dir.path()).build().unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].label, STATIC_PATHS_LABEL);

    let matches = manifest.match_all("/blog/hello");
    assert_eq!(matches[0].redirect_location(), Some("/posts/hello".to_string()));
    assert_eq!(matches[0].redirect_status(), Some(308));

    let served = pagewright::resolve(manifest.match_all("/posts/hello"), &ResolveContext::static_build());
    assert_eq!(served.len(), 1);
    let missing = pagewright::resolve(manifest.match_all("/posts/other"), &ResolveContext::static_build());
    assert!(missing.is_empty());
}

#[test]
fn test_redirects_keep_file_order() {
    let dir = site_tree(&["posts/[slug].astro"]);
    let config = config(
        r#"
        [redirects]
        "/zine/[slug]" = "/posts/[slug]"
        "/archive/[slug]" = "/posts/[slug]"
        "#,
    );

    let (manifest, _) = Site::with_root(config, dir.path()).build().unwrap();
    let redirects: Vec<&str> = manifest
        .iter()
        .filter(|route| route.kind() == RouteKind::Redirect)
        .map(|route| route.route_string())
        .collect();

    assert_eq!(redirects, vec!["/zine/[slug]", "/archive/[slug]"]);
}

#[rstest]
#[case("never", "/about", true)]
#[case("never", "/about/", false)]
#[case("always", "/about", false)]
#[case("always", "/about/", true)]
#[case("ignore", "/about/", true)]
fn test_trailing_slash_from_config(#[case] policy: &str, #[case] path: &str, #[case] matched: bool) {
    let dir = site_tree(&["about.astro"]);
    let config = config(&format!("[routing]\ntrailing_slash = \"{}\"\n", policy));

    let (manifest, _) = Site::with_root(config, dir.path()).build().unwrap();
    assert_eq!(!manifest.match_all(path).is_empty(), matched);
}

#[test]
fn test_fatal_error_names_the_route() {
    let dir = site_tree(&["[...rest]/edit.astro"]);
    let err = Site::with_root(Config::default(), dir.path()).build().unwrap_err();

    assert!(err.to_string().contains("Failed to build route manifest"));
    let cause = err.downcast_ref::<RouteError>().unwrap();
    assert!(matches!(cause, RouteError::MalformedTemplate { .. }));
}

#[test]
fn test_rebuild_keeps_previous_manifest_on_error() {
    let dir = site_tree(&["index.astro"]);
    let site = Site::with_root(Config::default(), dir.path());
    let handle = ManifestHandle::new(site.build().unwrap().0);

    touch(dir.path(), "pages/[broken.astro");
    assert!(handle.rebuild_with(|| site.build()).is_err());
    assert_eq!(handle.load().len(), 1);

    fs::remove_file(dir.path().join("pages/[broken.astro")).unwrap();
    touch(dir.path(), "pages/about.astro");
    handle.rebuild_with(|| site.build()).unwrap();
    assert_eq!(handle.load().len(), 2);
    assert_eq!(handle.generation(), 1);
}

#[test]
fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pagewright.toml");

    assert_eq!(Config::load(&path).unwrap().server.port, 3000);

    fs::write(&path, "[server]\nport = 4321\n").unwrap();
    assert_eq!(Config::load(&path).unwrap().server.port, 4321);

    fs::write(&path, "[server\nport = ").unwrap();
    assert!(Config::load(&path).is_err());
}
