use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use pagewright::{resolve, ManifestHandle, MatchResult, ResolveContext, RouteDefinition, RouteKind};
use pagewright_router::path::collapse_slashes;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub manifest: Arc<ManifestHandle>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_request).post(serve_request).put(serve_request).delete(serve_request))
        .route("/*path", get(serve_request).post(serve_request).put(serve_request).delete(serve_request))
        .with_state(state)
}

async fn serve_request(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path();

    // Repeated leading or trailing slashes never reach the matcher
    let collapsed = collapse_slashes(path);
    if collapsed != path {
        return redirect_response(301, &with_query(&collapsed, uri.query()));
    }

    let manifest = state.manifest.load();
    let candidates = resolve(manifest.match_all(path), &ResolveContext::server());

    match candidates.first() {
        Some(matched) if matched.route.kind() == RouteKind::Redirect => redirect_to(matched, uri.query()),
        Some(matched) => dispatch(StatusCode::OK, matched.route, &matched.params, &matched.resolved_pathname, &headers),
        None => match manifest.not_found_route() {
            Some(route) => dispatch(StatusCode::NOT_FOUND, route, &Default::default(), path, &headers),
            None => error_response(404, "Page Not Found", &format!("Route '{}' not found", path)),
        },
    }
}

fn redirect_to(matched: &MatchResult<'_>, query: Option<&str>) -> Response {
    match (matched.redirect_location(), matched.redirect_status()) {
        (Some(location), Some(status)) => redirect_response(status, &with_query(&location, query)),
        _ => {
            tracing::error!(route = matched.route.route_string(), "redirect target could not be generated");
            error_response(500, "Internal Server Error", "Redirect target could not be generated")
        }
    }
}

/// Carries the request query string over to a redirect target
fn with_query(location: &str, query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(query) if location.contains('?') => format!("{}&{}", location, query),
        Some(query) => format!("{}?{}", location, query),
        None => location.to_string(),
    }
}

fn redirect_response(status: u16, location: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::MOVED_PERMANENTLY);
    (status, [(header::LOCATION, location.to_string())]).into_response()
}

/// Describes which component the request resolved to
///
/// Rendering belongs to the component runtime; this server reports the
/// dispatch decision as JSON or as a small HTML page.
fn dispatch(
    status: StatusCode,
    route: &RouteDefinition,
    params: &pagewright::router::Params,
    pathname: &str,
    headers: &HeaderMap,
) -> Response {
    let record = serde_json::json!({
        "route": route.route_string(),
        "component": route.component(),
        "kind": route.kind(),
        "params": params,
        "pathname": pathname,
    });

    if accepts_json(headers) {
        return (status, Json(record)).into_response();
    }

    let mut rows: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("<li><code>{}</code> = {}</li>", escape_html(name), escape_html(value)))
        .collect();
    rows.sort();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{route}</title></head>
<body>
  <h1>{route}</h1>
  <p>{kind:?} <code>{component}</code> for <code>{pathname}</code></p>
  <ul>{rows}</ul>
</body>
</html>"#,
        route = escape_html(route.route_string()),
        kind = route.kind(),
        component = escape_html(route.component()),
        pathname = escape_html(pathname),
        rows = rows.join("")
    );
    (status, Html(html)).into_response()
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn error_response(status: u16, title: &str, message: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body>
  <h1>{status} {title}</h1>
  <p>{message}</p>
  <a href="/">Go Home</a>
</body>
</html>"#,
        status = status,
        title = title,
        message = escape_html(message)
    );
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Html(html),
    )
        .into_response()
}
