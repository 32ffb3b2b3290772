//! Advisory collision detection over a sorted route list

use super::{RouteDefinition, RouteKind};
use crate::log::{LogRecord, ROUTER_LABEL};

const HARD_ERROR_NOTICE: &str = "A collision will result in a hard error in following versions.";

/// Warning records for every pair of routes that can never both be reached
///
/// Two kinds of collision are reported, each followed by a generic notice:
///
/// - both routes are fully static with the same route string
/// - both are server-resolved (not prerendered) with the same shape, such as
///   `/foo/[bar]` and `/foo/[baz]`
///
/// Redirects never collide; a redirect replaces the file route it shadows.
/// Order is never changed: the earlier route stays the active one.
pub fn detect_collisions(routes: &[RouteDefinition]) -> Vec<LogRecord> {
    let candidates: Vec<&RouteDefinition> = routes
        .iter()
        .filter(|r| r.kind() != RouteKind::Redirect)
        .collect();

    candidates
        .iter()
        .enumerate()
        .flat_map(|(i, a)| candidates[i + 1..].iter().map(move |b| (*a, *b)))
        .filter_map(|(a, b)| collision_message(a, b))
        .flat_map(|message| {
            [
                LogRecord::warn(ROUTER_LABEL, message),
                LogRecord::warn(ROUTER_LABEL, HARD_ERROR_NOTICE),
            ]
        })
        .collect()
}

fn collision_message(a: &RouteDefinition, b: &RouteDefinition) -> Option<String> {
    if a.template().is_static()
        && b.template().is_static()
        && a.route_string() == b.route_string()
    {
        return Some(format!(
            "The route \"{}\" is defined in both \"{}\" and \"{}\". A static route cannot be defined more than once.",
            a.route_string(),
            a.component(),
            b.component()
        ));
    }

    if a.is_prerendered() || b.is_prerendered() || !a.template().same_shape(b.template()) {
        return None;
    }

    // name the alphabetically-earlier route string first
    let (first, second) = if b.route_string() < a.route_string() {
        (b, a)
    } else {
        (a, b)
    };
    Some(format!(
        "The route \"{}\" is defined in both \"{}\" and \"{}\" using SSR mode. A dynamic SSR route cannot be defined more than once.",
        first.route_string(),
        first.component(),
        second.component()
    ))
}
