//! Request interception for region cookie assignment.
//!
//! # Responsibilities
//! - Match the request path against the configured allow-list
//! - Feed query param + existing cookie into the resolver
//! - Append at most one `Set-Cookie` to the pass-through response
//!
//! # Design Decisions
//! - Path matching mirrors route matching: exact or whole sub-tree, no regex
//! - The request itself is never blocked, redirected, or rewritten

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::config::schema::GeoConfig;
use crate::geo::region::{Region, GEO_COOKIE, GEO_QUERY_PARAM};
use crate::geo::resolver;

/// A single allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPattern {
    /// Matches one path exactly.
    Exact(String),
    /// Matches a base path and everything under it.
    Subtree(String),
}

impl PathPattern {
    /// `"/services/*"` covers `/services` and the whole sub-tree;
    /// any other string matches exactly.
    fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/*") {
            Some(base) if !base.is_empty() => PathPattern::Subtree(base.to_string()),
            _ => PathPattern::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Subtree(base) => {
                path == base || path.strip_prefix(base.as_str()).is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

/// Compiled interception policy, shared across requests.
#[derive(Debug, Clone)]
pub struct GeoPolicy {
    patterns: Vec<PathPattern>,
    default_region: Region,
}

impl GeoPolicy {
    pub fn from_config(config: &GeoConfig) -> Self {
        Self {
            patterns: config.match_paths.iter().map(|p| PathPattern::parse(p)).collect(),
            default_region: config.default_region,
        }
    }

    /// Whether the resolver runs for this path at all.
    pub fn applies_to(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}

/// Extract one cookie value from the request headers.
pub(crate) fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Extract one query parameter from the request URI.
fn query_param(request: &Request<Body>, name: &str) -> Option<String> {
    let query = request.uri().query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Region resolver middleware. Piggybacks a cookie write on the response
/// for matched paths; everything else passes through untouched.
pub async fn geo_middleware(
    State(policy): State<Arc<GeoPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !policy.applies_to(request.uri().path()) {
        return next.run(request).await;
    }

    let geo_query = query_param(&request, GEO_QUERY_PARAM);
    let existing = cookie_value(request.headers(), GEO_COOKIE).map(str::to_string);

    let write = resolver::resolve(geo_query.as_deref(), existing.as_deref(), policy.default_region);

    let mut response = next.run(request).await;
    if let Some(region) = write {
        let cookie = format!("{}={}; Path=/", GEO_COOKIE, region.as_str());
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
