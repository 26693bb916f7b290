//! Page document handlers.
//!
//! # Responsibilities
//! - Serve CMS-backed page documents through the page cache
//! - Fall back to empty collections when the CMS is unreachable
//! - Personalize the home and services documents from the region cookie
//!
//! # Design Decisions
//! - The cached document is region-independent; the region variant is
//!   spliced in per request, so one cache entry serves both regions
//! - A half-broken CMS degrades pages, it never takes them down

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::cms::types::ProjectCase;
use crate::cms::{ContentFetcher, ListQuery};
use crate::geo::middleware::cookie_value;
use crate::geo::region::{Region, GEO_COOKIE};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Home page document handler.
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let region = request_region(&headers, state.default_region);
    let content = match state.cache.get("/") {
        Some(doc) => doc,
        None => {
            let doc = build_home(&state).await;
            state.cache.put("/", doc.clone());
            doc
        }
    };
    Json(personalize(content, region))
}

/// Services page document handler.
pub async fn services(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let region = request_region(&headers, state.default_region);
    let content = match state.cache.get("/services") {
        Some(doc) => doc,
        None => {
            let items = fetch_list(
                &state,
                "services",
                ListQuery::default()
                    .fields(["id", "title", "slug", "description", "machinery_category"])
                    .sort(["id"]),
            )
            .await;
            let doc = json!({ "services": items });
            state.cache.put("/services", doc.clone());
            doc
        }
    };
    Json(personalize(content, region))
}

/// Machinery fleet document handler.
pub async fn machinery(State(state): State<AppState>) -> Json<Value> {
    let content = match state.cache.get("/machinery") {
        Some(doc) => doc,
        None => {
            let items = fetch_list(
                &state,
                "machinery",
                ListQuery::default()
                    .fields(["id", "name", "type", "status", "technical_specs", "category"])
                    .sort(["name"]),
            )
            .await;
            let doc = json!({ "machinery": items });
            state.cache.put("/machinery", doc.clone());
            doc
        }
    };
    Json(content)
}

/// Portfolio listing document handler.
pub async fn portfolio_list(State(state): State<AppState>) -> Json<Value> {
    let content = match state.cache.get("/portfolio") {
        Some(doc) => doc,
        None => {
            let raw = fetch_list(
                &state,
                "cases",
                ListQuery::default().fields(["*", "machinery.machinery_id.name"]),
            )
            .await;
            let cases: Vec<Value> = raw
                .into_iter()
                .filter_map(|item| case_document(item, state.cms.as_ref()))
                .collect();
            let doc = json!({ "cases": cases });
            state.cache.put("/portfolio", doc.clone());
            doc
        }
    };
    Json(content)
}

/// Portfolio detail document handler.
pub async fn portfolio_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let path = format!("/portfolio/{}", id);
    if let Some(doc) = state.cache.get(&path) {
        return Json(doc).into_response();
    }

    let query = ListQuery::default().fields(["*", "machinery.machinery_id.name"]);
    match state.cms.fetch_item("cases", &id, &query).await {
        Ok(raw) => {
            metrics::record_cms_fetch("cases", "ok");
            match case_document(raw, state.cms.as_ref()) {
                Some(doc) => {
                    state.cache.put(&path, doc.clone());
                    Json(doc).into_response()
                }
                None => not_found(),
            }
        }
        Err(e) => {
            metrics::record_cms_fetch("cases", "error");
            tracing::warn!(id = %id, error = %e, "Portfolio case unavailable");
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response()
}

/// Region for this request: cookie if recognized, configured default
/// otherwise. First-time visitors have no cookie yet (the middleware only
/// writes the response), so the default applies.
fn request_region(headers: &HeaderMap, default_region: Region) -> Region {
    cookie_value(headers, GEO_COOKIE)
        .and_then(Region::parse)
        .unwrap_or(default_region)
}

/// Splice the per-request region variant into a cached content document.
fn personalize(mut content: Value, region: Region) -> Value {
    let hero = content
        .get("settings")
        .and_then(|s| s.get("hero"))
        .and_then(|h| h.get(region.as_str()))
        .cloned()
        .unwrap_or(Value::Null);
    if let Some(object) = content.as_object_mut() {
        object.insert("region".to_string(), json!(region.as_str()));
        object.insert("hero".to_string(), hero);
    }
    content
}

async fn build_home(state: &AppState) -> Value {
    let settings = fetch_singleton(
        state,
        "site_settings",
        ListQuery::default().fields(["company_name", "phone", "email", "address", "hero"]),
    )
    .await;
    let services = fetch_list(
        state,
        "services",
        ListQuery::default().fields(["id", "title", "slug", "description"]).sort(["id"]),
    )
    .await;
    let machinery = fetch_list(
        state,
        "machinery",
        ListQuery::default().fields(["id", "name", "type", "status"]).limit(6),
    )
    .await;
    let cases = fetch_list(
        state,
        "cases",
        ListQuery::default().fields(["id", "title", "location"]),
    )
    .await;

    json!({
        "settings": settings,
        "services": services,
        "machinery": machinery,
        "cases": cases,
    })
}

/// Collection fetch with fallback-to-empty semantics.
async fn fetch_list(state: &AppState, collection: &str, query: ListQuery) -> Vec<Value> {
    match state.cms.fetch_items(collection, &query).await {
        Ok(items) => {
            metrics::record_cms_fetch(collection, "ok");
            items
        }
        Err(e) => {
            metrics::record_cms_fetch(collection, "error");
            tracing::warn!(collection = %collection, error = %e, "CMS fetch failed, serving empty collection");
            Vec::new()
        }
    }
}

/// Singleton fetch with fallback-to-null semantics.
async fn fetch_singleton(state: &AppState, collection: &str, query: ListQuery) -> Value {
    match state.cms.fetch_singleton(collection, &query).await {
        Ok(Some(value)) => {
            metrics::record_cms_fetch(collection, "ok");
            value
        }
        Ok(None) => {
            metrics::record_cms_fetch(collection, "ok");
            Value::Null
        }
        Err(e) => {
            metrics::record_cms_fetch(collection, "error");
            tracing::warn!(collection = %collection, error = %e, "CMS fetch failed, serving null singleton");
            Value::Null
        }
    }
}

/// View document for one portfolio case. Records that fail to decode are
/// dropped with a warning rather than failing the page.
fn case_document(raw: Value, cms: &dyn ContentFetcher) -> Option<Value> {
    let case: ProjectCase = match serde_json::from_value(raw) {
        Ok(case) => case,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed portfolio case");
            return None;
        }
    };

    let location = if case.location.is_empty() { "РФ".to_string() } else { case.location };
    let machinery: Vec<String> = case.machinery.into_iter().map(|m| m.machinery_id.name).collect();
    let tags: Vec<&str> = if case.soil_type.is_empty() { Vec::new() } else { vec![case.soil_type.as_str()] };

    Some(json!({
        "id": case.id,
        "title": case.title,
        "location": location,
        "description": case.description,
        "year": case.duration,
        "image": case.image.as_deref().map(|id| cms.asset_url(id)),
        "tags": tags,
        "machinery": machinery,
        "stats": [
            { "label": "Грунт", "value": case.soil_type },
            { "label": "Срок", "value": case.duration },
        ],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::server::test_support::{test_state, StubCms};
    use std::collections::HashMap;

    fn stub_with_content() -> StubCms {
        let mut items = HashMap::new();
        items.insert(
            "services".to_string(),
            vec![json!({"id": 1, "title": "Sheet piling", "slug": "sheet-piling"})],
        );
        items.insert(
            "cases".to_string(),
            vec![json!({
                "id": "17",
                "title": "Pile field, residential block",
                "location": "Колпино",
                "soil_type": "водонасыщенный песок",
                "duration": "2024",
                "image": "file-abc",
                "machinery": [{"machinery_id": {"name": "BAUER BG 28"}}],
            })],
        );
        let mut singletons = HashMap::new();
        singletons.insert(
            "site_settings".to_string(),
            json!({
                "company_name": "Geotech Hub",
                "hero": {
                    "spb": {"title": "Piling in St. Petersburg"},
                    "msk": {"title": "Piling in Moscow"},
                },
            }),
        );
        StubCms {
            items,
            singletons,
            fail: false,
        }
    }

    fn headers_with_region(region: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            format!("{}={}", GEO_COOKIE, region).parse().unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn home_document_defaults_to_spb() {
        let state = test_state(stub_with_content());
        let Json(body) = home(State(state), HeaderMap::new()).await;

        assert_eq!(body["region"], "spb");
        assert_eq!(body["hero"]["title"], "Piling in St. Petersburg");
        assert_eq!(body["services"][0]["title"], "Sheet piling");
    }

    #[tokio::test]
    async fn home_document_honors_region_cookie() {
        let state = test_state(stub_with_content());
        let Json(body) = home(State(state), headers_with_region("msk")).await;

        assert_eq!(body["region"], "msk");
        assert_eq!(body["hero"]["title"], "Piling in Moscow");
    }

    #[tokio::test]
    async fn one_cache_entry_serves_both_regions() {
        let state = test_state(stub_with_content());
        let Json(first) = home(State(state.clone()), HeaderMap::new()).await;
        assert_eq!(state.cache.len(), 1);

        let Json(second) = home(State(state), headers_with_region("msk")).await;
        assert_eq!(first["settings"], second["settings"]);
        assert_eq!(second["region"], "msk");
    }

    #[tokio::test]
    async fn cms_failure_degrades_to_empty_document() {
        let state = test_state(StubCms {
            fail: true,
            ..StubCms::default()
        });
        let Json(body) = home(State(state), HeaderMap::new()).await;

        assert_eq!(body["services"], json!([]));
        assert_eq!(body["settings"], Value::Null);
        assert_eq!(body["region"], "spb");
    }

    #[tokio::test]
    async fn portfolio_list_builds_case_views() {
        let state = test_state(stub_with_content());
        let Json(body) = portfolio_list(State(state)).await;

        let case = &body["cases"][0];
        assert_eq!(case["id"], "17");
        assert_eq!(case["image"], "http://cms.test/assets/file-abc");
        assert_eq!(case["machinery"][0], "BAUER BG 28");
        assert_eq!(case["tags"][0], "водонасыщенный песок");
    }

    #[tokio::test]
    async fn portfolio_detail_unknown_id_is_404() {
        let state = test_state(stub_with_content());
        let response = portfolio_detail(State(state), Path("999".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn portfolio_detail_is_cached_under_concrete_path() {
        let state = test_state(stub_with_content());
        let response = portfolio_detail(State(state.clone()), Path("17".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.cache.get("/portfolio/17").is_some());
    }

    #[test]
    fn empty_location_falls_back() {
        let state = test_state(StubCms::default());
        let doc = case_document(json!({"id": "1", "title": "T"}), state.cms.as_ref()).unwrap();
        assert_eq!(doc["location"], "РФ");
        assert_eq!(doc["image"], Value::Null);
    }
}
