//! End-to-end tests for the revalidation webhook and page cache flow.

use serde_json::Value;

mod common;

#[tokio::test]
async fn pages_are_served_from_cache_until_revalidated() {
    let cms = common::MockCms::start().await;
    let (base, shutdown) = common::spawn_edge(common::test_config("it-secret"), cms.base_url()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    // Prime the home document.
    let first: Value = client.get(format!("{}/", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(first["settings"]["company_name"], "Geotech Hub");
    assert_eq!(cms.hits("/items/services"), 1);

    // Second request is a cache hit: no CMS traffic.
    let _: Value = client.get(format!("{}/", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(cms.hits("/items/services"), 1);

    // Revalidate the root, then the next request refetches.
    let res = client
        .get(format!("{}/api/revalidate?secret=it-secret&path=/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["revalidated"], true);
    assert_eq!(body["path"], "/");
    assert!(body["now"].as_str().is_some_and(|now| now.contains('T')));

    let _: Value = client.get(format!("{}/", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(cms.hits("/items/services"), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn wrong_secret_is_rejected_and_cache_is_untouched() {
    let cms = common::MockCms::start().await;
    let (base, shutdown) = common::spawn_edge(common::test_config("it-secret"), cms.base_url()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let _ = client.get(format!("{}/portfolio", base)).send().await.unwrap();
    assert_eq!(cms.hits("/items/cases"), 1);

    let res = client
        .get(format!("{}/api/revalidate?secret=wrong&path=/portfolio", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Invalid secret" }));

    // Cache entry survived: the next request is still a hit.
    let _ = client.get(format!("{}/portfolio", base)).send().await.unwrap();
    assert_eq!(cms.hits("/items/cases"), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn missing_secret_is_rejected() {
    let cms = common::MockCms::start().await;
    let (base, shutdown) = common::spawn_edge(common::test_config("it-secret"), cms.base_url()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client.get(format!("{}/api/revalidate", base)).send().await.unwrap();
    assert_eq!(res.status(), 401);

    shutdown.trigger();
}

#[tokio::test]
async fn root_revalidation_cascades_to_portfolio_pages() {
    let cms = common::MockCms::start().await;
    let (base, shutdown) = common::spawn_edge(common::test_config("it-secret"), cms.base_url()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    // Prime home, listing, and one detail page.
    let _ = client.get(format!("{}/", base)).send().await.unwrap();
    let _ = client.get(format!("{}/portfolio", base)).send().await.unwrap();
    let res = client.get(format!("{}/portfolio/17", base)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(cms.hits("/items/cases/17"), 1);

    let res = client
        .get(format!("{}/api/revalidate?secret=it-secret&path=/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    // All three were dropped: each next request goes back to the CMS.
    let _ = client.get(format!("{}/", base)).send().await.unwrap();
    let _ = client.get(format!("{}/portfolio", base)).send().await.unwrap();
    let _ = client.get(format!("{}/portfolio/17", base)).send().await.unwrap();
    assert_eq!(cms.hits("/items/site_settings"), 2);
    assert_eq!(cms.hits("/items/cases/17"), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn non_root_revalidation_does_not_cascade() {
    let cms = common::MockCms::start().await;
    let (base, shutdown) = common::spawn_edge(common::test_config("it-secret"), cms.base_url()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let _ = client.get(format!("{}/services", base)).send().await.unwrap();
    let _ = client.get(format!("{}/portfolio", base)).send().await.unwrap();
    let services_hits = cms.hits("/items/services");
    let cases_hits = cms.hits("/items/cases");

    let res = client
        .get(format!("{}/api/revalidate?secret=it-secret&path=/services", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["path"], "/services");

    let _ = client.get(format!("{}/services", base)).send().await.unwrap();
    let _ = client.get(format!("{}/portfolio", base)).send().await.unwrap();
    assert_eq!(cms.hits("/items/services"), services_hits + 1, "services refetched");
    assert_eq!(cms.hits("/items/cases"), cases_hits, "portfolio untouched");

    shutdown.trigger();
}

#[tokio::test]
async fn unknown_portfolio_case_is_404() {
    let cms = common::MockCms::start().await;
    let (base, shutdown) = common::spawn_edge(common::test_config("it-secret"), cms.base_url()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client.get(format!("{}/portfolio/999", base)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Not found");

    shutdown.trigger();
}
