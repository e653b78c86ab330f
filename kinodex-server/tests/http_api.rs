//! End-to-end router tests over the in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use serde_json::{Value, json};
use tower::ServiceExt;

use kinodex_core::enrichment::DisabledProvider;
use kinodex_core::store::MemoryCatalogStore;
use kinodex_model::{CatalogItem, ItemID, ItemKind, Placement};
use kinodex_server::{Config, build_app};

fn seed_item(name: &str, slug: &str, rank: i64) -> CatalogItem {
    let now = Utc::now();
    CatalogItem {
        id: ItemID::new(),
        name: name.to_string(),
        kind: ItemKind::Movie,
        categories: vec!["drama".into()],
        language: Some("en".into()),
        rate: None,
        year: Some(2015),
        slug: Some(slug.to_string()),
        order_index: Some(rank),
        placement: Placement::Normal,
        is_published: true,
        external_id: None,
        alternate_id: None,
        enrichment: Default::default(),
        created_at: now,
        updated_at: now,
    }
}

fn app_with(items: Vec<CatalogItem>, page_size: u64) -> (Router, Arc<MemoryCatalogStore>) {
    let store = Arc::new(MemoryCatalogStore::with_items(items));
    let mut config = Config::default();
    config.catalog.page_size = page_size;
    let app = build_app(
        store.clone(),
        Arc::new(DisabledProvider),
        Arc::new(DisabledProvider),
        Arc::new(config),
    );
    (app, store)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn public_listing_pages_and_hides_unpublished() {
    let mut items: Vec<CatalogItem> = (1..=5)
        .map(|i| seed_item(&format!("Film {i}"), &format!("film-{i}"), i))
        .collect();
    let mut hidden = seed_item("Hidden", "hidden", 6);
    hidden.is_published = false;
    items.push(hidden);
    let (app, _) = app_with(items, 3);

    let response = app
        .clone()
        .oneshot(get("/api/v1/catalog?pageNumber=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["totalCount"], 5);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["name"], "Film 4");

    // The admin view still sees the unpublished item.
    let response = app
        .oneshot(get("/api/v1/admin/catalog"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["totalCount"], 6);
}

#[tokio::test]
async fn detail_resolves_slug_and_reports_missing() {
    let (app, _) =
        app_with(vec![seed_item("The Thing", "the-thing", 1)], 50);

    let response = app
        .clone()
        .oneshot(get("/api/v1/catalog/the-thing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "The Thing");
    assert_eq!(body["slug"], "the-thing");

    let response = app
        .oneshot(get("/api/v1/catalog/no-such-slug"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["status"], 404);
}

#[tokio::test]
async fn bad_query_parameters_are_rejected() {
    let (app, _) = app_with(vec![], 50);
    let response = app
        .oneshot(get("/api/v1/catalog?time=ancient"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("decade")
    );
}

#[tokio::test]
async fn create_then_fetch_roundtrip() {
    let (app, _) = app_with(vec![], 50);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/admin/items",
            &json!({
                "name": "Créature",
                "type": "movie",
                "categories": ["horror"],
                "year": 2021,
                "latest": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["slug"], "creature");
    assert_eq!(created["placement"], "promoted");
    assert_eq!(created["orderIndex"], 1);

    let response = app
        .oneshot(get("/api/v1/catalog/creature"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], created["id"]);
}

#[tokio::test]
async fn promoted_and_pinned_together_is_a_client_error() {
    let (app, _) = app_with(vec![], 50);
    let response = app
        .oneshot(post_json(
            "/api/v1/admin/items",
            &json!({
                "name": "Contradiction",
                "type": "movie",
                "latest": true,
                "previousHit": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reorder_rejects_a_mismatched_id_set() {
    let items = vec![
        seed_item("A", "a", 1),
        seed_item("B", "b", 2),
        seed_item("C", "c", 3),
    ];
    let (app, _) = app_with(items, 50);

    let response = app
        .oneshot(post_json(
            "/api/v1/admin/catalog/reorder",
            &json!({
                "pageNumber": 1,
                "orderedIds": [ItemID::new(), ItemID::new(), ItemID::new()]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"]["message"],
        "orderedIds must contain exactly the IDs of this page"
    );
}

#[tokio::test]
async fn move_endpoint_relocates_and_renumbers() {
    let items: Vec<CatalogItem> = (1..=6)
        .map(|i| seed_item(&format!("Film {i}"), &format!("film-{i}"), i))
        .collect();
    let last = items[5].id;
    let (app, store) = app_with(items, 3);

    let response = app
        .oneshot(post_json(
            "/api/v1/admin/catalog/move",
            &json!({ "targetPage": 1, "movieIds": [last] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["movedCount"], 1);
    assert_eq!(body["targetPage"], 1);
    assert_eq!(body["total"], 6);

    use kinodex_core::store::CatalogStore;
    let moved = store.get(&last).await.unwrap().unwrap();
    assert_eq!(moved.order_index, Some(1));
    // Landing on page 1 promotes.
    assert_eq!(moved.placement, Placement::Promoted);
}

#[tokio::test]
async fn enrichment_sync_reports_per_item_outcomes() {
    let items = vec![seed_item("Unmatched", "unmatched", 1)];
    let id = items[0].id;
    let (app, _) = app_with(items, 50);

    let response = app
        .oneshot(post_json(
            "/api/v1/admin/enrichment/sync",
            &json!({ "movieIds": [id], "force": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["updated"], false);
    assert_eq!(results[0]["reason"], "not_found");
}

#[tokio::test]
async fn configured_sync_batch_cap_limits_the_sweep() {
    let items: Vec<CatalogItem> = (1..=4)
        .map(|i| seed_item(&format!("Bare {i}"), &format!("bare-{i}"), i))
        .collect();
    let store = Arc::new(MemoryCatalogStore::with_items(items));
    let mut config = Config::default();
    config.enrichment.sync_batch_cap = 2;
    let app = build_app(
        store,
        Arc::new(DisabledProvider),
        Arc::new(DisabledProvider),
        Arc::new(config),
    );

    // An unscoped sweep over items missing credits stops at the cap.
    let response = app
        .oneshot(post_json("/api/v1/admin/enrichment/sync", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn filters_endpoint_lists_distinct_values() {
    let mut a = seed_item("A", "a", 1);
    a.categories = vec!["action".into(), "drama".into()];
    let mut b = seed_item("B", "b", 2);
    b.language = Some("fr".into());
    let (app, _) = app_with(vec![a, b], 50);

    let response = app
        .oneshot(get("/api/v1/catalog/filters"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["categories"], json!(["action", "drama"]));
    assert_eq!(body["languages"], json!(["en", "fr"]));
}

#[tokio::test]
async fn slug_regeneration_and_order_repair_round_trip() {
    let mut stale = seed_item("Renamed Film", "old-slug", 1);
    stale.order_index = None;
    let (app, store) = app_with(vec![stale.clone()], 50);

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/admin/slugs/regenerate", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["updatedCount"], 1);

    let response = app
        .oneshot(post_json("/api/v1/admin/order/repair", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["repairedCount"], 1);

    use kinodex_core::store::CatalogStore;
    let fixed = store.get(&stale.id).await.unwrap().unwrap();
    assert_eq!(fixed.slug.as_deref(), Some("renamed-film"));
    assert_eq!(fixed.order_index, Some(1));
}
