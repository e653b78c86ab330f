mod support;

use std::collections::HashSet;

use kinodex_core::api_types::{ItemDraft, ItemUpdate};
use kinodex_core::catalog::{CatalogService, SlugAssigner};
use kinodex_core::store::{CatalogStore, ItemSort};
use kinodex_model::ItemKind;

use support::{item, seeded};

fn draft(name: &str) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        kind: ItemKind::Movie,
        categories: Vec::new(),
        language: None,
        rate: None,
        year: None,
        promoted: false,
        pinned: false,
        is_published: None,
        external_id: None,
        alternate_id: None,
    }
}

#[tokio::test]
async fn colliding_names_get_numeric_suffixes() {
    let service = CatalogService::new(seeded(Vec::new()), 50);
    let first = service.create(draft("The Matrix")).await.unwrap();
    let second = service.create(draft("The Matrix")).await.unwrap();
    let third = service.create(draft("The Matrix")).await.unwrap();
    assert_eq!(first.slug.as_deref(), Some("the-matrix"));
    assert_eq!(second.slug.as_deref(), Some("the-matrix-2"));
    assert_eq!(third.slug.as_deref(), Some("the-matrix-3"));
}

#[tokio::test]
async fn owner_keeps_its_own_slug_on_reassign() {
    let store = seeded(vec![
        item("Heat").slug("heat").rank(1).build(),
        item("Heaters").slug("heaters").rank(2).build(),
    ]);
    let owner = store.get_by_slug("heat").await.unwrap().unwrap();
    let assigner = SlugAssigner::new(store.as_ref());
    // Re-deriving for the current holder is a no-op, not a -2.
    let slug = assigner.assign(&owner.id, "Heat").await.unwrap();
    assert_eq!(slug, "heat");
}

#[tokio::test]
async fn unsluggable_name_falls_back_to_the_id() {
    let service = CatalogService::new(seeded(Vec::new()), 50);
    let created = service.create(draft("千と千尋の神隠し")).await.unwrap();
    assert_eq!(created.slug, Some(created.id.to_string()));
}

#[tokio::test]
async fn rename_regenerates_the_slug() {
    let store = seeded(Vec::new());
    let service = CatalogService::new(store.clone(), 50);
    let created = service.create(draft("Working Title")).await.unwrap();

    let renamed = service
        .update(
            &created.id,
            ItemUpdate {
                name: Some("Final Title".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.slug.as_deref(), Some("final-title"));
    assert!(store.get_by_slug("final-title").await.unwrap().is_some());
}

#[tokio::test]
async fn unrelated_update_keeps_the_slug() {
    let service = CatalogService::new(seeded(Vec::new()), 50);
    let created = service.create(draft("Stable Name")).await.unwrap();
    let updated = service
        .update(
            &created.id,
            ItemUpdate {
                categories: Some(vec!["drama".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.slug, created.slug);
}

#[tokio::test]
async fn bulk_regeneration_dedupes_and_reports_changes() {
    // Two renamed-in-place items whose slugs no longer match, one of them
    // colliding with the other after regeneration, plus one already correct.
    let items = vec![
        item("Twin Peaks").slug("stale-a").rank(1).build(),
        item("Twin Peaks").slug("stale-b").rank(2).build(),
        item("Correct").slug("correct").rank(3).build(),
    ];
    let store = seeded(items);
    let service = CatalogService::new(store.clone(), 50);

    let response = service.regenerate_slugs().await.unwrap();
    assert_eq!(response.updated_count, 2);
    assert!(response.errors.is_empty());

    let all = store
        .find(&Default::default(), ItemSort::Rank, 0, u64::MAX)
        .await
        .unwrap();
    let slugs: HashSet<String> =
        all.iter().filter_map(|i| i.slug.clone()).collect();
    assert_eq!(slugs.len(), 3, "slugs stayed unique");
    assert!(slugs.contains("twin-peaks"));
    assert!(slugs.contains("twin-peaks-2"));
    assert!(slugs.contains("correct"));
}

#[tokio::test]
async fn detail_lookup_resolves_slug_and_id() {
    let store = seeded(Vec::new());
    let service = CatalogService::new(store, 50);
    let created = service.create(draft("Lookup Me")).await.unwrap();

    let by_slug = service.get_by_id_or_slug("lookup-me").await.unwrap();
    assert_eq!(by_slug.id, created.id);

    let by_id = service
        .get_by_id_or_slug(&created.id.to_string())
        .await
        .unwrap();
    assert_eq!(by_id.id, created.id);

    assert!(service.get_by_id_or_slug("nope").await.is_err());
}
