//! Catalog CRUD against an in-memory SQLite database.

use millet_ai_services::domain::product::{NewProduct, ProductPatch};
use millet_ai_services::CatalogStore;
use serde_json::json;

async fn store() -> CatalogStore {
    CatalogStore::connect("sqlite::memory:").await.unwrap()
}

fn listing(title: &str, seller: &str) -> NewProduct {
    serde_json::from_value(json!({
        "title": title,
        "millet_type": "Pearl Millet",
        "product_form": "Whole Grain",
        "description": "Sun dried, machine cleaned",
        "available_quantity_kg": 500.0,
        "price_per_kg": 32.5,
        "harvest_date": "2025-10-01",
        "organic_certified": true,
        "quality_grade": "A",
        "moisture_content": 11.5,
        "location_state": "Rajasthan",
        "location_district": "Jodhpur",
        "seller_id": seller,
        "certifications": ["NPOP", "FSSAI"],
        "images": ["https://cdn.example/bajra.jpg"]
    }))
    .unwrap()
}

#[tokio::test]
async fn create_then_get_round_trips_every_field() {
    let store = store().await;
    let input = listing("Bajra 50kg", "farmer-1");

    let created = store.create(&input).await.unwrap();
    let fetched = store.get(created.id).await.unwrap().unwrap();

    assert_eq!(created, fetched);
    assert_eq!(fetched.title, "Bajra 50kg");
    assert_eq!(fetched.description.as_deref(), Some("Sun dried, machine cleaned"));
    assert_eq!(fetched.minimum_order_kg, 1.0);
    assert_eq!(fetched.moisture_content, Some(11.5));
    assert!(fetched.organic_certified);
    assert!(fetched.is_active);
    assert_eq!(fetched.certifications, vec!["NPOP", "FSSAI"]);
    assert_eq!(fetched.images, vec!["https://cdn.example/bajra.jpg"]);
}

#[tokio::test]
async fn ids_are_distinct() {
    let store = store().await;
    let a = store.create(&listing("A", "s")).await.unwrap();
    let b = store.create(&listing("B", "s")).await.unwrap();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn get_unknown_id_is_none() {
    let store = store().await;
    assert!(store.get(4242).await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_newest_first_and_filters_by_seller() {
    let store = store().await;
    let first = store.create(&listing("first", "farmer-1")).await.unwrap();
    let other = store.create(&listing("other", "farmer-2")).await.unwrap();
    let second = store.create(&listing("second", "farmer-1")).await.unwrap();

    let all: Vec<i64> = store.list(None).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(all, vec![second.id, other.id, first.id]);

    let mine: Vec<i64> = store
        .list(Some("farmer-1"))
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(mine, vec![second.id, first.id]);

    assert!(store.list(Some("nobody")).await.unwrap().is_empty());
}

#[tokio::test]
async fn partial_update_touches_only_given_fields() {
    let store = store().await;
    let created = store.create(&listing("Bajra 50kg", "farmer-1")).await.unwrap();

    let patch: ProductPatch = serde_json::from_value(json!({
        "price_per_kg": 35.0,
        "quality_grade": null,
        "certifications": ["NPOP"]
    }))
    .unwrap();
    let updated = store.update(created.id, &patch).await.unwrap().unwrap();

    assert_eq!(updated.price_per_kg, 35.0);
    assert_eq!(updated.quality_grade, None);
    assert_eq!(updated.certifications, vec!["NPOP"]);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.images, created.images);
    assert_eq!(updated.seller_id, created.seller_id);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn empty_patch_returns_current_record() {
    let store = store().await;
    let created = store.create(&listing("Bajra", "farmer-1")).await.unwrap();

    let same = store
        .update(created.id, &ProductPatch::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(same, created);
}

#[tokio::test]
async fn update_and_delete_unknown_id() {
    let store = store().await;
    let patch = ProductPatch {
        title: Some("x".to_string()),
        ..ProductPatch::default()
    };

    assert!(store.update(999, &patch).await.unwrap().is_none());
    assert!(!store.delete(999).await.unwrap());
}

#[tokio::test]
async fn delete_removes_the_listing() {
    let store = store().await;
    let created = store.create(&listing("Bajra", "farmer-1")).await.unwrap();

    assert!(store.delete(created.id).await.unwrap());
    assert!(store.get(created.id).await.unwrap().is_none());
    assert!(!store.delete(created.id).await.unwrap());
}

#[tokio::test]
async fn empty_sets_are_stored_as_null() {
    let store = store().await;
    let mut input = listing("Bajra", "farmer-1");
    input.certifications.clear();
    input.images.clear();

    let created = store.create(&input).await.unwrap();
    let raw: Option<String> = sqlx::query_scalar("SELECT certifications FROM products WHERE id = ?")
        .bind(created.id)
        .fetch_one(store.pool())
        .await
        .unwrap();

    assert!(raw.is_none());
    assert!(created.certifications.is_empty());
}

#[tokio::test]
async fn malformed_stored_set_reads_back_empty() {
    let store = store().await;
    let created = store.create(&listing("Bajra", "farmer-1")).await.unwrap();

    sqlx::query("UPDATE products SET certifications = ? WHERE id = ?")
        .bind("NPOP, FSSAI")
        .bind(created.id)
        .execute(store.pool())
        .await
        .unwrap();

    let fetched = store.get(created.id).await.unwrap().unwrap();
    assert!(fetched.certifications.is_empty());
    assert_eq!(fetched.images, created.images);
}

#[tokio::test]
async fn quantity_only_update_keeps_everything_else() {
    let store = store().await;
    let mut input = listing("Jowar 25kg", "farmer-1");
    input.certifications = vec!["ISO-22000".to_string(), "Organic-India".to_string()];
    input.images = vec!["img1.jpg".to_string()];
    let created = store.create(&input).await.unwrap();
    assert_eq!(created.certifications, vec!["ISO-22000", "Organic-India"]);

    let patch = ProductPatch {
        available_quantity_kg: Some(50.0),
        ..ProductPatch::default()
    };
    let updated = store.update(created.id, &patch).await.unwrap().unwrap();

    let mut expected = created.clone();
    expected.available_quantity_kg = 50.0;
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn owner_listing_returns_only_that_owner() {
    let store = store().await;
    for title in ["a1", "a2", "a3"] {
        store.create(&listing(title, "A")).await.unwrap();
    }
    store.create(&listing("b1", "B")).await.unwrap();

    let owned = store.list(Some("A")).await.unwrap();

    assert_eq!(owned.len(), 3);
    assert!(owned.iter().all(|p| p.seller_id == "A"));
    let titles: Vec<&str> = owned.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["a3", "a2", "a1"]);
}
