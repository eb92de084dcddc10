use mercado_core::traits::ProductStore;
use mercado_db::ProductRepository;

use crate::integration::common::{make_record, setup_test_db};

#[tokio::test]
async fn upsert_inserts_new_products() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);

    let outcome = repo
        .upsert(&[
            make_record("https://articulo.example/MLM-1", "A"),
            make_record("https://articulo.example/MLM-2", "B"),
        ])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.modified, 0);
    assert_eq!(outcome.affected(), 2);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn upsert_same_record_twice_is_idempotent() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);
    let record = make_record("https://articulo.example/MLM-1", "A");

    let first = repo.upsert(std::slice::from_ref(&record)).await.unwrap();
    let second = repo.upsert(std::slice::from_ref(&record)).await.unwrap();

    assert_eq!(first.inserted, 1);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.modified, 1);
    assert_eq!(second.affected(), 1);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn upsert_replaces_fields_and_keeps_identity() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);

    repo.upsert(&[make_record("https://articulo.example/MLM-1", "Old Seller")])
        .await
        .unwrap();
    let before = repo
        .get_by_url("https://articulo.example/MLM-1")
        .await
        .unwrap()
        .expect("Should find the product");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let mut updated = make_record("https://articulo.example/MLM-1", "New Seller");
    updated.discounted_price = "399".into();
    repo.upsert(&[updated]).await.unwrap();

    let after = repo
        .get_by_url("https://articulo.example/MLM-1")
        .await
        .unwrap()
        .expect("Should find the product");

    assert_eq!(after.id, before.id);
    assert_eq!(after.record.seller, "New Seller");
    assert_eq!(after.record.discounted_price, "399");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn duplicate_key_in_one_batch_latest_wins() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);

    let outcome = repo
        .upsert(&[
            make_record("https://articulo.example/MLM-1", "First"),
            make_record("https://articulo.example/MLM-1", "Second"),
        ])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.modified, 1);
    let stored = repo
        .get_by_url("https://articulo.example/MLM-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.record.seller, "Second");
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn empty_batch_is_noop() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);

    let outcome = repo.upsert(&[]).await.unwrap();

    assert_eq!(outcome.affected(), 0);
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn failed_batch_writes_nothing() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool.clone());

    // A NUL byte is rejected by PostgreSQL text columns, failing mid-batch.
    let mut bad = make_record("https://articulo.example/MLM-2", "B");
    bad.title = "bad\0title".into();

    let err = repo
        .upsert(&[make_record("https://articulo.example/MLM-1", "A"), bad])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        mercado_core::AppError::PersistenceUnavailable(_)
    ));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn list_returns_most_recent_first_with_limit() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);

    for i in 0..4 {
        repo.upsert(&[make_record(&format!("https://articulo.example/MLM-{i}"), "S")])
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let listed = repo.list(2).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].record.canonical_url, "https://articulo.example/MLM-3");
    assert_eq!(listed[1].record.canonical_url, "https://articulo.example/MLM-2");
}

#[tokio::test]
async fn list_with_unbounded_limit_returns_everything() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);

    repo.upsert(&[
        make_record("https://articulo.example/MLM-1", "A"),
        make_record("https://articulo.example/MLM-2", "B"),
    ])
    .await
    .unwrap();

    let listed = repo.list(usize::MAX).await.unwrap();

    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn stored_product_serializes_flat() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);

    repo.upsert(&[make_record("https://articulo.example/MLM-1", "A")])
        .await
        .unwrap();
    let stored = repo.list(1).await.unwrap().remove(0);

    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["canonical_url"], "https://articulo.example/MLM-1");
    assert_eq!(json["seller"], "A");
    assert!(json["id"].is_string());
    assert!(json.get("record").is_none());
}

#[tokio::test]
async fn works_through_product_store_trait() {
    let (pool, _container) = setup_test_db().await;
    let repo = ProductRepository::new(pool);

    async fn store_one<S: ProductStore>(store: &S) -> u64 {
        store
            .upsert(&[make_record("https://articulo.example/MLM-9", "T")])
            .await
            .unwrap()
            .affected()
    }

    assert_eq!(store_one(&repo).await, 1);
    repo.health_check().await.unwrap();
}
