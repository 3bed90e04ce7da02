//! Catalog data must survive a database close and reopen.

use shared::models::ProductCreate;
use store_server::db::DbService;
use store_server::db::repository::ProductRepository;

#[tokio::test]
async fn products_survive_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("store.db");
    let db_path = db_path.to_string_lossy();

    let product_id = {
        let service = DbService::new(&db_path).await.unwrap();
        let repo = ProductRepository::new(service.db.clone());
        let product = repo
            .create(ProductCreate {
                name: "Mug".to_string(),
                description: Some("Ceramic".to_string()),
                image: None,
                category: Some("kitchen".to_string()),
                price: 12.5,
                original_price: None,
                discount_percent: None,
                rating: None,
                review_count: None,
                stock: Some(4),
                colors: None,
                sizes: None,
            })
            .await
            .unwrap();
        product.id.as_ref().unwrap().to_string()
        // service drops here, releasing the RocksDB lock
    };

    let service = DbService::new(&db_path).await.unwrap();
    let repo = ProductRepository::new(service.db.clone());
    let found = repo.find_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(found.name, "Mug");
    assert_eq!(found.price, 12.5);
    assert_eq!(found.stock, 4);
    assert!(found.is_active);
}
