use super::*;

async fn seeded() -> Storage {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.upsert_city("ANT", "Antwerpen").await.expect("city");
    storage.upsert_city("BRU", "Brussel").await.expect("city");
    storage
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("hotel_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn upsert_city_renames_existing_code() {
    let storage = seeded().await;
    storage.upsert_city("ANT", "Antwerp").await.expect("rename");

    let cities = storage.list_cities().await.expect("cities");
    assert_eq!(cities.len(), 2);
    let antwerp = storage.city_by_code("ANT").await.expect("lookup").expect("city");
    assert_eq!(antwerp.name, "Antwerp");
    assert!(storage.city_by_name("Antwerpen").await.expect("lookup").is_none());
}

#[tokio::test]
async fn save_hotel_creates_then_updates_by_city_and_local_code() {
    let storage = seeded().await;

    let created = storage.save_hotel("ANT", "01", "Hotel 1").await.expect("create");
    assert!(matches!(created, SaveOutcome::Created(_)));

    let updated = storage
        .save_hotel("ANT", "01", "Renamed Hotel")
        .await
        .expect("update");
    assert_eq!(updated, SaveOutcome::Updated(created.hotel_id()));

    let hotels = storage.list_hotels_for_city("ANT").await.expect("hotels");
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0].name, "Renamed Hotel");
    assert_eq!(hotels[0].global_code(), "ANT01");
}

#[tokio::test]
async fn same_local_code_in_other_city_is_a_different_hotel() {
    let storage = seeded().await;
    let ant = storage.save_hotel("ANT", "01", "Antwerp One").await.expect("ant");
    let bru = storage.save_hotel("BRU", "01", "Brussels One").await.expect("bru");
    assert_ne!(ant.hotel_id(), bru.hotel_id());
    assert_eq!(storage.list_hotels_for_city("BRU").await.expect("list").len(), 1);
}

#[tokio::test]
async fn save_hotel_rejects_unknown_city() {
    let storage = seeded().await;
    storage
        .save_hotel("XXX", "01", "Nowhere Inn")
        .await
        .expect_err("foreign key must reject unknown city");
}

#[tokio::test]
async fn lists_hotels_in_insertion_order() {
    let storage = seeded().await;
    storage.save_hotel("ANT", "02", "Hotel 2").await.expect("h2");
    storage.save_hotel("ANT", "01", "Hotel 1").await.expect("h1");

    let names: Vec<String> = storage
        .list_hotels_for_city("ANT")
        .await
        .expect("list")
        .into_iter()
        .map(|hotel| hotel.name)
        .collect();
    assert_eq!(names, vec!["Hotel 2".to_string(), "Hotel 1".to_string()]);
}

#[tokio::test]
async fn delete_hotel_reports_missing_rows() {
    let storage = seeded().await;
    let id = storage
        .save_hotel("ANT", "01", "Hotel 1")
        .await
        .expect("create")
        .hotel_id();

    assert!(storage.delete_hotel(id).await.expect("delete"));
    assert!(storage.hotel_by_id(id).await.expect("lookup").is_none());
    assert!(!storage.delete_hotel(id).await.expect("second delete"));
}

#[tokio::test]
async fn city_with_hotels_cannot_be_deleted() {
    let storage = seeded().await;
    storage.save_hotel("ANT", "01", "Hotel 1").await.expect("create");

    let result = sqlx::query("DELETE FROM cities WHERE code = ?")
        .bind("ANT")
        .execute(&storage.pool)
        .await;
    assert!(result.is_err(), "restrict must protect referenced city");
}
