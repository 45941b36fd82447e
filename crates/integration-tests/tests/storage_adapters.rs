//! The services run unchanged over every `KvStore` adapter.

use std::sync::Arc;

use fc_core::models::NewShip;
use fc_core::traits::{keys, KvStore};
use fc_services::Fleet;
use fc_storage_local::{LocalJsonStore, STORE_FILE_NAME};
use fc_storage_sqlite::SqliteKvStore;
use serde_json::json;

#[tokio::test]
async fn local_store_keeps_changes_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let created = {
        let store: Arc<dyn KvStore> = Arc::new(LocalJsonStore::open_in_dir(dir.path()).await.unwrap());
        let fleet = Fleet::init(store).await.unwrap();
        fleet
            .ships()
            .create(NewShip {
                name: "Arctic Tern".into(),
                ..Default::default()
            })
            .await
            .unwrap()
    };
    assert!(dir.path().join(STORE_FILE_NAME).exists());

    let store: Arc<dyn KvStore> = Arc::new(LocalJsonStore::open_in_dir(dir.path()).await.unwrap());
    let fleet = Fleet::init(store).await.unwrap();
    let ships = fleet.ships().list().await.unwrap();
    assert_eq!(ships.len(), 3);
    assert!(ships.contains(&created));
}

#[tokio::test]
async fn corrupt_local_file_falls_back_to_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(STORE_FILE_NAME), b"{ not json").unwrap();

    let store: Arc<dyn KvStore> = Arc::new(LocalJsonStore::open_in_dir(dir.path()).await.unwrap());
    let fleet = Fleet::init(store).await.unwrap();
    assert_eq!(fleet.ships().list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn sqlite_store_serves_the_same_fixtures() {
    let store: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new("sqlite::memory:").await.unwrap());
    let fleet = Fleet::init(store.clone()).await.unwrap();

    assert!(fleet.ships().delete("s1").await.unwrap());
    let components = store.get(keys::COMPONENTS).await.unwrap().unwrap();
    assert_eq!(components.as_array().map(Vec::len), Some(1));
    assert_eq!(components[0]["id"], json!("c2"));
}

#[tokio::test]
async fn sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("fleet.db").display());

    {
        let store: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(&url).await.unwrap());
        let fleet = Fleet::init(store).await.unwrap();
        fleet.notifications().clear_all().await.unwrap();
    }

    let store: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(&url).await.unwrap());
    let fleet = Fleet::init(store).await.unwrap();
    assert!(fleet.notifications().get_notifications().await.is_empty());
}
