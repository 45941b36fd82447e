//! Notification log behaviour as seen through the fleet services.

use std::sync::{Arc, Mutex};

use fc_core::models::{NewNotification, NewShip, NotificationPriority};
use fc_services::Fleet;
use integration_tests::{memory_fleet, memory_store};

#[tokio::test]
async fn mark_read_then_clear_all_leaves_nothing() {
    let fleet = memory_fleet().await;
    let center = fleet.notifications();

    let first = center.get_notifications().await[0].id.clone();
    assert!(center.mark_as_read(&first).await.unwrap());
    center.clear_all().await.unwrap();

    assert!(center.get_notifications().await.is_empty());
    assert_eq!(center.unread_count().await, 0);
}

#[tokio::test]
async fn every_mutation_is_announced_in_order() {
    let fleet = memory_fleet().await;
    let titles = Arc::new(Mutex::new(Vec::new()));
    let sink = titles.clone();
    fleet.notifications().subscribe(move |n| {
        sink.lock().unwrap().push(n.title.clone());
        Ok(())
    });

    let ship = fleet
        .ships()
        .create(NewShip {
            name: "Nordic Star".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    fleet.ships().delete(&ship.id).await.unwrap();
    fleet.components().delete("c3").await.unwrap();

    assert_eq!(
        *titles.lock().unwrap(),
        vec!["New Ship Added", "Ship Deleted", "Component Deleted"]
    );
}

#[tokio::test]
async fn newest_notification_comes_first() {
    let fleet = memory_fleet().await;
    let center = fleet.notifications();

    let a = center
        .create_notification(NewNotification::new("info", "A", "first"))
        .await
        .unwrap();
    let b = center
        .create_notification(
            NewNotification::new("error", "B", "second").with_priority(NotificationPriority::Error),
        )
        .await
        .unwrap();

    let ids: Vec<String> = center
        .get_notifications()
        .await
        .into_iter()
        .take(2)
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[tokio::test]
async fn log_survives_a_restart_on_the_same_store() {
    let store = memory_store();
    {
        let fleet = Fleet::init(store.clone()).await.unwrap();
        fleet.notifications().mark_all_as_read().await.unwrap();
        fleet.notifications().delete_notification("2").await.unwrap();
    }

    let fleet = Fleet::init(store).await.unwrap();
    let log = fleet.notifications().get_notifications().await;
    assert_eq!(log.len(), 1);
    assert!(log[0].read);
}

#[tokio::test]
async fn a_panicking_subscriber_does_not_block_the_rest() {
    let fleet = memory_fleet().await;
    let reached = Arc::new(Mutex::new(false));
    let flag = reached.clone();

    fleet.notifications().subscribe(|_| panic!("display crashed"));
    fleet.notifications().subscribe(move |_| {
        *flag.lock().unwrap() = true;
        Ok(())
    });

    fleet
        .notifications()
        .create_notification(NewNotification::new("info", "t", "m"))
        .await
        .unwrap();
    assert!(*reached.lock().unwrap());
}
