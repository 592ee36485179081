//! Integration tests for the mock API's timing and concurrency behaviour

use std::sync::Arc;
use std::time::Duration;
use wardroom::adapters::storage::MemoryStorage;
use wardroom::core::api::{ApiClient, Latency, MockApi};
use wardroom::core::reactive::NotificationStore;
use wardroom::core::router::ApiRequest;
use wardroom::core::store::{seed_demo_data, EntityStore, ListQuery};
use wardroom::domain::{HospitalId, HospitalPatch, NewRole, NotificationType};

fn seeded_api(latency: Latency) -> MockApi {
    let mut store = EntityStore::new();
    seed_demo_data(&mut store).unwrap();
    MockApi::new(store).with_latency(latency)
}

fn rename(name: &str) -> HospitalPatch {
    HospitalPatch {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_call_resolves_after_latency() {
    let api = seeded_api(Latency::fixed(Duration::from_millis(400)));
    let started = tokio::time::Instant::now();

    let stats = api.stats().await.unwrap();

    assert_eq!(stats.hospitals, 2);
    assert!(started.elapsed() >= Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_call_still_applies() {
    let api = seeded_api(Latency::fixed(Duration::from_millis(100)));

    let call = api.create_role(NewRole::new("Porter", "Moves patients"));
    drop(call);

    tokio::time::sleep(Duration::from_millis(150)).await;

    let names = api.inspect(|store| store.role_names()).unwrap();
    assert!(names.contains("Porter"));
}

#[tokio::test(start_paused = true)]
async fn test_reads_see_latest_completed_write() {
    let api = seeded_api(Latency::fixed(Duration::from_millis(100)));
    let id = HospitalId::from_sequence(1);

    api.update_hospital(id.clone(), rename("City General East"))
        .await
        .unwrap();
    let hospital = api.get_hospital(id).await.unwrap();

    assert_eq!(hospital.name, "City General East");
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_writes_last_to_finish_wins() {
    let api = seeded_api(Latency::none());
    let slow = api.clone().with_latency(Latency::fixed(Duration::from_millis(300)));
    let fast = api.clone().with_latency(Latency::fixed(Duration::from_millis(100)));
    let id = HospitalId::from_sequence(1);

    // Issued first, lands last
    let first = slow.update_hospital(id.clone(), rename("Issued First"));
    let second = fast.update_hospital(id.clone(), rename("Issued Second"));
    let (first, second) = futures::join!(first, second);
    first.unwrap();
    second.unwrap();

    let hospital = api.get_hospital(id).await.unwrap();
    assert_eq!(hospital.name, "Issued First");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_creates_get_distinct_ids() {
    let api = seeded_api(Latency::new(
        Duration::from_millis(100),
        Duration::from_millis(800),
    ));

    let calls: Vec<_> = (0..10)
        .map(|i| api.create_role(NewRole::new(format!("Role {i}"), "generated")))
        .collect();
    let roles = futures::future::join_all(calls).await;

    let mut ids: Vec<_> = roles.into_iter().map(|r| r.unwrap().id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
    assert_eq!(api.list_roles(ListQuery::all()).await.unwrap().len(), 15);
}

#[tokio::test]
async fn test_request_surface_feeds_notifications() {
    let feed = Arc::new(NotificationStore::load(
        Arc::new(MemoryStorage::new()),
        "test",
        100,
    ));
    let api = seeded_api(Latency::none()).with_notifications(feed.clone());

    api.request(ApiRequest::delete("/collection/users/4"))
        .await
        .unwrap();
    api.request(ApiRequest::get("/collection/users"))
        .await
        .unwrap();

    let notifications = feed.list();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationType::UserDeleted);
    assert_eq!(feed.unread_count(), 1);
}
