#![allow(clippy::unwrap_used)]
// Integration tests for `UserStore` against a wiremock user API.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use usersync_core::{ClientConfig, CoreError, ErrorKind, NewUser, UserPatch, UserStore};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, UserStore) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(format!("{}/api", server.uri()).parse().unwrap());
    let store = UserStore::from_config(&config).unwrap();
    (server, store)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 200,
        "message": "ok",
        "data": data
    }))
}

fn rejected(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": code,
        "message": message,
        "data": null
    }))
}

fn user(id: u64, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "email": format!("{}@x.com", name.to_lowercase()) })
}

fn page(records: &[serde_json::Value], total: u64) -> serde_json::Value {
    json!({ "records": records, "total": total, "size": 10, "current": 1, "pages": 1 })
}

async fn mount_list(server: &MockServer, body: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(ok(body))
        .expect(times)
        .mount(server)
        .await;
}

fn ids(store: &UserStore) -> Vec<Option<u64>> {
    store.users().iter().map(|u| u.id).collect()
}

// ── Read actions ────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_user_sets_current_user() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/42"))
        .respond_with(ok(json!({ "id": 42, "name": "Ann", "email": "a@x.com" })))
        .expect(1)
        .mount(&server)
        .await;

    store.fetch_user(42).await;

    let current = store.current_user().unwrap();
    assert_eq!(current.id, Some(42));
    assert_eq!(current.name, "Ann");
    assert_eq!(store.error(), None);
    assert!(!store.is_loading());
    assert!(store.last_synced().is_some());
    assert!(store.data_age().is_some());
}

#[tokio::test]
async fn test_fetch_user_failure_keeps_previous_user() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/1"))
        .respond_with(ok(user(1, "Ann")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/2"))
        .respond_with(rejected(404, "user not found"))
        .mount(&server)
        .await;

    store.fetch_user(1).await;
    store.fetch_user(2).await;

    assert_eq!(store.current_user().unwrap().id, Some(1));
    assert_eq!(store.error().as_deref(), Some("user not found"));
    assert_eq!(store.state().error_kind, Some(ErrorKind::NotFound));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_fetch_users_takes_total_from_page() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .and(query_param("page", "2"))
        .and(query_param("size", "2"))
        .respond_with(ok(page(&[user(3, "Cy"), user(4, "Di")], 9)))
        .expect(1)
        .mount(&server)
        .await;

    store
        .fetch_users(NonZeroU32::new(2), NonZeroU32::new(2))
        .await;

    assert_eq!(ids(&store), vec![Some(3), Some(4)]);
    assert_eq!(store.total(), 9);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_fetch_users_counts_bare_sequence() {
    let (server, store) = setup().await;
    mount_list(&server, json!([user(1, "Ann"), user(2, "Bo")]), 1).await;

    store.fetch_users(None, None).await;

    assert_eq!(ids(&store), vec![Some(1), Some(2)]);
    assert_eq!(store.total(), 2);
}

#[tokio::test]
async fn test_fetch_users_unknown_shape_empties_list_without_error() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(ok(page(&[user(1, "Ann")], 1)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(ok(json!({ "rows": "nope" })))
        .mount(&server)
        .await;

    store.fetch_users(None, None).await;
    assert_eq!(store.total(), 1);

    store.fetch_users(None, None).await;
    assert!(store.users().is_empty());
    assert_eq!(store.total(), 0);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_fetch_users_failure_keeps_list() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(ok(page(&[user(1, "Ann")], 1)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    store.fetch_users(None, None).await;
    store.fetch_users(None, None).await;

    assert_eq!(ids(&store), vec![Some(1)]);
    assert_eq!(store.total(), 1);
    assert!(store.error().unwrap().contains("500"));
}

#[tokio::test]
async fn test_fetch_all_users_and_find_by_email() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ok(json!([user(1, "Ann"), user(2, "Bo"), user(3, "Cy")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/email/bo@x.com"))
        .respond_with(ok(user(2, "Bo")))
        .expect(1)
        .mount(&server)
        .await;

    store.fetch_all_users().await;
    store.find_user_by_email("bo@x.com").await;

    assert_eq!(store.total(), 3);
    assert_eq!(store.current_user().unwrap().id, Some(2));
}

// ── Write actions ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_user_refetches_list_once() {
    let (server, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ok(user(8, "Bo")))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, page(&[user(1, "Ann"), user(8, "Bo")], 2), 1).await;

    let draft = NewUser {
        name: "Bo".into(),
        email: "bo@x.com".into(),
        age: None,
    };
    let created = store.create_user(&draft).await.unwrap();

    assert_eq!(created.id, Some(8));
    assert_eq!(ids(&store), vec![Some(1), Some(8)]);
    assert_eq!(store.total(), 2);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].url.path(), "/api/users/page");
}

#[tokio::test]
async fn test_create_user_rejection_is_recorded_and_returned() {
    let (server, store) = setup().await;

    mount_list(&server, page(&[user(1, "Ann")], 1), 1).await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 500,
            "message": "dup email"
        })))
        .expect(1)
        .mount(&server)
        .await;

    store.fetch_users(None, None).await;
    let before = store.users();

    let draft = NewUser {
        name: "Bo".into(),
        email: "b@x.com".into(),
        age: None,
    };
    let err = store.create_user(&draft).await.unwrap_err();

    assert!(matches!(err, CoreError::Rejected { code: Some(500), .. }));
    assert_eq!(store.error().as_deref(), Some("dup email"));
    assert_eq!(store.users(), before);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_update_user_refetches_that_user() {
    let (server, store) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/5"))
        .respond_with(ok(json!({ "id": 5, "name": "Eve", "email": "e@x.com", "age": 30 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/5"))
        .respond_with(ok(json!({ "id": 5, "name": "Eve", "email": "e@x.com", "age": 31 })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = UserPatch {
        age: Some(31),
        ..UserPatch::default()
    };
    let returned = store.update_user(5, &patch).await.unwrap();

    assert_eq!(returned.age, Some(30));
    assert_eq!(store.current_user().unwrap().age, Some(31));
}

#[tokio::test]
async fn test_delete_user_replaces_list_with_refetch() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(ok(page(&[user(1, "Ann"), user(7, "Gus"), user(9, "Ivy")], 3)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/7"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(ok(page(&[user(1, "Ann"), user(9, "Ivy")], 2)))
        .expect(1)
        .mount(&server)
        .await;

    store.fetch_users(None, None).await;
    assert_eq!(store.total(), 3);

    store.delete_user(7).await.unwrap();

    assert_eq!(ids(&store), vec![Some(1), Some(9)]);
    assert_eq!(store.total(), 2);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_delete_user_with_payload_still_refetches() {
    let (server, store) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "deleted",
            "data": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(ok(page(&[user(1, "Ann")], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let data = store.delete_user(7).await.unwrap();

    assert_eq!(data, json!(true));
    assert_eq!(ids(&store), vec![Some(1)]);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_write_with_failed_refresh_still_succeeds() {
    let (server, store) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/7"))
        .respond_with(ok(json!(null)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/page"))
        .respond_with(rejected(500, "list unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    store.delete_user(7).await.unwrap();

    assert_eq!(store.error().as_deref(), Some("list unavailable"));
    assert!(!store.is_loading());
}

// ── Error and loading bookkeeping ───────────────────────────────────

#[tokio::test]
async fn test_next_action_clears_error_and_clear_error_resets_it() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/1"))
        .respond_with(rejected(404, "user not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/2"))
        .respond_with(ok(user(2, "Bo")))
        .mount(&server)
        .await;

    store.fetch_user(1).await;
    assert!(store.error().is_some());
    store.fetch_user(2).await;
    assert_eq!(store.error(), None);

    store.fetch_user(1).await;
    store.clear_error();
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_loading_spans_the_action() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/42"))
        .respond_with(ok(user(42, "Ann")).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;

    let store = Arc::new(store);
    let mut states = store.subscribe();
    assert!(!states.current().loading);

    let task = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.fetch_user(42).await }
    });

    let during = states.changed().await.unwrap();
    assert!(during.loading);
    assert!(store.is_loading());

    task.await.unwrap();
    assert!(!store.is_loading());
    assert!(!states.latest().loading);
}

#[tokio::test]
async fn test_loading_resets_after_failure() {
    let (server, store) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/3"))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(100)))
        .mount(&server)
        .await;

    let store = Arc::new(store);
    let mut states = store.subscribe();
    let task = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.delete_user(3).await }
    });

    assert!(states.changed().await.unwrap().loading);
    assert!(task.await.unwrap().is_err());
    assert!(!store.is_loading());
    assert!(store.error().is_some());
}

#[tokio::test]
async fn test_unreachable_server_records_connection_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let config = ClientConfig::new(format!("http://{addr}/api").parse().unwrap());
    let store = UserStore::from_config(&config).unwrap();

    store.fetch_users(None, None).await;

    assert!(store.error().unwrap().starts_with("Cannot connect"));
    assert_eq!(store.state().error_kind, Some(ErrorKind::Connection));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_state_stream_starts_with_current_state() {
    let (server, store) = setup().await;
    mount_list(&server, page(&[user(1, "Ann")], 1), 1).await;

    store.fetch_users(None, None).await;

    let mut stream = store.subscribe().into_stream();
    let first = stream.next().await.unwrap();
    assert_eq!(first.total, 1);
    assert!(!first.loading);
}
