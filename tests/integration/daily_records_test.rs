mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use health_records_api::auth::Role;
use health_records_api::database::DailyRecordRepository;

#[tokio::test]
async fn test_create_daily_record() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let temperature = app.create_record_name("Temperature").await;

    let response = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({
                "user": user.id,
                "recordname": temperature.id,
                "value": 37.5,
                "datetime": "2021-05-01T08:00:00Z"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["user"], user.id);
    assert_eq!(response.body["recordname"], temperature.id);
    assert_eq!(response.body["value"], 37.5);
    assert_eq!(app.store.count_daily_records().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_defaults_datetime_to_now() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let spo2 = app.create_record_name("SpO2").await;

    let response = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({ "user": user.id, "recordname": spo2.id, "value": 97 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body["datetime"].is_string());
}

#[tokio::test]
async fn test_create_with_unknown_record_name_is_bad_request() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let response = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({ "user": user.id, "recordname": 42, "value": 1.0 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["field"], "recordname");
    assert_eq!(app.store.count_daily_records().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_with_non_numeric_value_is_bad_request() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    let response = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({ "user": user.id, "recordname": pulse.id, "value": "fast" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_requires_token() {
    let app = TestApp::new();
    let (user, _) = app.create_user("alice", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    let response = app
        .post(
            "/dailyrecords/",
            None,
            json!({ "user": user.id, "recordname": pulse.id, "value": 72 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.count_daily_records().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_for_another_user_is_forbidden() {
    let app = TestApp::new();
    let (alice, _) = app.create_user("alice", Role::User).await;
    let (_, bob_token) = app.create_user("bob", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    let response = app
        .post(
            "/dailyrecords/",
            Some(&bob_token),
            json!({ "user": alice.id, "recordname": pulse.id, "value": 72 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_returns_records_ordered_by_datetime() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let temperature = app.create_record_name("Temperature").await;

    for (value, datetime) in [
        (38.1, "2021-05-03T08:00:00Z"),
        (37.2, "2021-05-01T08:00:00Z"),
        (37.8, "2021-05-02T08:00:00Z"),
    ] {
        let response = app
            .post(
                "/dailyrecords/",
                Some(&token),
                json!({
                    "user": user.id,
                    "recordname": temperature.id,
                    "value": value,
                    "datetime": datetime
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = app
        .get(&format!("/dailyrecords/{}/", user.id), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let records = response.body.as_array().unwrap();
    assert_eq!(records.len(), 3);
    let values: Vec<f64> = records.iter().map(|r| r["value"].as_f64().unwrap()).collect();
    assert_eq!(values, vec![37.2, 37.8, 38.1]);
}

#[tokio::test]
async fn test_list_only_returns_own_records() {
    let app = TestApp::new();
    let (alice, alice_token) = app.create_user("alice", Role::User).await;
    let (bob, bob_token) = app.create_user("bob", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    app.post(
        "/dailyrecords/",
        Some(&alice_token),
        json!({ "user": alice.id, "recordname": pulse.id, "value": 70 }),
    )
    .await;
    app.post(
        "/dailyrecords/",
        Some(&bob_token),
        json!({ "user": bob.id, "recordname": pulse.id, "value": 80 }),
    )
    .await;

    let response = app
        .get(&format!("/dailyrecords/{}/", alice.id), Some(&alice_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let records = response.body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["user"], alice.id);
}

#[tokio::test]
async fn test_list_empty_is_ok() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let response = app
        .get(&format!("/dailyrecords/{}/", user.id), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_list_other_user_is_forbidden_and_unknown_user_not_found() {
    let app = TestApp::new();
    let (alice, _) = app.create_user("alice", Role::User).await;
    let (_, bob_token) = app.create_user("bob", Role::User).await;
    let (_, admin_token) = app.create_user("root", Role::Admin).await;

    let forbidden = app
        .get(&format!("/dailyrecords/{}/", alice.id), Some(&bob_token))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let unknown = app.get("/dailyrecords/999/", Some(&admin_token)).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_daily_record_by_record_id() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let temperature = app.create_record_name("Temperature").await;

    let created = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({ "user": user.id, "recordname": temperature.id, "value": 37.0 }),
        )
        .await;
    let record_id = created.body["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/dailyrecords/{}/", record_id),
            Some(&token),
            json!({ "value": 39.4 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], record_id);
    assert_eq!(response.body["value"], 39.4);
    assert_eq!(response.body["recordname"], temperature.id);

    let stored = app
        .store
        .find_daily_record(record_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, 39.4);
}

#[tokio::test]
async fn test_update_leaves_other_records_untouched() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    let first = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({
                "user": user.id,
                "recordname": pulse.id,
                "value": 40,
                "datetime": "2021-05-01T08:00:00Z"
            }),
        )
        .await;
    let second = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({
                "user": user.id,
                "recordname": pulse.id,
                "value": 50,
                "datetime": "2021-05-02T08:00:00Z"
            }),
        )
        .await;
    let first_id = first.body["id"].as_i64().unwrap();
    let second_id = second.body["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/dailyrecords/{}/", first_id),
            Some(&token),
            json!({ "value": 99 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let listed = app
        .get(&format!("/dailyrecords/{}/", user.id), Some(&token))
        .await;
    let records = listed.body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], first_id);
    assert_eq!(records[0]["value"], 99.0);
    assert_eq!(records[1]["id"], second_id);
    assert_eq!(records[1]["value"], 50.0);
    assert_eq!(records[1]["datetime"], second.body["datetime"]);
}

#[tokio::test]
async fn test_update_with_full_payload_and_matching_user() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let temperature = app.create_record_name("Temperature").await;
    let spo2 = app.create_record_name("SpO2").await;

    let created = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({ "user": user.id, "recordname": temperature.id, "value": 37.0 }),
        )
        .await;
    let record_id = created.body["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/dailyrecords/{}/", record_id),
            Some(&token),
            json!({
                "user": user.id,
                "recordname": spo2.id,
                "value": 99,
                "datetime": "2021-06-01T09:00:00Z"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"], user.id);
    assert_eq!(response.body["recordname"], spo2.id);
    assert_eq!(response.body["value"], 99.0);

    let stored = app
        .store
        .find_daily_record(record_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.recordname, spo2.id);
    assert_eq!(stored.value, 99.0);
}

#[tokio::test]
async fn test_update_unknown_record_is_not_found() {
    let app = TestApp::new();
    let (_, token) = app.create_user("alice", Role::User).await;

    let response = app
        .put("/dailyrecords/12345/", Some(&token), json!({ "value": 1.0 }))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_owner_change_and_unknown_record_name() {
    let app = TestApp::new();
    let (alice, token) = app.create_user("alice", Role::User).await;
    let (bob, _) = app.create_user("bob", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    let created = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({ "user": alice.id, "recordname": pulse.id, "value": 72 }),
        )
        .await;
    let record_id = created.body["id"].as_i64().unwrap();
    let uri = format!("/dailyrecords/{}/", record_id);

    let moved = app.put(&uri, Some(&token), json!({ "user": bob.id })).await;
    assert_eq!(moved.status, StatusCode::BAD_REQUEST);

    let renamed = app.put(&uri, Some(&token), json!({ "recordname": 999 })).await;
    assert_eq!(renamed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_other_users_record_is_forbidden() {
    let app = TestApp::new();
    let (alice, alice_token) = app.create_user("alice", Role::User).await;
    let (_, bob_token) = app.create_user("bob", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    let created = app
        .post(
            "/dailyrecords/",
            Some(&alice_token),
            json!({ "user": alice.id, "recordname": pulse.id, "value": 72 }),
        )
        .await;
    let record_id = created.body["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/dailyrecords/{}/", record_id),
            Some(&bob_token),
            json!({ "value": 10 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_all_records_for_user() {
    let app = TestApp::new();
    let (alice, alice_token) = app.create_user("alice", Role::User).await;
    let (bob, bob_token) = app.create_user("bob", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    for value in [70, 71, 72] {
        app.post(
            "/dailyrecords/",
            Some(&alice_token),
            json!({ "user": alice.id, "recordname": pulse.id, "value": value }),
        )
        .await;
    }
    app.post(
        "/dailyrecords/",
        Some(&bob_token),
        json!({ "user": bob.id, "recordname": pulse.id, "value": 80 }),
    )
    .await;
    assert_eq!(app.store.count_daily_records().await.unwrap(), 4);

    let response = app
        .delete(&format!("/dailyrecords/{}/", alice.id), Some(&alice_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["deleted"], 3);
    assert_eq!(app.store.count_daily_records().await.unwrap(), 1);

    let remaining = app
        .get(&format!("/dailyrecords/{}/", alice.id), Some(&alice_token))
        .await;
    assert_eq!(remaining.body, json!([]));
}

#[tokio::test]
async fn test_delete_requires_token() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;
    app.post(
        "/dailyrecords/",
        Some(&token),
        json!({ "user": user.id, "recordname": pulse.id, "value": 72 }),
    )
    .await;

    let response = app
        .delete(&format!("/dailyrecords/{}/", user.id), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.count_daily_records().await.unwrap(), 1);
}

#[tokio::test]
async fn test_get_and_delete_single_record() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let pulse = app.create_record_name("Pulse").await;

    let first = app
        .post(
            "/dailyrecords/",
            Some(&token),
            json!({ "user": user.id, "recordname": pulse.id, "value": 70 }),
        )
        .await;
    app.post(
        "/dailyrecords/",
        Some(&token),
        json!({ "user": user.id, "recordname": pulse.id, "value": 75 }),
    )
    .await;
    let record_id = first.body["id"].as_i64().unwrap();
    let uri = format!("/dailyrecords/record/{}/", record_id);

    let fetched = app.get(&uri, Some(&token)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["value"], 70.0);

    let deleted = app.delete(&uri, Some(&token)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(app.store.count_daily_records().await.unwrap(), 1);

    let gone = app.get(&uri, Some(&token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_names_admin_only_create() {
    let app = TestApp::new();
    let (_, user_token) = app.create_user("alice", Role::User).await;
    let (_, admin_token) = app.create_user("root", Role::Admin).await;

    let forbidden = app
        .post(
            "/recordnames/",
            Some(&user_token),
            json!({ "recordname": "Pulse" }),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let created = app
        .post(
            "/recordnames/",
            Some(&admin_token),
            json!({ "recordname": "Pulse" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["recordname"], "Pulse");

    let duplicate = app
        .post(
            "/recordnames/",
            Some(&admin_token),
            json!({ "recordname": "Pulse" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let listed = app.get("/recordnames/", Some(&user_token)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
}
