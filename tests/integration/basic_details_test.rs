mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use health_records_api::auth::Role;
use health_records_api::database::BasicDetailsRepository;

fn details_payload(user_id: i64) -> serde_json::Value {
    json!({
        "user": user_id,
        "date_of_diagnosis": "2021-04-01T00:00:00Z",
        "admitted_in_hospital": "2021-04-03T10:30:00Z",
        "covid_test_done": "Yes",
        "covid_test_type": "RT-PCR",
        "covid_test_report": "Positive"
    })
}

#[tokio::test]
async fn test_create_basic_details() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let response = app
        .post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["user"], user.id);
    assert_eq!(response.body["covid_test_done"], "Yes");
    assert_eq!(response.body["covid_test_type"], "RT-PCR");
    assert_eq!(app.store.count_basic_details().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_with_only_required_fields() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let response = app
        .post(
            "/besicdetails/",
            Some(&token),
            json!({ "user": user.id, "covid_test_done": "No" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body["date_of_diagnosis"].is_null());
    assert!(response.body["covid_test_report"].is_null());
}

#[tokio::test]
async fn test_create_twice_conflicts() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let first = app
        .post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(app.store.count_basic_details().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_covid_test_done() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let response = app
        .post(
            "/besicdetails/",
            Some(&token),
            json!({ "user": user.id, "covid_test_done": "Maybe" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.count_basic_details().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_missing_required_field() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let response = app
        .post("/besicdetails/", Some(&token), json!({ "user": user.id }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_create_for_unknown_user_is_bad_request() {
    let app = TestApp::new();
    let (_, admin_token) = app.create_user("root", Role::Admin).await;

    let response = app
        .post("/besicdetails/", Some(&admin_token), details_payload(999))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["field"], "user");
}

#[tokio::test]
async fn test_create_requires_token() {
    let app = TestApp::new();
    let (user, _) = app.create_user("alice", Role::User).await;

    let response = app
        .post("/besicdetails/", None, details_payload(user.id))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"]["code"], "AUTH_1004");
    assert_eq!(app.store.count_basic_details().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_for_another_user_is_forbidden() {
    let app = TestApp::new();
    let (alice, _) = app.create_user("alice", Role::User).await;
    let (_, bob_token) = app.create_user("bob", Role::User).await;

    let response = app
        .post("/besicdetails/", Some(&bob_token), details_payload(alice.id))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_basic_details() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .get(&format!("/besicdetails/{}/", user.id), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"], user.id);
    assert_eq!(response.body["covid_test_report"], "Positive");
}

#[tokio::test]
async fn test_get_missing_basic_details_is_not_found() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let response = app
        .get(&format!("/besicdetails/{}/", user.id), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"]["code"], "RES_4001");
}

#[tokio::test]
async fn test_get_with_malformed_id_is_bad_request() {
    let app = TestApp::new();
    let (_, token) = app.create_user("alice", Role::User).await;

    let response = app.get("/besicdetails/abc/", Some(&token)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_reads_any_user() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    let (_, admin_token) = app.create_user("root", Role::Admin).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .get(&format!("/besicdetails/{}/", user.id), Some(&admin_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);

    let unknown = app.get("/besicdetails/999/", Some(&admin_token)).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_other_users_details_is_forbidden() {
    let app = TestApp::new();
    let (alice, alice_token) = app.create_user("alice", Role::User).await;
    let (_, bob_token) = app.create_user("bob", Role::User).await;
    app.post("/besicdetails/", Some(&alice_token), details_payload(alice.id))
        .await;

    let response = app
        .get(&format!("/besicdetails/{}/", alice.id), Some(&bob_token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_covid_test_done() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .put(
            &format!("/besicdetails/{}/", user.id),
            Some(&token),
            json!({ "covid_test_done": "No" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["covid_test_done"], "No");
    // Untouched fields keep their values
    assert_eq!(response.body["covid_test_type"], "RT-PCR");

    let stored = app
        .store
        .find_basic_details(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.covid_test_done.as_str(), "No");
}

#[tokio::test]
async fn test_update_null_clears_optional_field() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .put(
            &format!("/besicdetails/{}/", user.id),
            Some(&token),
            json!({ "covid_test_report": null }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["covid_test_report"].is_null());
    assert_eq!(response.body["covid_test_done"], "Yes");
}

#[tokio::test]
async fn test_update_with_full_payload_and_matching_user() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .put(
            &format!("/besicdetails/{}/", user.id),
            Some(&token),
            json!({
                "user": user.id,
                "date_of_diagnosis": "2021-04-02T00:00:00Z",
                "admitted_in_hospital": "2021-04-04T10:30:00Z",
                "covid_test_done": "No",
                "covid_test_type": "Antigen",
                "covid_test_report": "Negative"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"], user.id);
    assert_eq!(response.body["covid_test_done"], "No");
    assert_eq!(response.body["covid_test_type"], "Antigen");

    let stored = app
        .store
        .find_basic_details(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.covid_test_done.as_str(), "No");
    assert_eq!(stored.covid_test_report.as_deref(), Some("Negative"));
}

#[tokio::test]
async fn test_update_rejects_null_covid_test_done() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .put(
            &format!("/besicdetails/{}/", user.id),
            Some(&token),
            json!({ "covid_test_done": null }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["field"], "covid_test_done");

    let stored = app
        .store
        .find_basic_details(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.covid_test_done.as_str(), "Yes");
}

#[tokio::test]
async fn test_update_rejects_mismatched_user() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .put(
            &format!("/besicdetails/{}/", user.id),
            Some(&token),
            json!({ "user": user.id + 100, "covid_test_done": "No" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_details_is_not_found() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;

    let response = app
        .put(
            &format!("/besicdetails/{}/", user.id),
            Some(&token),
            json!({ "covid_test_done": "No" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_requires_token() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .put(
            &format!("/besicdetails/{}/", user.id),
            None,
            json!({ "covid_test_done": "No" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_basic_details() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;
    assert_eq!(app.store.count_basic_details().await.unwrap(), 1);

    let response = app
        .delete(&format!("/besicdetails/{}/", user.id), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(app.store.count_basic_details().await.unwrap(), 0);

    let again = app
        .delete(&format!("/besicdetails/{}/", user.id), Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_requires_token() {
    let app = TestApp::new();
    let (user, token) = app.create_user("alice", Role::User).await;
    app.post("/besicdetails/", Some(&token), details_payload(user.id))
        .await;

    let response = app
        .delete(&format!("/besicdetails/{}/", user.id), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.count_basic_details().await.unwrap(), 1);
}
