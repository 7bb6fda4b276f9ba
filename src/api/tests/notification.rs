use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use super::common::*;

#[actix_web::test]
async fn submission_raises_one_unread_notification_until_read() {
    let store = store_with([employee(1000, 10)]);
    let app = test_app!(store);

    let req = authed(TestRequest::post().uri("/api/leave"), &employee_token(1000))
        .set_json(json!({
            "employee_id": 1000,
            "start_date": "2026-03-02",
            "end_date": "2026-03-03",
            "description": "Dentist"
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let req = authed(TestRequest::get().uri("/api/notifications"), &hr_token()).to_request();
    let inbox: Value = test::call_and_read_body_json(&app, req).await;
    let inbox = inbox.as_array().expect("array of notifications");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["id"], created["notification_id"]);
    assert_eq!(inbox[0]["leave_id"], created["leave"]["id"]);
    assert_eq!(inbox[0]["employee_id"], 1000);
    assert_eq!(inbox[0]["description"], "Dentist");
    assert_eq!(inbox[0]["read"], false);

    let id = inbox[0]["id"].as_str().expect("uuid text");
    let req = authed(
        TestRequest::put().uri(&format!("/api/notifications/{}/read", id)),
        &hr_token(),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Notification marked as read");

    let req = authed(TestRequest::get().uri("/api/notifications"), &hr_token()).to_request();
    let inbox: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(inbox, json!([]));

    // marking again is harmless
    let req = authed(
        TestRequest::put().uri(&format!("/api/notifications/{}/read", id)),
        &hr_token(),
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn marking_unknown_notification_is_not_found() {
    let store = empty_store();
    let app = test_app!(store);

    let req = authed(
        TestRequest::put().uri(&format!("/api/notifications/{}/read", uuid::Uuid::new_v4())),
        &hr_token(),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Notification not found");
}

#[actix_web::test]
async fn inbox_is_for_managers_only() {
    let store = store_with([employee(1000, 10)]);
    let app = test_app!(store);

    let req = authed(TestRequest::get().uri("/api/notifications"), &employee_token(1000))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn non_uuid_notification_id_is_a_json_not_found() {
    let store = store_with([employee(1000, 10)]);
    let app = test_app!(store);

    let req = authed(
        TestRequest::put().uri("/api/notifications/not-a-uuid/read"),
        &hr_token(),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().expect("message text");
    assert!(message.contains("/api/notifications/not-a-uuid/read"), "{}", message);
}
