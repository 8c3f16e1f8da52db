mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn genders_are_listed_by_name() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/guests/lookups").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["genders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["gender_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Female", "Male", "Other"]);
}

#[tokio::test]
async fn guest_lifecycle() {
    let app = TestApp::new().await;
    let guest_id = app.create_guest("Maria Santos").await;
    assert_eq!(guest_id, 1);

    let (status, guest) = app.get(&format!("/api/guests/{guest_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        guest,
        json!({
            "guest_id": 1,
            "name": "Maria Santos",
            "contact": "09170000000",
            "gender_id": 1,
            "gender_name": "Male",
            "dob": "1990-04-12",
        })
    );

    let (status, body) = app
        .put(
            &format!("/api/guests/{guest_id}"),
            json!({
                "name": "Maria S. Reyes",
                "contact": "09179999999",
                "gender_id": 2,
                "dob": "1991-05-01T00:00:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"updated": 1}));

    let (_, guest) = app.get(&format!("/api/guests/{guest_id}")).await;
    assert_eq!(guest["name"], "Maria S. Reyes");
    assert_eq!(guest["gender_name"], "Female");
    assert_eq!(guest["dob"], "1991-05-01");

    let (status, body) = app.delete(&format!("/api/guests/{guest_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": 1}));

    let (status, body) = app.get(&format!("/api/guests/{guest_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Guest not found");
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let app = TestApp::new().await;
    app.create_guest("Zed").await;
    app.create_guest("Amy").await;

    let (status, body) = app.get("/api/guests").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["guest_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/guests",
            json!({"name": "Ana", "gender_id": 1, "dob": "1990-01-01"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name, contact, gender_id, dob are required");

    let (status, body) = app
        .post(
            "/api/guests",
            json!({"name": "Ana", "contact": "0917", "gender_id": 1, "dob": "01/02/1990"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "dob must be a date in YYYY-MM-DD format");

    let (status, body) = app
        .post(
            "/api/guests",
            json!({"name": "Ana", "contact": "0917", "gender_id": 9, "dob": "1990-01-01"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "gender_id does not exist");
}

#[tokio::test]
async fn guest_with_stays_cannot_be_deleted() {
    let app = TestApp::new().await;
    let guest_id = app.create_guest("Ana Cruz").await;
    let room_id = app.create_room("R101", 1, 2).await;
    app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;

    let (status, body) = app.delete(&format!("/api/guests/{guest_id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Cannot delete: guest is used in other records (transactions)."
    );
}

#[tokio::test]
async fn update_of_missing_guest_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .put(
            "/api/guests/5",
            json!({"name": "Ana", "contact": "0917", "gender_id": 1, "dob": "1990-01-01"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Guest not found");
}
