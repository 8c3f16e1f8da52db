mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use common::TestApp;

async fn stay_fixture(app: &TestApp) -> (i64, i64) {
    let room_id = app.create_room("R101", 1, 2).await;
    let guest_id = app.create_guest("Ana Cruz").await;
    (guest_id, room_id)
}

#[tokio::test]
async fn stay_is_listed_with_names() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;

    let (status, body) = app
        .post(
            "/api/transactions",
            json!({
                "guest_id": guest_id,
                "room_id": room_id,
                "checkin": "2025-01-25T14:00",
                "checkout": "2025-01-27T12:00",
                "amount": 4500,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"trans_id": 1}));

    let (status, body) = app.get("/api/transactions").await;
    assert_eq!(status, StatusCode::OK);
    let stay = &body[0];
    assert_eq!(stay["guest_name"], "Ana Cruz");
    assert_eq!(stay["room_number"], "R101");
    assert_eq!(stay["checkin"], "2025-01-25T14:00:00");
    assert_eq!(stay["checkout"], "2025-01-27T12:00:00");
    assert_eq!(stay["amount"], "4500.00");
    assert_eq!(
        stay["date_created"],
        Utc::now().date_naive().format("%Y-%m-%d").to_string()
    );
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    app.create_stay(guest_id, room_id, "2025-01-01T10:00").await;
    app.create_stay(guest_id, room_id, "2025-02-01T10:00").await;

    let (_, body) = app.get("/api/transactions").await;
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["trans_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(body[0]["checkout"].is_null());
}

#[tokio::test]
async fn checkout_before_checkin_is_rejected() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;

    let (status, body) = app
        .post(
            "/api/transactions",
            json!({
                "guest_id": guest_id,
                "room_id": room_id,
                "checkin": "2025-01-25T14:00",
                "checkout": "2025-01-24T12:00",
                "amount": "100.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "checkout cannot be before checkin");
}

#[tokio::test]
async fn unknown_guest_or_room_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/transactions",
            json!({
                "guest_id": 4,
                "room_id": 4,
                "checkin": "2025-01-25T14:00",
                "amount": "100.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "guest_id or room_id does not exist");

    let (status, body) = app
        .post(
            "/api/transactions",
            json!({"guest_id": 1, "room_id": 1, "amount": "100.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "guest_id, room_id, checkin, amount are required");
}

#[tokio::test]
async fn sale_decrements_stock_and_rederives_status() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    let trans_id = app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;
    let inv_id = app.create_item("Bottled Water", 101).await;

    let (status, body) = app
        .post(
            &format!("/api/transactions/{trans_id}/sales"),
            json!({"inv_id": inv_id, "quantity": 2, "unit_cost": "35.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"sale_id": 1}));

    let (_, item) = app.get(&format!("/api/inventory/{inv_id}")).await;
    assert_eq!(item["quantity"], 99);
    assert_eq!(item["invstat_name"], "Low Stock");
    assert_eq!(item["invstat_id"], 2);

    let (status, lines) = app
        .get(&format!("/api/transactions/{trans_id}/sales"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        lines,
        json!([{
            "sale_id": 1,
            "inv_id": inv_id,
            "name": "Bottled Water",
            "quantity": 2,
            "unit_cost": "35.00",
            "line_total": "70.00",
        }])
    );
}

#[tokio::test]
async fn selling_the_last_units_marks_out_of_stock() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    let trans_id = app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;
    let inv_id = app.create_item("Chips", 3).await;

    let (status, _) = app
        .post(
            &format!("/api/transactions/{trans_id}/sales"),
            json!({"inv_id": inv_id, "quantity": 3, "unit_cost": 20}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, item) = app.get(&format!("/api/inventory/{inv_id}")).await;
    assert_eq!(item["quantity"], 0);
    assert_eq!(item["invstat_name"], "Out of Stock");
}

#[tokio::test]
async fn overselling_leaves_stock_untouched() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    let trans_id = app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;
    let inv_id = app.create_item("Chips", 3).await;

    let (status, body) = app
        .post(
            &format!("/api/transactions/{trans_id}/sales"),
            json!({"inv_id": inv_id, "quantity": 4, "unit_cost": "20.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Insufficient stock");

    let (_, item) = app.get(&format!("/api/inventory/{inv_id}")).await;
    assert_eq!(item["quantity"], 3);

    let (_, lines) = app
        .get(&format!("/api/transactions/{trans_id}/sales"))
        .await;
    assert!(lines.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sales_against_missing_records_are_not_found() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    let trans_id = app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;

    let (status, body) = app
        .post(
            "/api/transactions/99/sales",
            json!({"inv_id": 1, "quantity": 1, "unit_cost": "1.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Transaction not found");

    let (status, body) = app
        .post(
            &format!("/api/transactions/{trans_id}/sales"),
            json!({"inv_id": 42, "quantity": 1, "unit_cost": "1.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");

    let (status, _) = app.get("/api/transactions/99/sales").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stay_with_sales_cannot_be_deleted() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    let with_sale = app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;
    let plain = app.create_stay(guest_id, room_id, "2025-01-28T14:00").await;
    let inv_id = app.create_item("Soap", 10).await;
    app.post(
        &format!("/api/transactions/{with_sale}/sales"),
        json!({"inv_id": inv_id, "quantity": 1, "unit_cost": "15.00"}),
    )
    .await;

    let (status, body) = app.delete(&format!("/api/transactions/{with_sale}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cannot delete: transaction has sales records");

    let (status, body) = app.delete(&format!("/api/transactions/{plain}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": 1}));

    let (status, _) = app.delete(&format!("/api/transactions/{plain}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn money_outside_the_column_range_is_rejected() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    let trans_id = app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;
    let inv_id = app.create_item("Bottled Water", 20).await;

    let (status, body) = app
        .post(
            &format!("/api/transactions/{trans_id}/sales"),
            json!({
                "inv_id": inv_id,
                "quantity": 2,
                "unit_cost": "79228162514264337593543950335",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid value for unit_cost");

    let (status, lines) = app
        .get(&format!("/api/transactions/{trans_id}/sales"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(lines.as_array().unwrap().is_empty());

    let (_, item) = app.get(&format!("/api/inventory/{inv_id}")).await;
    assert_eq!(item["quantity"], 20);

    for amount in ["123456789012345678.125", "100000000.00", "10.005"] {
        let (status, body) = app
            .post(
                "/api/transactions",
                json!({
                    "guest_id": guest_id,
                    "room_id": room_id,
                    "checkin": "2025-02-01T14:00",
                    "amount": amount,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount}");
        assert_eq!(body["message"], "Invalid value for amount");
    }

    let (status, _) = app
        .post(
            "/api/transactions",
            json!({
                "guest_id": guest_id,
                "room_id": room_id,
                "checkin": "2025-02-01T14:00",
                "amount": "99999999.99",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn concurrent_sales_never_oversell() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    let trans_id = app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;
    let inv_id = app.create_item("Chips", 5).await;
    let uri = format!("/api/transactions/{trans_id}/sales");
    let sale = json!({"inv_id": inv_id, "quantity": 3, "unit_cost": "20.00"});

    let ((first, _), (second, _)) =
        tokio::join!(app.post(&uri, sale.clone()), app.post(&uri, sale.clone()));
    let mut statuses = vec![first, second];
    statuses.sort();
    assert_eq!(
        statuses,
        vec![StatusCode::CREATED, StatusCode::UNPROCESSABLE_ENTITY]
    );

    let (_, item) = app.get(&format!("/api/inventory/{inv_id}")).await;
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["invstat_name"], "Low Stock");
}

#[tokio::test]
async fn consecutive_sales_accumulate() {
    let app = TestApp::new().await;
    let (guest_id, room_id) = stay_fixture(&app).await;
    let trans_id = app.create_stay(guest_id, room_id, "2025-01-25T14:00").await;
    let inv_id = app.create_item("Towel", 10).await;
    let uri = format!("/api/transactions/{trans_id}/sales");

    for quantity in [3, 2] {
        let (status, _) = app
            .post(
                &uri,
                json!({"inv_id": inv_id, "quantity": quantity, "unit_cost": "5.00"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, item) = app.get(&format!("/api/inventory/{inv_id}")).await;
    assert_eq!(item["quantity"], 5);
    let (_, lines) = app.get(&uri).await;
    assert_eq!(lines.as_array().unwrap().len(), 2);
}
