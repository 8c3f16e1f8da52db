#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use hotel_ops_api::{config::AppConfig, db, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Helper harness for spinning up the application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh, seeded database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestApp::new`] but lets a test tweak configuration first.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        tweak(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = hotel_ops_api::app(state.clone());

        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router response")
    }

    /// Sends a raw body with a JSON content type.
    pub async fn request_raw(&self, method: Method, uri: &str, raw: &'static str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .expect("request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.request(Method::GET, uri, None).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self.request(Method::POST, uri, Some(body)).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self.request(Method::PUT, uri, Some(body)).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.request(Method::DELETE, uri, None).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    /// Creates a room through the API and returns its id.
    pub async fn create_room(&self, room_number: &str, room_type_id: i32, status_id: i32) -> i64 {
        let (status, body) = self
            .post(
                "/api/rooms",
                json!({
                    "room_number": room_number,
                    "room_type_id": room_type_id,
                    "status_id": status_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create room: {body}");
        body["room_id"].as_i64().expect("room_id")
    }

    /// Creates an inventory item through the API and returns its id.
    pub async fn create_item(&self, name: &str, quantity: i32) -> i64 {
        let (status, body) = self
            .post(
                "/api/inventory",
                json!({
                    "name": name,
                    "category_id": 1,
                    "inv_type_id": 1,
                    "quantity": quantity,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create item: {body}");
        body["inv_id"].as_i64().expect("inv_id")
    }

    /// Creates a guest through the API and returns its id.
    pub async fn create_guest(&self, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/guests",
                json!({
                    "name": name,
                    "contact": "09170000000",
                    "gender_id": 1,
                    "dob": "1990-04-12",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create guest: {body}");
        body["guest_id"].as_i64().expect("guest_id")
    }

    /// Records a stay through the API and returns its id.
    pub async fn create_stay(&self, guest_id: i64, room_id: i64, checkin: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/transactions",
                json!({
                    "guest_id": guest_id,
                    "room_id": room_id,
                    "checkin": checkin,
                    "amount": "1500.00",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create stay: {body}");
        body["trans_id"].as_i64().expect("trans_id")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json response")
}
