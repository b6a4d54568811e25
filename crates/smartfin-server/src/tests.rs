//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use smartfin_core::ai::ChatClient;
use smartfin_core::db::Database;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router_with_chat(db, None, ServerConfig::default(), Some(ChatClient::mock()))
}

fn setup_test_app_without_chat() -> Router {
    let db = Database::in_memory().unwrap();
    create_router_with_chat(db, None, ServerConfig::default(), None)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Create an account through the API and return its session token.
async fn signup(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            None,
            serde_json::json!({
                "email": email,
                "password": "password123",
                "business_name": "Corner Bakery"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

// ========== Auth ==========

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_request("/api/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_request("/api/transactions", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_request("/api/transactions", Some("not-a-real-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_login_me_flow() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .clone()
        .oneshot(get_request("/api/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["email"], "owner@example.com");
    assert_eq!(json["business_name"], "Corner Bakery");
    // password hash never leaves the server
    assert!(json.get("password_hash").is_none());

    // a fresh login issues a second working token
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({
                "email": "owner@example.com",
                "password": "password123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["token"].as_str().unwrap() != token);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            None,
            serde_json::json!({
                "email": "owner@example.com",
                "password": "short"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let app = setup_test_app();
    signup(&app, "owner@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            None,
            serde_json::json!({
                "email": "Owner@Example.com",
                "password": "password123"
            }),
        ))
        .await
        .unwrap();
    // emails are case-insensitive, so this is the same account
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = setup_test_app();
    signup(&app, "owner@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({
                "email": "owner@example.com",
                "password": "wrong-password"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/logout",
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ========== Transactions ==========

#[tokio::test]
async fn test_create_transaction_with_string_amount() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            Some(&token),
            serde_json::json!({
                "description": "Invoice 7",
                "amount": "1200.50",
                "type": "income",
                "category": "Sales"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 1200.5);
    assert_eq!(json["type"], "income");

    let response = app
        .oneshot(get_request("/api/transactions", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["transactions"][0]["description"], "Invoice 7");
}

#[tokio::test]
async fn test_create_transaction_rejects_bad_amount() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            Some(&token),
            serde_json::json!({
                "amount": "not-money",
                "type": "expense"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transaction_ownership_enforced() {
    let app = setup_test_app();
    let alice = signup(&app, "alice@example.com").await;
    let bob = signup(&app, "bob@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            Some(&alice),
            serde_json::json!({
                "amount": 100.0,
                "type": "income"
            }),
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let id = json["id"].as_i64().unwrap();

    // Bob cannot see, update or delete Alice's transaction
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/transactions/{}", id), Some(&bob)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/transactions/{}", id))
                .header("authorization", format!("Bearer {}", bob))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // still there for Alice
    let response = app
        .oneshot(get_request(
            &format!("/api/transactions/{}", id),
            Some(&alice),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_export_is_csv() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            Some(&token),
            serde_json::json!({
                "description": "Invoice 1",
                "amount": 250.0,
                "type": "income",
                "category": "Sales"
            }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/api/transactions/export", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("date,description,amount,type,category\n"));
    assert!(csv.contains("Invoice 1"));
}

// ========== Reports ==========

#[tokio::test]
async fn test_reports_combine_transactions_and_expenses() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/transactions",
            Some(&token),
            serde_json::json!({ "amount": 1000.0, "type": "income", "category": "Sales" }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/expenses",
            Some(&token),
            serde_json::json!({ "amount": "400", "category": "Rent" }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/api/reports/summary", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["income"], "1000.00");
    assert_eq!(json["expenses"], "400.00");
    assert_eq!(json["balance"], "600.00");

    let response = app
        .oneshot(get_request("/api/reports/categories", Some(&token)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["Rent"]["total"], "400.00");
    assert_eq!(json["Sales"]["count"], 1);
}

#[tokio::test]
async fn test_trends_window_validation() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    for uri in ["/api/reports/trends?months=0", "/api/reports/trends?months=25"] {
        let response = app
            .clone()
            .oneshot(get_request(uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .oneshot(get_request("/api/reports/trends?months=12", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["months"], 12);
    assert_eq!(json["trend"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_projection_window_validation() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .clone()
        .oneshot(get_request(
            "/api/reports/projection?months=13",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get_request("/api/reports/projection", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["months"].as_array().unwrap().len(), 3);
    assert!(json["basis"].is_string());
}

#[tokio::test]
async fn test_dashboard_shape() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .oneshot(get_request("/api/dashboard", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["summary"]["income"], "0.00");
    assert!(json["trend"].is_array());
    assert!(json["top_categories"].is_array());
    assert_eq!(json["counts"]["transactions"], 0);
}

// ========== Notifications ==========

#[tokio::test]
async fn test_low_balance_notification() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/expenses",
            Some(&token),
            serde_json::json!({ "amount": 500.0, "category": "Rent" }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/api/notifications", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let ids: Vec<&str> = json["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"low-balance"));
    assert!(ids.contains(&"track-income"));
}

#[tokio::test]
async fn test_notifications_never_empty() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .oneshot(get_request("/api/notifications", Some(&token)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert!(!json["notifications"].as_array().unwrap().is_empty());
}

// ========== Point of sale ==========

#[tokio::test]
async fn test_checkout_flow() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(&token),
            serde_json::json!({ "name": "Coffee", "price": 4.5, "stock": 10 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let product = get_body_json(response).await;
    let product_id = product["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pos/checkout",
            Some(&token),
            serde_json::json!({
                "items": [{ "product_id": product_id, "quantity": 2 }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["sale"]["total"], 9.0);
    assert_eq!(json["items"][0]["product_name"], "Coffee");

    // stock decremented, income transaction written
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/products/{}", product_id),
            Some(&token),
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["stock"], 8);

    let response = app
        .oneshot(get_request("/api/reports/summary", Some(&token)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["income"], "9.00");
}

#[tokio::test]
async fn test_checkout_insufficient_stock_is_conflict() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(&token),
            serde_json::json!({ "name": "Coffee", "price": 4.5, "stock": 1 }),
        ))
        .await
        .unwrap();
    let product = get_body_json(response).await;
    let product_id = product["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pos/checkout",
            Some(&token),
            serde_json::json!({
                "items": [{ "product_id": product_id, "quantity": 5 }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // nothing was written
    let response = app
        .oneshot(get_request("/api/sales", Some(&token)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["total"], 0);
}

// ========== Assistant ==========

#[tokio::test]
async fn test_chat_round_trip_with_mock_backend() {
    let app = setup_test_app();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            Some(&token),
            serde_json::json!({ "message": "How is the business doing?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["reply"].as_str().unwrap().contains("How is the business doing?"));

    let response = app
        .oneshot(get_request("/api/chat/health", Some(&token)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["configured"], true);
    assert_eq!(json["available"], true);
}

#[tokio::test]
async fn test_chat_unconfigured_is_service_unavailable() {
    let app = setup_test_app_without_chat();
    let token = signup(&app, "owner@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/chat",
            Some(&token),
            serde_json::json!({ "message": "hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .oneshot(get_request("/api/chat/health", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["configured"], false);
}
