//! Router tests that are rejected before touching the database. They run
//! against a lazy pool, so no Postgres instance is needed.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use common::{body_json, build_app, lazy_pool, test_config, TEST_PASSWORD, TEST_SECRET};

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = build_app(lazy_pool(), test_config(None));

    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let _text = String::from_utf8(body.to_vec()).unwrap();
    // Metric names may or may not appear depending on global recorder state
    // in tests (only one recorder per process).
}

#[tokio::test]
async fn test_create_without_supplier_is_rejected() {
    let app = build_app(lazy_pool(), test_config(None));

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/orders",
            serde_json::json!({ "order_number": "PO-1", "total_amount_excl_vat": "-5" }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    let fields = json["fields"].as_array().unwrap();
    assert_eq!(fields[0]["field"], "supplier");
    assert!(fields.iter().any(|f| f["field"] == "total_amount_excl_vat"));
}

#[tokio::test]
async fn test_create_with_bad_date_is_rejected() {
    let app = build_app(lazy_pool(), test_config(None));

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/orders",
            serde_json::json!({ "supplier": "Acme", "date_order_placed": "next tuesday" }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["fields"][0]["field"], "date_order_placed");
}

#[tokio::test]
async fn test_update_without_fields_is_rejected() {
    let app = build_app(lazy_pool(), test_config(None));

    let resp = app
        .oneshot(json_request(
            "PUT",
            "/api/orders/7c9e6679-7425-40de-944b-e07fc1f90ae7",
            serde_json::json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "no valid fields to update");
}

#[tokio::test]
async fn test_unknown_status_filter_is_rejected() {
    let app = build_app(lazy_pool(), test_config(None));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/orders?status=lost_in_transit")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_milestone_is_rejected() {
    let app = build_app(lazy_pool(), test_config(None));

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/orders/7c9e6679-7425-40de-944b-e07fc1f90ae7/milestones/teleported")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_milestone_with_invalid_date_is_rejected() {
    let app = build_app(lazy_pool(), test_config(None));

    for body in [r#"{"date":"next tuesday"}"#, r#"{"date":"2024-13-01"}"#] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/orders/7c9e6679-7425-40de-944b-e07fc1f90ae7/milestones/shipped")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        // Rejected before any query runs, so no database is needed.
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
    }
}

#[tokio::test]
async fn test_empty_csv_import_is_rejected() {
    let app = build_app(lazy_pool(), test_config(None));

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/orders/import/csv")
                .header("content-type", "text/csv")
                .body(Body::from("supplier,order_number\n"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "CSV contains no data rows");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = build_app(lazy_pool(), test_config(Some(TEST_SECRET)));

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/api/orders").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/orders")
                .header("authorization", "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = build_app(lazy_pool(), test_config(Some(TEST_SECRET)));

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_without_secret_is_not_configured() {
    let app = build_app(lazy_pool(), test_config(None));

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "username": "admin", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "login is not configured");
}

#[tokio::test]
async fn test_issued_token_unlocks_protected_routes() {
    let app = build_app(lazy_pool(), test_config(Some(TEST_SECRET)));

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "username": "admin", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["username"], "admin");
    let token = json["data"]["token"].as_str().unwrap().to_string();

    // Past the auth layer, the handler's own validation answers.
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/orders")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
