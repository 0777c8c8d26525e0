//! Router behaviour that does not need Postgres or Redis

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use librarydb_server::{api, models::Role};

use crate::common::{get, offline_state, post_json, send, send_json, sign_in_as};

#[tokio::test]
async fn health_reports_version() {
    let (status, body) = send(&offline_state(), get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_paths_return_json_404() {
    let (status, body) = send(&offline_state(), get("/api/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/api/nope");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let state = offline_state();
    for uri in [
        "/api/auth/me",
        "/api/books",
        "/api/stock/list",
        "/api/rents/active",
        "/api/wishlist/me",
        "/api/users",
    ] {
        let (status, body) = send(&state, get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["code"], "not_authenticated", "{}", uri);
    }

    let checkout = r#"{"clientId":1,"stockId":1,"dateUntil":"2099-01-01 00:00:00"}"#;
    let (status, _) = send(&state, post_json("/api/rents/checkout", None, checkout)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&state, get("/api/auth/me", Some("not-a-session"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_refuse_regular_users() {
    let state = offline_state();
    let token = sign_in_as(&state, 2, Role::User).await;

    let requests = [
        post_json("/api/stock/set", Some(&token), r#"{"olid":"OL1M","quality":3,"quantity":1}"#),
        post_json("/api/books/import-edition", Some(&token), r#"{"olid":"OL1M"}"#),
        post_json(
            "/api/rents/checkout",
            Some(&token),
            r#"{"clientId":2,"stockId":1,"dateUntil":"2099-01-01 00:00:00"}"#,
        ),
        post_json("/api/rents/return", Some(&token), r#"{"rentId":1}"#),
        send_json(Method::PUT, "/api/users/2/role", Some(&token), r#"{"role":"admin"}"#),
        get("/api/users", Some(&token)),
        get("/api/wishlist/admin/summary", Some(&token)),
    ];

    for request in requests {
        let uri = request.uri().to_string();
        let (status, body) = send(&state, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["code"], "forbidden", "{}", uri);
    }
}

#[tokio::test]
async fn users_cannot_list_someone_elses_rentals() {
    let state = offline_state();
    let token = sign_in_as(&state, 2, Role::User).await;

    let (status, body) = send(&state, get("/api/rents/active?clientId=3", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Users may only list their own rentals");

    let (status, body) = send(&state, get("/api/rents/active?clientId=abc", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing/invalid: clientId");
}

#[tokio::test]
async fn checkout_reports_the_offending_field() {
    let state = offline_state();
    let token = sign_in_as(&state, 1, Role::Admin).await;
    let due = "2099-01-01 00:00:00";

    let mut cases = vec![
        (json!({"stockId": 1, "dateUntil": due}), "clientId"),
        (json!({"clientId": "x", "stockId": 1, "dateUntil": due}), "clientId"),
        (json!({"clientId": 2, "stockId": [1], "dateUntil": due}), "stockId"),
        (json!({"clientId": 2, "stockId": 1}), "dateUntil"),
    ];
    for rent_qty in [json!("abc"), json!(1.5), json!(true), json!([2])] {
        let body = json!({"clientId": 2, "stockId": 1, "dateUntil": due, "rentQty": rent_qty});
        cases.push((body, "rentQty"));
    }

    for (body, field) in cases {
        let body = body.to_string();
        let (status, response) =
            send(&state, post_json("/api/rents/checkout", Some(&token), &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response["error"], format!("Missing/invalid: {}", field), "{}", body);
    }

    let (status, response) = send(
        &state,
        post_json("/api/rents/return", Some(&token), r#"{"rentId":"soon"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Missing/invalid: rentId");
}

#[tokio::test]
async fn bad_path_and_query_values_use_the_error_body() {
    let state = offline_state();
    let token = sign_in_as(&state, 2, Role::User).await;

    for uri in [
        "/api/stock/abc/availability",
        "/api/books?minCondition=x",
        "/api/books?sort=foo",
        "/api/books?onlyInStock=maybe",
    ] {
        let (status, body) = send(&state, get(uri, Some(&token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], "bad_value", "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }

    let admin = sign_in_as(&state, 1, Role::Admin).await;
    let (status, body) = send(
        &state,
        send_json(Method::PUT, "/api/users/abc/role", Some(&admin), r#"{"role":"user"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_value");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (status, body) =
        send(&offline_state(), post_json("/api/auth/register", None, "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_value");
}

#[tokio::test]
async fn register_validates_before_touching_the_database() {
    let (status, body) = send(
        &offline_state(),
        post_json(
            "/api/auth/register",
            None,
            r#"{"email":"not-an-email","name":"Reader","password":"short"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing/invalid: email, password");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let state = offline_state();
    let (status, body) = send(&state, post_json("/api/auth/logout", None, "{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let token = sign_in_as(&state, 2, Role::User).await;
    let (status, _) = send(&state, post_json("/api/auth/logout", Some(&token), "{}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&state, get("/api/rents/active?clientId=3", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(&offline_state(), get("/api-docs/openapi.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "LibraryDB API");
    assert!(body["paths"]["/rents/checkout"].is_object());
}

#[tokio::test]
async fn cors_allows_the_configured_origin_with_credentials() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/books")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = api::router(offline_state()).oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}
