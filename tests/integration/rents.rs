//! Rental invariant against a real Postgres

use axum::http::StatusCode;
use sqlx::PgPool;

use librarydb_server::{error::AppError, services::rents::CheckoutInput};

use crate::common::{
    due_in_days, get, post_json, seed_book, seed_user, send, services, sign_in_as, state,
    FakeCatalog,
};

fn checkout(client_id: i32, stock_id: i32, rent_qty: i64) -> CheckoutInput {
    CheckoutInput {
        client_id: client_id as i64,
        stock_id: stock_id as i64,
        date_until: due_in_days(14),
        rent_qty,
    }
}

#[sqlx::test]
#[ignore]
async fn concurrent_checkouts_never_overbook(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());
    seed_book(&services.repository, "OL1M", "Matilda").await;
    let client = seed_user(&services.repository, "client@example.org").await;
    let stockid = services.stock.set_stock("OL1M", 3, 5, false).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let rents = services.rents.clone();
        let input = checkout(client.userid, stockid, 1);
        handles.push(tokio::spawn(async move { rents.checkout(input).await }));
    }

    let mut granted = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => granted += 1,
            Err(AppError::Conflict(_)) => refused += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(granted, 5);
    assert_eq!(refused, 15);

    let availability = services.stock.availability(stockid).await.unwrap();
    assert_eq!(availability.rented, 5);
    assert_eq!(availability.available(), 0);
}

#[sqlx::test]
#[ignore]
async fn multi_copy_checkout_respects_remaining_copies(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());
    seed_book(&services.repository, "OL1M", "Matilda").await;
    let client = seed_user(&services.repository, "client@example.org").await;
    let stockid = services.stock.set_stock("OL1M", 5, 3, false).await.unwrap();

    services.rents.checkout(checkout(client.userid, stockid, 2)).await.unwrap();

    let err = services.rents.checkout(checkout(client.userid, stockid, 2)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    services.rents.checkout(checkout(client.userid, stockid, 1)).await.unwrap();
}

#[sqlx::test]
#[ignore]
async fn a_rental_cannot_be_returned_twice(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());
    seed_book(&services.repository, "OL1M", "Matilda").await;
    let client = seed_user(&services.repository, "client@example.org").await;
    let stockid = services.stock.set_stock("OL1M", 2, 1, false).await.unwrap();

    let rentid = services.rents.checkout(checkout(client.userid, stockid, 1)).await.unwrap();
    services.rents.return_rent(rentid as i64).await.unwrap();

    let err = services.rents.return_rent(rentid as i64).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: Rent not found or already returned");

    let rent = services.repository.rents.get_by_id(rentid).await.unwrap();
    assert!(rent.returned_at.is_some());

    // The returned copy is available again
    services.rents.checkout(checkout(client.userid, stockid, 1)).await.unwrap();
}

#[sqlx::test]
#[ignore]
async fn unknown_stock_and_client_are_not_found(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());
    seed_book(&services.repository, "OL1M", "Matilda").await;
    let client = seed_user(&services.repository, "client@example.org").await;
    let stockid = services.stock.set_stock("OL1M", 1, 1, false).await.unwrap();

    let err = services.rents.checkout(checkout(client.userid, stockid + 100, 1)).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: Stock not found");

    let err = services.rents.checkout(checkout(client.userid + 100, stockid, 1)).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: Client not found");

    assert!(services.rents.list_active().await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore]
async fn zero_quantity_is_rejected_before_stock_lookup(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());

    let err = services.rents.checkout(checkout(1, 999, 0)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[sqlx::test]
#[ignore]
async fn active_rentals_are_listed_per_client(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());
    seed_book(&services.repository, "OL1M", "Matilda").await;
    let alice = seed_user(&services.repository, "alice@example.org").await;
    let bob = seed_user(&services.repository, "bob@example.org").await;
    let stockid = services.stock.set_stock("OL1M", 4, 3, false).await.unwrap();

    let first = services.rents.checkout(checkout(alice.userid, stockid, 1)).await.unwrap();
    let second = services.rents.checkout(checkout(alice.userid, stockid, 1)).await.unwrap();
    services.rents.checkout(checkout(bob.userid, stockid, 1)).await.unwrap();
    services.rents.return_rent(first as i64).await.unwrap();

    let alice_rents = services.rents.list_active_by_client(alice.userid as i64).await.unwrap();
    assert_eq!(alice_rents.len(), 1);
    assert_eq!(alice_rents[0].rentid, second);
    assert_eq!(alice_rents[0].title, "Matilda");
    assert_eq!(alice_rents[0].quality, 4);
    assert!(!alice_rents[0].overdue);

    assert_eq!(services.rents.list_active().await.unwrap().len(), 2);

    let err = services.rents.list_active_by_client(0).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[sqlx::test]
#[ignore]
async fn rentals_listing_is_scoped_by_role(pool: PgPool) {
    let state = state(pool);
    let repository = &state.services.repository;
    seed_book(repository, "OL1M", "Matilda").await;
    let admin = seed_user(repository, "staff@example.org").await;
    let alice = seed_user(repository, "alice@example.org").await;
    let bob = seed_user(repository, "bob@example.org").await;
    let stockid = state.services.stock.set_stock("OL1M", 3, 4, false).await.unwrap();

    state.services.rents.checkout(checkout(alice.userid, stockid, 1)).await.unwrap();
    state.services.rents.checkout(checkout(bob.userid, stockid, 2)).await.unwrap();

    let admin_token = sign_in_as(&state, admin.userid, admin.role).await;
    let (status, body) = send(&state, get("/api/rents/active", Some(&admin_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let uri = format!("/api/rents/active?clientId={}", bob.userid);
    let (status, body) = send(&state, get(&uri, Some(&admin_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["clientid"], bob.userid);

    let alice_token = sign_in_as(&state, alice.userid, alice.role).await;
    let (status, body) = send(&state, get("/api/rents/active", Some(&alice_token))).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["clientid"], alice.userid);

    let (status, _) = send(&state, get(&uri, Some(&alice_token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test]
#[ignore]
async fn checkout_endpoint_defaults_to_one_copy(pool: PgPool) {
    let state = state(pool);
    let repository = &state.services.repository;
    seed_book(repository, "OL1M", "Matilda").await;
    let admin = seed_user(repository, "staff@example.org").await;
    let stockid = state.services.stock.set_stock("OL1M", 3, 2, false).await.unwrap();
    let token = sign_in_as(&state, admin.userid, admin.role).await;

    let body = format!(
        r#"{{"clientId":"{}","stockId":{},"dateUntil":"{}"}}"#,
        admin.userid,
        stockid,
        due_in_days(7)
    );
    let (status, response) =
        send(&state, post_json("/api/rents/checkout", Some(&token), &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(response["rentId"].as_i64().unwrap() > 0);

    let bad = format!(
        r#"{{"clientId":{},"stockId":{},"dateUntil":"{}","rentQty":"abc"}}"#,
        admin.userid,
        stockid,
        due_in_days(7)
    );
    let (status, _) = send(&state, post_json("/api/rents/checkout", Some(&token), &bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let availability = state.services.stock.availability(stockid).await.unwrap();
    assert_eq!(availability.rented, 1);
}
