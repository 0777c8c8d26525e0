//! Wishlist against a real Postgres

use sqlx::PgPool;

use librarydb_server::{error::AppError, models::wishlist::WishlistEntry};

use crate::common::{seed_user, services, FakeCatalog};

fn entry(title: &str) -> WishlistEntry {
    WishlistEntry {
        title: Some(title.to_string()),
        author: Some("Ursula K. Le Guin".to_string()),
        coverurl: None,
        releaseyear: Some("1969".to_string()),
    }
}

#[sqlx::test]
#[ignore]
async fn toggle_adds_then_removes(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());
    let user = seed_user(&services.repository, "reader@example.org").await;
    let wishlist = &services.wishlist;

    let wished = wishlist
        .toggle(user.userid, "ol27448w", &entry("The Left Hand of Darkness"))
        .await
        .unwrap();
    assert!(wished);
    assert_eq!(wishlist.ids(user.userid).await.unwrap(), ["OL27448W"]);

    let items = wishlist.list(user.userid).await.unwrap();
    assert_eq!(items[0].title.as_deref(), Some("The Left Hand of Darkness"));
    assert_eq!(items[0].releaseyear.as_deref(), Some("1969"));

    assert!(!wishlist.toggle(user.userid, "OL27448W", &WishlistEntry::default()).await.unwrap());
    assert!(wishlist.ids(user.userid).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore]
async fn remove_is_idempotent_and_validates_ids(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());
    let user = seed_user(&services.repository, "reader@example.org").await;

    services.wishlist.remove(user.userid, "OL1M").await.unwrap();
    services.wishlist.remove(user.userid, "OL1M").await.unwrap();

    let err = services.wishlist.remove(user.userid, "9780140328721").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[sqlx::test]
#[ignore]
async fn summary_counts_wishes_per_book(pool: PgPool) {
    let services = services(pool, FakeCatalog::empty());
    let alice = seed_user(&services.repository, "alice@example.org").await;
    let bob = seed_user(&services.repository, "bob@example.org").await;

    services.wishlist.toggle(alice.userid, "OL1W", &entry("Popular")).await.unwrap();
    services.wishlist.toggle(bob.userid, "OL1W", &entry("Popular")).await.unwrap();
    services.wishlist.toggle(bob.userid, "OL2W", &entry("Niche")).await.unwrap();

    let summary = services.wishlist.summary().await.unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].openlibraryid, "OL1W");
    assert_eq!(summary[0].wishcount, 2);
    assert_eq!(summary[1].wishcount, 1);
}
