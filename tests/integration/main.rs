//! Integration tests
//!
//! `api` runs without backing services. The other modules need a Postgres
//! reachable through `DATABASE_URL` and are ignored by default.
//! Run them with: cargo test -- --ignored

mod api;
mod common;
mod rents;
mod wishlist;
