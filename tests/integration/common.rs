//! Shared fixtures

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

use librarydb_server::{
    api,
    config::AppConfig,
    error::{AppError, AppResult},
    models::{Book, Role, User},
    openlibrary::CatalogSource,
    repository::Repository,
    services::{redis::SessionStore, Services},
    AppState,
};

/// Catalog source answering from canned edition documents
pub struct FakeCatalog {
    editions: Vec<(String, Value)>,
}

impl FakeCatalog {
    pub fn empty() -> Self {
        Self { editions: Vec::new() }
    }

    pub fn with_edition(mut self, olid: &str, edition: Value) -> Self {
        self.editions.push((olid.to_string(), edition));
        self
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn search(&self, _query: &str, _limit: u32, _fields: Option<String>) -> AppResult<Value> {
        let docs: Vec<Value> = self
            .editions
            .iter()
            .map(|(olid, edition)| {
                json!({ "key": format!("/books/{}", olid), "title": edition["title"] })
            })
            .collect();
        Ok(json!({ "numFound": docs.len(), "docs": docs }))
    }

    async fn edition(&self, olid: &str) -> AppResult<Value> {
        self.editions
            .iter()
            .find(|(known, _)| known == olid)
            .map(|(_, edition)| edition.clone())
            .ok_or_else(|| AppError::NotFound(format!("Edition {} not found", olid)))
    }
}

/// Session store kept in process memory; TTLs are ignored
#[derive(Default)]
pub struct MemorySessions {
    entries: Mutex<HashMap<String, (i32, String)>>,
}

#[async_trait]
impl SessionStore for MemorySessions {
    async fn store_session(
        &self,
        key: &str,
        user_id: i32,
        payload: &str,
        _ttl_seconds: u64,
    ) -> AppResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (user_id, payload.to_string()));
        Ok(())
    }

    async fn get_session(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).map(|(_, payload)| payload.clone()))
    }

    async fn delete_session(&self, key: &str) -> AppResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: i32) -> AppResult<()> {
        self.entries
            .lock()
            .unwrap()
            .retain(|_, (owner, _)| *owner != user_id);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn services(pool: PgPool, catalog: FakeCatalog) -> Services {
    let config = AppConfig::default();
    Services::new(
        Repository::new(pool),
        config.auth.clone(),
        Arc::new(MemorySessions::default()),
        Arc::new(catalog),
    )
}

pub fn state(pool: PgPool) -> AppState {
    AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services(pool, FakeCatalog::empty())),
    }
}

/// State over a lazy pool, for requests that never reach the database
pub fn offline_state() -> AppState {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new().connect_lazy(&config.database.url).unwrap();
    state(pool)
}

/// Open a session for an account that need not exist in the database
pub async fn sign_in_as(state: &AppState, userid: i32, role: Role) -> String {
    let user = User {
        userid,
        email: format!("user{}@example.org", userid),
        name: "Reader".to_string(),
        password_hash: String::new(),
        role,
        createdat: chrono::Utc::now(),
    };
    state.services.auth.start_session(&user).await.unwrap()
}

pub async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = api::router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn send_json(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    send_json(Method::POST, uri, token, body)
}

pub fn book(olid: &str, title: &str) -> Book {
    Book {
        openlibraryid: olid.to_string(),
        isbn: "9780140328721".to_string(),
        title: title.to_string(),
        author: "Roald Dahl".to_string(),
        release_year: 1988,
        publisher: Some("Puffin".to_string()),
        language: "en".to_string(),
        pages: Some(96),
        coverurl: None,
    }
}

pub async fn seed_book(repository: &Repository, olid: &str, title: &str) -> Book {
    let book = book(olid, title);
    repository.books.upsert_from_openlibrary(&book).await.unwrap();
    book
}

pub async fn seed_user(repository: &Repository, email: &str) -> User {
    repository
        .users
        .create(email, "Reader", "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaA")
        .await
        .unwrap()
}

pub fn due_in_days(days: i64) -> String {
    (chrono::Utc::now() + chrono::Duration::days(days))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
