//! OpenLibrary catalog access
//!
//! The HTTP client relays OpenLibrary JSON; the mapper turns an edition
//! document into a local `Book`.

pub mod client;
pub mod mapper;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{AppError, AppResult};

pub use client::OpenLibraryClient;
pub use mapper::book_from_edition;

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const MAX_SEARCH_LIMIT: u32 = 100;

static EDITION_OLID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^OL[0-9]+M$").unwrap());
static ANY_OLID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^OL[0-9]+[A-Z]$").unwrap());

/// External bibliographic source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Raw `search.json` result
    async fn search(&self, query: &str, limit: u32, fields: Option<String>) -> AppResult<Value>;

    /// Raw edition document
    async fn edition(&self, olid: &str) -> AppResult<Value>;
}

pub fn normalize_olid(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalized edition OLID (`OL…M`)
pub fn edition_olid(raw: &str) -> AppResult<String> {
    let olid = normalize_olid(raw);
    if !EDITION_OLID_RE.is_match(&olid) {
        return Err(AppError::Validation(format!(
            "Invalid edition OLID '{}': expected something like OL7353617M",
            raw.trim()
        )));
    }
    Ok(olid)
}

/// Normalized OpenLibrary id of any kind (edition, work, author)
pub fn any_olid(raw: &str) -> AppResult<String> {
    let olid = normalize_olid(raw);
    if !ANY_OLID_RE.is_match(&olid) {
        return Err(AppError::missing("olid"));
    }
    Ok(olid)
}

pub fn clamp_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(l) if l < 1 => 1,
        Some(l) if l > MAX_SEARCH_LIMIT as i64 => MAX_SEARCH_LIMIT,
        Some(l) => l as u32,
        None => DEFAULT_SEARCH_LIMIT,
    }
}

/// Last path segment of an OpenLibrary key (`/books/OL1M` -> `OL1M`) when it is an edition id
fn edition_from_key(key: &str) -> Option<String> {
    let last = normalize_olid(key.rsplit('/').next().unwrap_or_default());
    EDITION_OLID_RE.is_match(&last).then_some(last)
}

/// Best edition OLID for a search doc, or an empty string
pub fn pick_edition_olid(doc: &Value) -> String {
    let from_editions = doc
        .pointer("/editions/docs/0/key")
        .and_then(Value::as_str)
        .and_then(edition_from_key);

    let from_edition_key = || {
        doc.pointer("/edition_key/0")
            .and_then(Value::as_str)
            .and_then(edition_from_key)
    };

    let from_own_key = || doc.get("key").and_then(Value::as_str).and_then(edition_from_key);

    from_editions
        .or_else(from_edition_key)
        .or_else(from_own_key)
        .unwrap_or_default()
}

/// Add `edition_olid` to every doc of a search result
pub fn annotate_edition_olids(result: &mut Value) {
    if let Some(docs) = result.get_mut("docs").and_then(Value::as_array_mut) {
        for doc in docs.iter_mut() {
            let olid = pick_edition_olid(doc);
            if let Some(obj) = doc.as_object_mut() {
                obj.insert("edition_olid".to_string(), Value::String(olid));
            }
        }
    }
}
