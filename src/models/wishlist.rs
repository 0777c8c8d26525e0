//! Wishlist model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Wishlist entry of one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WishlistItem {
    pub openlibraryid: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub coverurl: Option<String>,
    pub releaseyear: Option<String>,
    pub createdat: DateTime<Utc>,
}

/// How many users wish for a given book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WishlistSummary {
    pub openlibraryid: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub coverurl: Option<String>,
    pub releaseyear: Option<String>,
    pub wishcount: i64,
}

/// Descriptive columns stored alongside a wished OLID
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct WishlistEntry {
    pub title: Option<String>,
    pub author: Option<String>,
    pub coverurl: Option<String>,
    /// Year as text; the front end sends either a number or a publish date string
    #[serde(default, deserialize_with = "string_or_number")]
    #[schema(value_type = Option<String>)]
    pub releaseyear: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
