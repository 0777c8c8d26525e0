//! Rental model and related types

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Rental row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rent {
    pub rentid: i32,
    pub rentdate: DateTime<Utc>,
    pub dateuntil: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub rentqty: i32,
    pub stockid: i32,
    pub clientid: i32,
}

/// Active rental joined with its stock bucket and book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActiveRent {
    pub rentid: i32,
    pub rentdate: DateTime<Utc>,
    pub dateuntil: DateTime<Utc>,
    pub rentqty: i32,
    pub clientid: i32,
    pub stockid: i32,
    pub openlibraryid: String,
    pub quality: i16,
    pub title: String,
    pub author: String,
    pub overdue: bool,
}

/// Checkout command, validated
#[derive(Debug, Clone)]
pub struct Checkout {
    pub client_id: i32,
    pub stock_id: i32,
    pub date_until: DateTime<Utc>,
    pub rent_qty: i32,
}

/// Parse a due date given as `YYYY-MM-DD HH:MM:SS` (UTC) or RFC 3339,
/// refusing dates before `now`
pub fn parse_date_until(raw: &str, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|d| d.with_timezone(&Utc)))
        .map_err(|_| AppError::missing("dateUntil"))?;

    if parsed < now {
        return Err(AppError::Validation("dateUntil must not be in the past".to_string()));
    }
    Ok(parsed)
}
