//! Stock bucket model: one edition at one condition grade

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const MIN_QUALITY: i32 = 1;
pub const MAX_QUALITY: i32 = 5;

/// Stock bucket joined with its book columns
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StockWithBook {
    pub stockid: i32,
    pub openlibraryid: String,
    pub quality: i16,
    pub quantity: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub release_year: i32,
    pub publisher: Option<String>,
    pub language: String,
    pub pages: Option<i32>,
}

/// Quantity held by a bucket against what is currently rented out of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Availability {
    pub stockid: i32,
    pub quantity: i32,
    /// Sum of `rentqty` over the bucket's active rentals
    pub rented: i64,
}

impl Availability {
    pub fn available(&self) -> i64 {
        self.quantity as i64 - self.rented
    }

    /// A checkout of `rent_qty` copies keeps `rented <= quantity`
    pub fn ensure_can_rent(&self, rent_qty: i32) -> AppResult<()> {
        if rent_qty < 1 {
            return Err(AppError::Validation("rentQty must be >= 1".to_string()));
        }
        if self.available() < rent_qty as i64 {
            return Err(AppError::Conflict("Not enough copies available".to_string()));
        }
        Ok(())
    }

    /// Shrinking the bucket below the rented count is refused
    pub fn ensure_can_hold(&self, new_quantity: i32) -> AppResult<()> {
        if (new_quantity as i64) < self.rented {
            return Err(AppError::Conflict(format!(
                "Cannot set quantity to {} while {} copies are rented",
                new_quantity, self.rented
            )));
        }
        Ok(())
    }
}

/// Availability as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub stockid: i32,
    pub quantity: i32,
    pub rented: i64,
    pub available: i64,
}

impl From<Availability> for AvailabilityResponse {
    fn from(a: Availability) -> Self {
        Self {
            stockid: a.stockid,
            quantity: a.quantity,
            rented: a.rented,
            available: a.available(),
        }
    }
}

pub fn validate_quality(quality: i64) -> AppResult<i16> {
    if !(MIN_QUALITY as i64..=MAX_QUALITY as i64).contains(&quality) {
        return Err(AppError::Validation(format!(
            "quality must be between {} and {}",
            MIN_QUALITY, MAX_QUALITY
        )));
    }
    Ok(quality as i16)
}

pub fn validate_quantity(quantity: i64) -> AppResult<i32> {
    if quantity < 0 || quantity > i32::MAX as i64 {
        return Err(AppError::Validation("quantity must be >= 0".to_string()));
    }
    Ok(quantity as i32)
}
