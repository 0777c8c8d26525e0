//! Book (catalog edition) model and catalog listing types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Book row, keyed by its OpenLibrary edition id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub openlibraryid: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub release_year: i32,
    pub publisher: Option<String>,
    /// ISO 639-1 language code
    pub language: String,
    pub pages: Option<i32>,
    pub coverurl: Option<String>,
}

/// One stock bucket joined with its book, as shown in the library grid
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CatalogEntry {
    pub stockid: i32,
    pub openlibraryid: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub release_year: i32,
    pub publisher: Option<String>,
    pub language: String,
    pub pages: Option<i32>,
    pub coverurl: Option<String>,
    /// Wear grade of the copies in this bucket (1..5)
    pub condition: i16,
    pub quantity: i32,
    /// Copies not currently rented out
    pub available: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSort {
    #[default]
    Title,
    Author,
    Year,
    Condition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Catalog query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Free text matched against title, author and isbn
    pub q: Option<String>,
    /// Only buckets with at least one available copy
    #[serde(alias = "inStock", alias = "in_stock")]
    pub only_in_stock: Option<bool>,
    pub min_condition: Option<i16>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub sort: Option<CatalogSort>,
    pub dir: Option<SortDirection>,
}

impl CatalogQuery {
    /// ORDER BY clause built only from enum values, never from raw input
    pub fn order_by(&self) -> String {
        let column = match self.sort.unwrap_or_default() {
            CatalogSort::Title => "b.title",
            CatalogSort::Author => "b.author",
            CatalogSort::Year => "b.release_year",
            CatalogSort::Condition => "s.quality",
        };
        let dir = match self.dir.unwrap_or_default() {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        format!("ORDER BY {} {}, b.title ASC, s.quality ASC", column, dir)
    }
}
