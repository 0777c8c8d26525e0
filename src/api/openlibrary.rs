//! OpenLibrary proxy endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

use super::{extract::QueryParams, AuthenticatedUser};

/// Search query
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free text query
    pub q: Option<String>,
    /// Result count, clamped to 1..100 (default 20)
    pub limit: Option<String>,
    /// Comma-separated OpenLibrary field list
    pub fields: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EditionQuery {
    /// Edition OLID, e.g. OL7353617M
    pub olid: Option<String>,
}

/// Search OpenLibrary
#[utoipa::path(
    get,
    path = "/openlibrary/search",
    tag = "openlibrary",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "OpenLibrary search.json result with edition_olid per doc"),
        (status = 400, description = "Missing query"),
        (status = 502, description = "OpenLibrary unavailable")
    )
)]
pub async fn search(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_session): AuthenticatedUser,
    QueryParams(query): QueryParams<SearchQuery>,
) -> AppResult<Json<Value>> {
    // Unparseable limits fall back to the default
    let limit = query.limit.as_deref().and_then(|l| l.trim().parse::<i64>().ok());
    let result = state
        .services
        .catalog
        .search(query.q.as_deref().unwrap_or_default(), limit, query.fields)
        .await?;
    Ok(Json(result))
}

/// Fetch a raw OpenLibrary edition document
#[utoipa::path(
    get,
    path = "/openlibrary/edition",
    tag = "openlibrary",
    security(("bearer_auth" = [])),
    params(EditionQuery),
    responses(
        (status = 200, description = "Edition JSON as returned by OpenLibrary"),
        (status = 400, description = "Invalid edition OLID"),
        (status = 404, description = "Edition not found"),
        (status = 502, description = "OpenLibrary unavailable")
    )
)]
pub async fn edition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_session): AuthenticatedUser,
    QueryParams(query): QueryParams<EditionQuery>,
) -> AppResult<Json<Value>> {
    let olid = query.olid.ok_or_else(|| AppError::missing("olid"))?;
    let edition = state.services.catalog.edition(&olid).await?;
    Ok(Json(edition))
}
