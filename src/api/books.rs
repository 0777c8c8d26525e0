//! Book catalog endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CatalogEntry, CatalogQuery},
};

use super::{
    extract::{JsonBody, PathParam, QueryParams},
    AdminUser, AuthenticatedUser,
};

#[derive(Deserialize, ToSchema)]
pub struct ImportEditionRequest {
    /// Edition OLID, e.g. OL7353617M
    pub olid: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ImportEditionResponse {
    pub ok: bool,
    pub book: Book,
}

/// List stock buckets with their books and available counts
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(CatalogQuery),
    responses(
        (status = 200, description = "Catalog entries", body = Vec<CatalogEntry>),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_catalog(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_session): AuthenticatedUser,
    QueryParams(query): QueryParams<CatalogQuery>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let entries = state.services.catalog.list_catalog(&query).await?;
    Ok(Json(entries))
}

/// Get a locally known book
#[utoipa::path(
    get,
    path = "/books/{olid}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("olid" = String, Path, description = "Edition OLID")
    ),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_session): AuthenticatedUser,
    PathParam(olid): PathParam<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&olid).await?;
    Ok(Json(book))
}

/// Import (or refresh) an edition from OpenLibrary
#[utoipa::path(
    post,
    path = "/books/import-edition",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = ImportEditionRequest,
    responses(
        (status = 201, description = "Edition imported", body = ImportEditionResponse),
        (status = 400, description = "Invalid edition OLID"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Edition not found on OpenLibrary"),
        (status = 502, description = "OpenLibrary unavailable")
    )
)]
pub async fn import_edition(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(request): JsonBody<ImportEditionRequest>,
) -> AppResult<(StatusCode, Json<ImportEditionResponse>)> {
    let olid = request.olid.ok_or_else(|| AppError::missing("olid"))?;
    let book = state.services.catalog.import_edition(&olid).await?;

    Ok((StatusCode::CREATED, Json(ImportEditionResponse { ok: true, book })))
}
