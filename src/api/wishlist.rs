//! Wishlist endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::wishlist::{WishlistEntry, WishlistItem, WishlistSummary},
};

use super::{auth::OkResponse, extract::JsonBody, AdminUser, AuthenticatedUser};

#[derive(Deserialize, ToSchema)]
pub struct ToggleRequest {
    /// OpenLibrary id (edition, work or author)
    pub olid: Option<String>,
    #[serde(flatten)]
    pub entry: WishlistEntry,
}

#[derive(Deserialize, ToSchema)]
pub struct RemoveRequest {
    pub olid: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ToggleResponse {
    pub ok: bool,
    /// Whether the book is on the wishlist after the call
    pub wished: bool,
}

#[derive(Serialize, ToSchema)]
pub struct WishlistResponse {
    pub items: Vec<WishlistItem>,
}

#[derive(Serialize, ToSchema)]
pub struct WishlistIdsResponse {
    pub ids: Vec<String>,
}

/// Current user's wishlist
#[utoipa::path(
    get,
    path = "/wishlist/me",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wishlist, newest first", body = WishlistResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_mine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> AppResult<Json<WishlistResponse>> {
    let items = state.services.wishlist.list(session.user_id).await?;
    Ok(Json(WishlistResponse { items }))
}

/// OLIDs on the current user's wishlist
#[utoipa::path(
    get,
    path = "/wishlist/ids",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wished OLIDs", body = WishlistIdsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn ids(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> AppResult<Json<WishlistIdsResponse>> {
    let ids = state.services.wishlist.ids(session.user_id).await?;
    Ok(Json(WishlistIdsResponse { ids }))
}

/// Add the book to the wishlist, or remove it when already there
#[utoipa::path(
    post,
    path = "/wishlist/toggle",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    request_body = ToggleRequest,
    responses(
        (status = 200, description = "New wished state", body = ToggleResponse),
        (status = 400, description = "Missing or invalid olid")
    )
)]
pub async fn toggle(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    JsonBody(request): JsonBody<ToggleRequest>,
) -> AppResult<Json<ToggleResponse>> {
    let olid = request.olid.ok_or_else(|| AppError::missing("olid"))?;
    let wished = state
        .services
        .wishlist
        .toggle(session.user_id, &olid, &request.entry)
        .await?;
    Ok(Json(ToggleResponse { ok: true, wished }))
}

/// Remove the book from the wishlist
#[utoipa::path(
    post,
    path = "/wishlist/remove",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    request_body = RemoveRequest,
    responses(
        (status = 200, description = "Removed (or was not there)", body = OkResponse),
        (status = 400, description = "Missing or invalid olid")
    )
)]
pub async fn remove(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    JsonBody(request): JsonBody<RemoveRequest>,
) -> AppResult<Json<OkResponse>> {
    let olid = request.olid.ok_or_else(|| AppError::missing("olid"))?;
    state.services.wishlist.remove(session.user_id, &olid).await?;
    Ok(Json(OkResponse { ok: true }))
}

/// How many users wish for each book
#[utoipa::path(
    get,
    path = "/wishlist/admin/summary",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wish counts, most wished first", body = Vec<WishlistSummary>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn admin_summary(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<WishlistSummary>>> {
    let rows = state.services.wishlist.summary().await?;
    Ok(Json(rows))
}
