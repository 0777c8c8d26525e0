//! Stock endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::stock::{AvailabilityResponse, StockWithBook},
};

use super::{
    extract::{JsonBody, LenientInt, PathParam},
    AdminUser, AuthenticatedUser,
};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStockRequest {
    /// Edition OLID
    pub olid: Option<String>,
    /// Condition grade 1..5
    #[serde(default)]
    #[schema(value_type = i64)]
    pub quality: LenientInt,
    #[serde(default)]
    #[schema(value_type = i64)]
    pub quantity: LenientInt,
    /// Import the edition from OpenLibrary when it is not known yet (default true)
    pub import_if_missing: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct SetStockResponse {
    pub ok: bool,
    pub stockid: i32,
}

/// List every stock bucket with its book
#[utoipa::path(
    get,
    path = "/stock/list",
    tag = "stock",
    security(("bearer_auth" = [])),
    responses(
        (
            status = 200,
            description = "Stock buckets ordered by title then quality",
            body = Vec<StockWithBook>
        ),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_stock(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_session): AuthenticatedUser,
) -> AppResult<Json<Vec<StockWithBook>>> {
    let rows = state.services.stock.list().await?;
    Ok(Json(rows))
}

/// Set the quantity of one stock bucket
#[utoipa::path(
    post,
    path = "/stock/set",
    tag = "stock",
    security(("bearer_auth" = [])),
    request_body = SetStockRequest,
    responses(
        (status = 200, description = "Bucket created or updated", body = SetStockResponse),
        (status = 400, description = "Invalid olid, quality or quantity"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Quantity below the copies currently rented")
    )
)]
pub async fn set_stock(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(request): JsonBody<SetStockRequest>,
) -> AppResult<Json<SetStockResponse>> {
    let olid = request.olid.ok_or_else(|| AppError::missing("olid"))?;
    let quality = request.quality.required("quality")?;
    let quantity = request.quantity.required("quantity")?;

    let stockid = state
        .services
        .stock
        .set_stock(&olid, quality, quantity, request.import_if_missing.unwrap_or(true))
        .await?;

    Ok(Json(SetStockResponse { ok: true, stockid }))
}

/// Copies held, rented and available for a bucket
#[utoipa::path(
    get,
    path = "/stock/{id}/availability",
    tag = "stock",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Stock bucket ID")
    ),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 404, description = "Stock not found")
    )
)]
pub async fn availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_session): AuthenticatedUser,
    PathParam(stockid): PathParam<i32>,
) -> AppResult<Json<AvailabilityResponse>> {
    let availability = state.services.stock.availability(stockid).await?;
    Ok(Json(availability.into()))
}
