//! Rental endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::rent::ActiveRent,
    services::rents::CheckoutInput,
};

use super::{
    auth::OkResponse,
    extract::{JsonBody, LenientInt, QueryParams},
    AdminUser, AuthenticatedUser,
};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    #[schema(value_type = i64)]
    pub client_id: LenientInt,
    #[serde(default)]
    #[schema(value_type = i64)]
    pub stock_id: LenientInt,
    /// `YYYY-MM-DD HH:MM:SS` (UTC) or RFC 3339
    pub date_until: Option<String>,
    /// Copies to rent (default 1)
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub rent_qty: LenientInt,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub ok: bool,
    pub rent_id: i32,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    #[serde(default)]
    #[schema(value_type = i64)]
    pub rent_id: LenientInt,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRentsQuery {
    /// Client whose rentals to list; admins may omit it to list every active rental
    pub client_id: Option<String>,
}

/// Rent copies of a stock bucket to a client
#[utoipa::path(
    post,
    path = "/rents/checkout",
    tag = "rents",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Rental recorded", body = CheckoutResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Stock or client not found"),
        (status = 409, description = "Not enough copies available")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(request): JsonBody<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    let input = CheckoutInput {
        client_id: request.client_id.required("clientId")?,
        stock_id: request.stock_id.required("stockId")?,
        date_until: request.date_until.ok_or_else(|| AppError::missing("dateUntil"))?,
        rent_qty: request.rent_qty.or_default(1, "rentQty")?,
    };

    let rent_id = state.services.rents.checkout(input).await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse { ok: true, rent_id })))
}

/// Mark an active rental as returned
#[utoipa::path(
    post,
    path = "/rents/return",
    tag = "rents",
    security(("bearer_auth" = [])),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Rental returned", body = OkResponse),
        (status = 400, description = "Missing or invalid rentId"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Rent not found or already returned")
    )
)]
pub async fn return_rent(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(request): JsonBody<ReturnRequest>,
) -> AppResult<Json<OkResponse>> {
    let rent_id = request.rent_id.required("rentId")?;
    state.services.rents.return_rent(rent_id).await?;
    Ok(Json(OkResponse { ok: true }))
}

/// List active rentals
#[utoipa::path(
    get,
    path = "/rents/active",
    tag = "rents",
    security(("bearer_auth" = [])),
    params(ActiveRentsQuery),
    responses(
        (status = 200, description = "Active rentals, newest first", body = Vec<ActiveRent>),
        (status = 400, description = "Invalid clientId"),
        (status = 403, description = "Users may only list their own rentals")
    )
)]
pub async fn list_active(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    QueryParams(query): QueryParams<ActiveRentsQuery>,
) -> AppResult<Json<Vec<ActiveRent>>> {
    let client_id = match query.client_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| AppError::missing("clientId"))?),
    };

    let rents = match client_id {
        None if session.is_admin() => state.services.rents.list_active().await?,
        None => {
            state
                .services
                .rents
                .list_active_by_client(session.user_id as i64)
                .await?
        }
        Some(id) => {
            if !session.is_admin() && id != session.user_id as i64 {
                return Err(AppError::Authorization(
                    "Users may only list their own rentals".to_string(),
                ));
            }
            state.services.rents.list_active_by_client(id).await?
        }
    };

    Ok(Json(rents))
}
