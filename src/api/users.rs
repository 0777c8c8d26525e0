//! User management endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::user::{UpdateRole, User},
};

use super::{
    extract::{JsonBody, PathParam},
    AdminUser,
};

/// List every account
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.auth.list_users().await?;
    Ok(Json(users))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = User),
        (status = 400, description = "Invalid role, or an administrator demoting themself"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_role(
    State(state): State<crate::AppState>,
    AdminUser(admin): AdminUser,
    PathParam(id): PathParam<i32>,
    JsonBody(request): JsonBody<UpdateRole>,
) -> AppResult<Json<User>> {
    let user = state.services.auth.update_role(&admin, id, request.role).await?;
    Ok(Json(user))
}
