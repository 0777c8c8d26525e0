//! Authentication endpoints

use axum::{extract::State, http::{HeaderMap, StatusCode}, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::AuthConfig,
    error::AppResult,
    models::user::{LoginRequest, RegisterRequest, User},
};

use super::{extract::JsonBody, session_token, AuthenticatedUser};

/// Session opened by register or login
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub ok: bool,
    /// Opaque session token, also set as an HttpOnly cookie
    pub token: String,
    pub user: User,
}

#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

fn session_cookie(config: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .build()
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and session opened", body = SessionResponse),
        (status = 400, description = "Invalid email, name or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> AppResult<(CookieJar, (StatusCode, Json<SessionResponse>))> {
    let (token, user) = state.services.auth.register(request).await?;
    let jar = jar.add(session_cookie(&state.config.auth, token.clone()));

    Ok((
        jar,
        (StatusCode::CREATED, Json(SessionResponse { ok: true, token, user })),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    let (token, user) = state.services.auth.login(request).await?;
    let jar = jar.add(session_cookie(&state.config.auth, token.clone()));

    Ok((jar, Json(SessionResponse { ok: true, token, user })))
}

/// Close the current session; succeeds without one
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session closed", body = OkResponse)
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<OkResponse>)> {
    let cookie_name = state.config.auth.cookie_name.clone();
    if let Some(token) = session_token(&headers, &jar, &cookie_name) {
        state.services.auth.logout(&token).await?;
    }

    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));
    Ok((jar, Json(OkResponse { ok: true })))
}

/// Get current user profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> AppResult<Json<MeResponse>> {
    let user = state.services.auth.get_user(session.user_id).await?;
    Ok(Json(MeResponse { user }))
}
