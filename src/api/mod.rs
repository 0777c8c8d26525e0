//! API handlers for LibraryDB REST endpoints

pub mod auth;
pub mod books;
pub mod extract;
pub mod health;
pub mod openapi;
pub mod openlibrary;
pub mod rents;
pub mod stock;
pub mod users;
pub mod wishlist;

use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri},
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::AppError, models::user::SessionUser, AppState};

/// Extractor for the user behind the session token
pub struct AuthenticatedUser(pub SessionUser);

/// Session token from the `Authorization: Bearer` header, else from the session cookie
pub fn session_token(headers: &HeaderMap, jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    jar.get(cookie_name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&parts.headers, &jar, &state.config.auth.cookie_name)
            .ok_or_else(|| AppError::Authentication("Not authenticated".to_string()))?;

        let user = state.services.auth.resolve_session(&token).await?;
        Ok(AuthenticatedUser(user))
    }
}

/// Extractor that additionally requires the admin role
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        user.require_admin()?;
        Ok(AdminUser(user))
    }
}

async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "path": uri.path() })),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // OpenLibrary proxy
        .route("/openlibrary/search", get(openlibrary::search))
        .route("/openlibrary/edition", get(openlibrary::edition))
        // Books
        .route("/books", get(books::list_catalog))
        .route("/books/import-edition", post(books::import_edition))
        .route("/books/:olid", get(books::get_book))
        // Stock
        .route("/stock/list", get(stock::list_stock))
        .route("/stock/set", post(stock::set_stock))
        .route("/stock/:id/availability", get(stock::availability))
        // Rents
        .route("/rents/checkout", post(rents::checkout))
        .route("/rents/return", post(rents::return_rent))
        .route("/rents/active", get(rents::list_active))
        // Wishlist
        .route("/wishlist/me", get(wishlist::list_mine))
        .route("/wishlist/ids", get(wishlist::ids))
        .route("/wishlist/toggle", post(wishlist::toggle))
        .route("/wishlist/remove", post(wishlist::remove))
        .route("/wishlist/admin/summary", get(wishlist::admin_summary))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:id/role", put(users::update_role))
        .fallback(not_found)
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
