//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, openlibrary, rents, stock, users, wishlist};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LibraryDB API",
        version = "0.1.0",
        description = "Library catalog, stock, rental and wishlist REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        // OpenLibrary
        openlibrary::search,
        openlibrary::edition,
        // Books
        books::list_catalog,
        books::get_book,
        books::import_edition,
        // Stock
        stock::list_stock,
        stock::set_stock,
        stock::availability,
        // Rents
        rents::checkout,
        rents::return_rent,
        rents::list_active,
        // Wishlist
        wishlist::list_mine,
        wishlist::ids,
        wishlist::toggle,
        wishlist::remove,
        wishlist::admin_summary,
        // Users
        users::list_users,
        users::update_role,
    ),
    components(
        schemas(
            // Auth
            auth::SessionResponse,
            auth::MeResponse,
            auth::OkResponse,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::UpdateRole,
            crate::models::user::Role,
            crate::models::user::User,
            // Books
            books::ImportEditionRequest,
            books::ImportEditionResponse,
            crate::models::book::Book,
            crate::models::book::CatalogEntry,
            crate::models::book::CatalogSort,
            crate::models::book::SortDirection,
            // Stock
            stock::SetStockRequest,
            stock::SetStockResponse,
            crate::models::stock::StockWithBook,
            crate::models::stock::AvailabilityResponse,
            // Rents
            rents::CheckoutRequest,
            rents::CheckoutResponse,
            rents::ReturnRequest,
            crate::models::rent::ActiveRent,
            // Wishlist
            wishlist::ToggleRequest,
            wishlist::ToggleResponse,
            wishlist::RemoveRequest,
            wishlist::WishlistResponse,
            wishlist::WishlistIdsResponse,
            crate::models::wishlist::WishlistEntry,
            crate::models::wishlist::WishlistItem,
            crate::models::wishlist::WishlistSummary,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and sessions"),
        (name = "openlibrary", description = "OpenLibrary search proxy"),
        (name = "books", description = "Local book catalog"),
        (name = "stock", description = "Stock buckets"),
        (name = "rents", description = "Rentals"),
        (name = "wishlist", description = "Personal wishlist"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Session token, sent as a bearer token or in the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("librarydb_session"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
