use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod doc;
pub mod health;
pub mod params;
pub mod storefront;
pub mod super_admin;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/shops", storefront::router())
        .nest("/admin", admin::router())
        .nest("/super-admin", super_admin::router())
}
