use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        analytics::VisitStats,
        shops::{ProvisionShopRequest, ProvisionedShop, ShopList, UpdateShopRequest},
        themes::{CreateThemeRequest, ThemeList, UpdateThemeRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Shop, ShopTheme},
    response::ApiResponse,
    routes::params::{Pagination, VisitStatsQuery},
    services::{analytics_service, shop_service, theme_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/themes", get(list_themes).post(create_theme))
        .route("/themes/{id}", put(update_theme).delete(delete_theme))
        .route("/shops", get(list_shops).post(provision_shop))
        .route("/shops/{id}", get(get_shop).patch(update_shop))
        .route("/analytics/visits", get(visit_stats))
}

#[utoipa::path(
    get,
    path = "/api/super-admin/themes",
    responses(
        (status = 200, description = "All themes", body = ApiResponse<ThemeList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn list_themes(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ThemeList>>> {
    let resp = theme_service::list_themes(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/super-admin/themes",
    request_body = CreateThemeRequest,
    responses(
        (status = 200, description = "Theme created", body = ApiResponse<ShopTheme>),
        (status = 400, description = "Invalid color or name"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn create_theme(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateThemeRequest>,
) -> AppResult<Json<ApiResponse<ShopTheme>>> {
    let resp = theme_service::create_theme(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/super-admin/themes/{id}",
    params(("id" = Uuid, Path, description = "Theme ID")),
    request_body = UpdateThemeRequest,
    responses(
        (status = 200, description = "Theme updated", body = ApiResponse<ShopTheme>),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn update_theme(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateThemeRequest>,
) -> AppResult<Json<ApiResponse<ShopTheme>>> {
    let resp = theme_service::update_theme(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/super-admin/themes/{id}",
    params(("id" = Uuid, Path, description = "Theme ID")),
    responses(
        (status = 200, description = "Theme deleted; shops using it fall back to defaults"),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn delete_theme(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = theme_service::delete_theme(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/super-admin/shops",
    params(Pagination),
    responses(
        (status = 200, description = "All shops", body = ApiResponse<ShopList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn list_shops(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ShopList>>> {
    let resp = shop_service::list_shops(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/super-admin/shops",
    request_body = ProvisionShopRequest,
    responses(
        (status = 200, description = "Shop, default hours and admin account created", body = ApiResponse<ProvisionedShop>),
        (status = 400, description = "Invalid slug, duplicate slug or email"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn provision_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ProvisionShopRequest>,
) -> AppResult<Json<ApiResponse<ProvisionedShop>>> {
    let resp = shop_service::provision_shop(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    operation_id = "super_admin_get_shop",
    path = "/api/super-admin/shops/{id}",
    params(("id" = Uuid, Path, description = "Shop ID")),
    responses(
        (status = 200, description = "Shop", body = ApiResponse<Shop>),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn get_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = shop_service::get_shop(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/super-admin/shops/{id}",
    params(("id" = Uuid, Path, description = "Shop ID")),
    request_body = UpdateShopRequest,
    responses(
        (status = 200, description = "Theme assignment or activation updated", body = ApiResponse<Shop>),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn update_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShopRequest>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = shop_service::update_shop(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/super-admin/analytics/visits",
    params(VisitStatsQuery),
    responses(
        (status = 200, description = "Visit statistics", body = ApiResponse<VisitStats>),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Super Admin"
)]
pub async fn visit_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<VisitStatsQuery>,
) -> AppResult<Json<ApiResponse<VisitStats>>> {
    let resp = analytics_service::visit_stats(&state, &user, query).await?;
    Ok(Json(resp))
}
