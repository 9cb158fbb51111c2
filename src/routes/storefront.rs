use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    availability::AvailabilityStatus,
    dto::{
        analytics::{RecordVisitRequest, VisitRecorded},
        feedback::SubmitFeedbackRequest,
        menu::MenuList,
        orders::{OrderWithItems, PlaceOrderRequest},
        shops::ShopProfile,
    },
    error::AppResult,
    fingerprint::ClientDevice,
    models::Feedback,
    response::ApiResponse,
    services::{
        analytics_service, availability_service, feedback_service, menu_service, order_service,
        shop_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(get_shop))
        .route("/{slug}/menu", get(get_menu))
        .route("/{slug}/status", get(get_status))
        .route("/{slug}/orders", post(place_order))
        .route("/{slug}/orders/{order_number}", get(get_order))
        .route("/{slug}/feedback", post(submit_feedback))
        .route("/{slug}/visits", post(record_visit))
}

#[utoipa::path(
    get,
    path = "/api/shops/{slug}",
    params(("slug" = String, Path, description = "Shop slug")),
    responses(
        (status = 200, description = "Shop profile with theme", body = ApiResponse<ShopProfile>),
        (status = 404, description = "Unknown or inactive shop"),
    ),
    tag = "Storefront"
)]
pub async fn get_shop(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<ShopProfile>>> {
    let resp = shop_service::shop_profile(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shops/{slug}/menu",
    params(("slug" = String, Path, description = "Shop slug")),
    responses(
        (status = 200, description = "Available menu items", body = ApiResponse<MenuList>),
        (status = 404, description = "Unknown or inactive shop"),
    ),
    tag = "Storefront"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::public_menu(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shops/{slug}/status",
    params(("slug" = String, Path, description = "Shop slug")),
    responses(
        (status = 200, description = "Current open/closed status", body = ApiResponse<AvailabilityStatus>),
        (status = 404, description = "Unknown or inactive shop"),
    ),
    tag = "Storefront"
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<AvailabilityStatus>>> {
    let resp = availability_service::public_status(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shops/{slug}/orders",
    params(("slug" = String, Path, description = "Shop slug")),
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Invalid order or shop closed"),
        (status = 404, description = "Unknown or inactive shop"),
    ),
    tag = "Storefront"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    device: ClientDevice,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::place_order(&state, &slug, &device, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shops/{slug}/orders/{order_number}",
    params(
        ("slug" = String, Path, description = "Shop slug"),
        ("order_number" = String, Path, description = "Public order number"),
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Storefront"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path((slug, order_number)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order_by_number(&state, &slug, &order_number).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shops/{slug}/feedback",
    params(("slug" = String, Path, description = "Shop slug")),
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 200, description = "Feedback stored", body = ApiResponse<Feedback>),
        (status = 400, description = "Invalid feedback"),
        (status = 404, description = "Unknown or inactive shop"),
    ),
    tag = "Storefront"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> AppResult<Json<ApiResponse<Feedback>>> {
    let resp = feedback_service::submit_feedback(&state, &slug, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shops/{slug}/visits",
    params(("slug" = String, Path, description = "Shop slug")),
    request_body = RecordVisitRequest,
    responses(
        (status = 200, description = "Visit recorded", body = ApiResponse<VisitRecorded>),
        (status = 404, description = "Unknown or inactive shop"),
    ),
    tag = "Storefront"
)]
pub async fn record_visit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    device: ClientDevice,
    Json(payload): Json<RecordVisitRequest>,
) -> AppResult<Json<ApiResponse<VisitRecorded>>> {
    let resp = analytics_service::record_visit(&state, &slug, &device, payload).await?;
    Ok(Json(resp))
}
