use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{AppendHeaders, Html, IntoResponse},
    routing::{delete, get, patch, put},
};
use uuid::Uuid;

use crate::{
    availability::AvailabilityStatus,
    dto::{
        availability::{CreateHolidayRequest, HolidayList, UpdateAvailabilityRequest},
        customers::{CustomerDetail, CustomerList},
        feedback::FeedbackList,
        menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
        shops::ShopSettingsRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{AvailabilitySettings, Holiday, MenuItem, Order, Shop},
    response::ApiResponse,
    routes::params::{BillQuery, CustomerQuery, OrderListQuery, Pagination},
    services::{
        availability_service, customer_service, feedback_service, menu_service, order_service,
        shop_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/orders/{id}/bill", get(order_bill))
        .route("/customers", get(list_customers))
        .route("/customers/{id}", get(get_customer))
        .route("/feedback", get(list_feedback))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/menu", get(list_menu).post(create_menu_item))
        .route("/menu/{id}", put(update_menu_item).delete(delete_menu_item))
        .route("/availability", get(get_availability).put(update_availability))
        .route("/availability/status", get(availability_status))
        .route("/availability/holidays", get(list_holidays).post(create_holiday))
        .route("/availability/holidays/{id}", delete(delete_holiday))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders of the admin's shop", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    operation_id = "admin_get_order",
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid transition"),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}/bill",
    params(("id" = Uuid, Path, description = "Order ID"), BillQuery),
    responses(
        (status = 200, description = "Printable bill", body = String, content_type = "text/html"),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn order_bill(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<BillQuery>,
) -> AppResult<impl IntoResponse> {
    let (order_number, html) = order_service::order_bill(&state, &user, id).await?;
    let disposition = bill_disposition(&order_number, query.download.unwrap_or(false));
    Ok((
        AppendHeaders([(header::CONTENT_DISPOSITION, disposition)]),
        Html(html),
    ))
}

/// `Content-Disposition` for a bill: a named attachment when downloading.
pub fn bill_disposition(order_number: &str, download: bool) -> String {
    if download {
        format!("attachment; filename=\"bill-{order_number}.html\"")
    } else {
        "inline".to_string()
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/customers",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Customers of the admin's shop", body = ApiResponse<CustomerList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = customer_service::list_customers(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer with recent orders", body = ApiResponse<CustomerDetail>),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CustomerDetail>>> {
    let resp = customer_service::get_customer(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/feedback",
    params(Pagination),
    responses(
        (status = 200, description = "Feedback with average rating", body = ApiResponse<FeedbackList>),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<FeedbackList>>> {
    let resp = feedback_service::list_feedback(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses((status = 200, description = "Shop settings", body = ApiResponse<Shop>)),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = shop_service::get_settings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = ShopSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = ApiResponse<Shop>),
        (status = 400, description = "Invalid settings"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ShopSettingsRequest>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = shop_service::update_settings(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu",
    responses((status = 200, description = "Full menu including unavailable items", body = ApiResponse<MenuList>)),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn list_menu(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_menu(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item created", body = ApiResponse<MenuItem>),
        (status = 400, description = "Invalid item"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::create_menu_item(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<MenuItem>),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::update_menu_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item deleted"),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_menu_item(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/availability",
    responses((status = 200, description = "Opening hours and override", body = ApiResponse<AvailabilitySettings>)),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn get_availability(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AvailabilitySettings>>> {
    let resp = availability_service::get_availability(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/availability",
    request_body = UpdateAvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = ApiResponse<AvailabilitySettings>),
        (status = 400, description = "Invalid time, timezone or override"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn update_availability(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> AppResult<Json<ApiResponse<AvailabilitySettings>>> {
    let resp = availability_service::update_availability(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/availability/status",
    responses((status = 200, description = "Current status", body = ApiResponse<AvailabilityStatus>)),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn availability_status(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AvailabilityStatus>>> {
    let resp = availability_service::admin_status(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/availability/holidays",
    responses((status = 200, description = "Holiday calendar", body = ApiResponse<HolidayList>)),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn list_holidays(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<HolidayList>>> {
    let resp = availability_service::list_holidays(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/availability/holidays",
    request_body = CreateHolidayRequest,
    responses(
        (status = 200, description = "Holiday added", body = ApiResponse<Holiday>),
        (status = 400, description = "Duplicate date or missing reason"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn create_holiday(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateHolidayRequest>,
) -> AppResult<Json<ApiResponse<Holiday>>> {
    let resp = availability_service::create_holiday(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/availability/holidays/{id}",
    params(("id" = Uuid, Path, description = "Holiday ID")),
    responses(
        (status = 200, description = "Holiday removed"),
        (status = 404, description = "Not Found"),
    ),
    security(("session_cookie" = []), ("bearer_auth" = [])),
    tag = "Shop Admin"
)]
pub async fn delete_holiday(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = availability_service::delete_holiday(&state, &user, id).await?;
    Ok(Json(resp))
}
