use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, audit},
    dto::menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
    entity::menu_items::{
        ActiveModel as MenuActive, Column as MenuCol, Entity as MenuItems, Model as MenuModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_shop_admin},
    models::MenuItem,
    response::{ApiResponse, Meta},
    services::shop_service::find_active_by_slug,
    state::AppState,
};

const DEFAULT_CATEGORY: &str = "General";

/// Largest accepted unit price in minor units.
pub const MAX_PRICE: i64 = 1_000_000_000;

pub fn validate_price(price: i64) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::bad_request("price must not be negative"));
    }
    if price > MAX_PRICE {
        return Err(AppError::bad_request(format!(
            "price must be at most {MAX_PRICE}"
        )));
    }
    Ok(())
}

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name is required"));
    }
    Ok(name.to_string())
}

fn clean_category(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

/// Storefront menu: available items only.
pub async fn public_menu(state: &AppState, slug: &str) -> AppResult<ApiResponse<MenuList>> {
    let shop = find_active_by_slug(&state.orm, slug).await?;
    let items: Vec<MenuItem> = MenuItems::find()
        .filter(
            Condition::all()
                .add(MenuCol::ShopId.eq(shop.id))
                .add(MenuCol::IsAvailable.eq(true)),
        )
        .order_by_asc(MenuCol::Category)
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Menu", MenuList { items }, Some(meta)))
}

pub async fn list_menu(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<MenuList>> {
    let shop_id = ensure_shop_admin(user)?;
    let items: Vec<MenuItem> = MenuItems::find()
        .filter(MenuCol::ShopId.eq(shop_id))
        .order_by_asc(MenuCol::Category)
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Menu", MenuList { items }, Some(meta)))
}

pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let shop_id = ensure_shop_admin(user)?;
    let name = clean_name(&payload.name)?;
    validate_price(payload.price)?;

    let item = MenuActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop_id),
        name: Set(name),
        description: Set(payload.description),
        category: Set(clean_category(payload.category)),
        price: Set(payload.price),
        is_available: Set(payload.is_available.unwrap_or(true)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::MenuCreate,
        "menu_items",
        serde_json::json!({ "menu_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::ok("Menu item created", MenuItem::from(item)))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let shop_id = ensure_shop_admin(user)?;
    let existing = find_owned(state, shop_id, id).await?;

    let mut active: MenuActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(clean_name(&name)?);
    }
    if payload.description.is_some() {
        active.description = Set(payload.description);
    }
    if payload.category.is_some() {
        active.category = Set(clean_category(payload.category));
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    active.updated_at = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::MenuUpdate,
        "menu_items",
        serde_json::json!({ "menu_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::ok("Menu item updated", MenuItem::from(item)))
}

pub async fn delete_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let shop_id = ensure_shop_admin(user)?;
    let result = MenuItems::delete_many()
        .filter(
            Condition::all()
                .add(MenuCol::Id.eq(id))
                .add(MenuCol::ShopId.eq(shop_id)),
        )
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit(
        &state.pool,
        user.user_id,
        AuditAction::MenuDelete,
        "menu_items",
        serde_json::json!({ "menu_item_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}

async fn find_owned(state: &AppState, shop_id: Uuid, id: Uuid) -> AppResult<MenuModel> {
    MenuItems::find()
        .filter(
            Condition::all()
                .add(MenuCol::Id.eq(id))
                .add(MenuCol::ShopId.eq(shop_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}
