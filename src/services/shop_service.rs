use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, audit},
    availability::{ManualOverride, validate_timezone},
    dto::shops::{
        ProvisionShopRequest, ProvisionedShop, ShopList, ShopProfile, ShopSettingsRequest,
        UpdateShopRequest,
    },
    entity::{
        shop_themes::Entity as ShopThemes,
        shops::{ActiveModel as ShopActive, Column as ShopCol, Entity as Shops, Model as ShopModel},
        store_availability::ActiveModel as AvailabilityActive,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_shop_admin, ensure_super_admin},
    models::{AvailabilitySettings, Role, Shop, ShopTheme, User},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::auth_service::hash_password,
    state::AppState,
};

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern is a valid regex")
});

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_slug(slug: &str) -> AppResult<()> {
    if slug.len() > 64 || !SLUG_RE.is_match(slug) {
        return Err(AppError::bad_request(
            "slug must be lowercase letters, digits and single dashes",
        ));
    }
    Ok(())
}

pub fn validate_tax_rate(bps: i32) -> AppResult<()> {
    if !(0..=10_000).contains(&bps) {
        return Err(AppError::bad_request("tax_rate_bps must be between 0 and 10000"));
    }
    Ok(())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Storefront lookup: inactive shops are invisible.
pub async fn find_active_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> AppResult<ShopModel> {
    Shops::find()
        .filter(ShopCol::Slug.eq(slug))
        .filter(ShopCol::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn find_shop<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<ShopModel> {
    Shops::find_by_id(id).one(db).await?.ok_or(AppError::NotFound)
}

pub async fn shop_profile(state: &AppState, slug: &str) -> AppResult<ApiResponse<ShopProfile>> {
    let shop = find_active_by_slug(&state.orm, slug).await?;
    let theme = match shop.theme_id {
        Some(theme_id) => ShopThemes::find_by_id(theme_id)
            .one(&state.orm)
            .await?
            .map(ShopTheme::from),
        None => None,
    };
    Ok(ApiResponse::ok(
        "Shop",
        ShopProfile {
            shop: Shop::from(shop),
            theme,
        },
    ))
}

pub async fn list_shops(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<ShopList>> {
    ensure_super_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Shops::find().order_by_asc(ShopCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Shop::from)
        .collect();

    Ok(ApiResponse::success(
        "Shops",
        ShopList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_shop(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Shop>> {
    ensure_super_admin(user)?;
    let shop = find_shop(&state.orm, id).await?;
    Ok(ApiResponse::ok("Shop", Shop::from(shop)))
}

/// Create a shop, its default opening hours and its admin account atomically.
pub async fn provision_shop(
    state: &AppState,
    user: &AuthUser,
    payload: ProvisionShopRequest,
) -> AppResult<ApiResponse<ProvisionedShop>> {
    ensure_super_admin(user)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("name is required"));
    }
    let slug = payload.slug.trim().to_lowercase();
    validate_slug(&slug)?;
    let tax_rate_bps = payload.tax_rate_bps.unwrap_or(0);
    validate_tax_rate(tax_rate_bps)?;
    let timezone = trimmed(payload.timezone).unwrap_or_else(|| "UTC".to_string());
    validate_timezone(&timezone)?;
    let admin_email = payload.admin_email.trim().to_lowercase();
    if !admin_email.contains('@') {
        return Err(AppError::bad_request("admin_email is invalid"));
    }
    if payload.admin_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "admin_password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let password_hash = hash_password(&payload.admin_password)?;

    let txn = state.orm.begin().await?;

    if Shops::find()
        .filter(ShopCol::Slug.eq(slug.as_str()))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(AppError::bad_request("Slug is already taken"));
    }
    if Users::find()
        .filter(UserCol::Email.eq(admin_email.as_str()))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(AppError::bad_request("Email is already taken"));
    }
    if let Some(theme_id) = payload.theme_id {
        ShopThemes::find_by_id(theme_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::bad_request("theme not found"))?;
    }

    let shop = ShopActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        phone: Set(trimmed(payload.phone)),
        address: Set(trimmed(payload.address)),
        currency_symbol: Set(trimmed(payload.currency_symbol).unwrap_or_else(|| "$".to_string())),
        tax_rate_bps: Set(tax_rate_bps),
        theme_id: Set(payload.theme_id),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let availability = AvailabilityActive {
        shop_id: Set(shop.id),
        opening_time: Set("09:00".into()),
        closing_time: Set("22:00".into()),
        timezone: Set(timezone),
        manual_override: Set(ManualOverride::None.as_str().into()),
        override_reason: Set(None),
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let admin = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(admin_email),
        password_hash: Set(password_hash),
        role: Set(Role::ShopAdmin.as_str().into()),
        shop_id: Set(Some(shop.id)),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(shop_id = %shop.id, slug = %shop.slug, "shop provisioned");
    audit(
        &state.pool,
        user.user_id,
        AuditAction::ShopProvision,
        "shops",
        serde_json::json!({ "shop_id": shop.id, "admin_id": admin.id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Shop provisioned",
        ProvisionedShop {
            shop: Shop::from(shop),
            admin: User::from(admin),
            availability: AvailabilitySettings::from(availability),
        },
    ))
}

pub async fn update_shop(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateShopRequest,
) -> AppResult<ApiResponse<Shop>> {
    ensure_super_admin(user)?;
    let existing = find_shop(&state.orm, id).await?;

    let mut active: ShopActive = existing.into();
    if let Some(theme_id) = payload.theme_id {
        ShopThemes::find_by_id(theme_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::bad_request("theme not found"))?;
        active.theme_id = Set(Some(theme_id));
    } else if payload.clear_theme {
        active.theme_id = Set(None);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());
    let shop = active.update(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::ShopUpdate,
        "shops",
        serde_json::json!({ "shop_id": shop.id, "theme_id": shop.theme_id, "is_active": shop.is_active }),
    )
    .await;

    Ok(ApiResponse::ok("Shop updated", Shop::from(shop)))
}

pub async fn get_settings(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Shop>> {
    let shop_id = ensure_shop_admin(user)?;
    let shop = find_shop(&state.orm, shop_id).await?;
    Ok(ApiResponse::ok("Settings", Shop::from(shop)))
}

pub async fn update_settings(
    state: &AppState,
    user: &AuthUser,
    payload: ShopSettingsRequest,
) -> AppResult<ApiResponse<Shop>> {
    let shop_id = ensure_shop_admin(user)?;
    let existing = find_shop(&state.orm, shop_id).await?;

    let mut active: ShopActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::bad_request("name is required"));
        }
        active.name = Set(name);
    }
    if payload.phone.is_some() {
        active.phone = Set(trimmed(payload.phone));
    }
    if payload.address.is_some() {
        active.address = Set(trimmed(payload.address));
    }
    if let Some(symbol) = payload.currency_symbol {
        let symbol = symbol.trim().to_string();
        if symbol.is_empty() || symbol.chars().count() > 4 {
            return Err(AppError::bad_request("currency_symbol must be 1 to 4 characters"));
        }
        active.currency_symbol = Set(symbol);
    }
    if let Some(bps) = payload.tax_rate_bps {
        validate_tax_rate(bps)?;
        active.tax_rate_bps = Set(bps);
    }
    active.updated_at = Set(Utc::now().into());
    let shop = active.update(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::SettingsUpdate,
        "shops",
        serde_json::json!({ "shop_id": shop.id }),
    )
    .await;

    Ok(ApiResponse::ok("Settings updated", Shop::from(shop)))
}
