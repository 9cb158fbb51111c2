use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, audit},
    dto::themes::{CreateThemeRequest, ThemeList, UpdateThemeRequest},
    entity::{
        shop_themes::{ActiveModel as ThemeActive, Column as ThemeCol, Entity as ShopThemes},
        shops::{Column as ShopCol, Entity as Shops},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_super_admin},
    models::ShopTheme,
    response::{ApiResponse, Meta},
    state::AppState,
};

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("color pattern is a valid regex")
});

/// `#rgb` or `#rrggbb`.
pub fn validate_color(field: &str, value: &str) -> AppResult<()> {
    if COLOR_RE.is_match(value) {
        Ok(())
    } else {
        Err(AppError::bad_request(format!(
            "{field} must be a hex color like #1a2b3c"
        )))
    }
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub async fn list_themes(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ThemeList>> {
    ensure_super_admin(user)?;
    let items: Vec<ShopTheme> = ShopThemes::find()
        .order_by_asc(ThemeCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ShopTheme::from)
        .collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Themes", ThemeList { items }, Some(meta)))
}

pub async fn create_theme(
    state: &AppState,
    user: &AuthUser,
    payload: CreateThemeRequest,
) -> AppResult<ApiResponse<ShopTheme>> {
    ensure_super_admin(user)?;
    let name = required("name", &payload.name)?;
    let font_family = required("font_family", &payload.font_family)?;
    validate_color("primary_color", &payload.primary_color)?;
    validate_color("secondary_color", &payload.secondary_color)?;
    validate_color("background_color", &payload.background_color)?;
    validate_color("text_color", &payload.text_color)?;

    ensure_name_free(state, &name, None).await?;

    let theme = ThemeActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        primary_color: Set(payload.primary_color),
        secondary_color: Set(payload.secondary_color),
        background_color: Set(payload.background_color),
        text_color: Set(payload.text_color),
        font_family: Set(font_family),
        button_style: Set(payload.button_style.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::ThemeCreate,
        "shop_themes",
        serde_json::json!({ "theme_id": theme.id }),
    )
    .await;

    Ok(ApiResponse::ok("Theme created", ShopTheme::from(theme)))
}

pub async fn update_theme(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateThemeRequest,
) -> AppResult<ApiResponse<ShopTheme>> {
    ensure_super_admin(user)?;
    let existing = ShopThemes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ThemeActive = existing.into();
    if let Some(name) = payload.name {
        let name = required("name", &name)?;
        ensure_name_free(state, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(color) = payload.primary_color {
        validate_color("primary_color", &color)?;
        active.primary_color = Set(color);
    }
    if let Some(color) = payload.secondary_color {
        validate_color("secondary_color", &color)?;
        active.secondary_color = Set(color);
    }
    if let Some(color) = payload.background_color {
        validate_color("background_color", &color)?;
        active.background_color = Set(color);
    }
    if let Some(color) = payload.text_color {
        validate_color("text_color", &color)?;
        active.text_color = Set(color);
    }
    if let Some(font) = payload.font_family {
        active.font_family = Set(required("font_family", &font)?);
    }
    if let Some(style) = payload.button_style {
        active.button_style = Set(style.as_str().to_string());
    }
    active.updated_at = Set(Utc::now().into());
    let theme = active.update(&state.orm).await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::ThemeUpdate,
        "shop_themes",
        serde_json::json!({ "theme_id": theme.id }),
    )
    .await;

    Ok(ApiResponse::ok("Theme updated", ShopTheme::from(theme)))
}

/// Deleting a theme detaches it from every shop using it.
pub async fn delete_theme(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_super_admin(user)?;
    let txn = state.orm.begin().await?;

    let detached = Shops::update_many()
        .col_expr(ShopCol::ThemeId, Expr::value(Option::<Uuid>::None))
        .filter(ShopCol::ThemeId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;

    let result = ShopThemes::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::ThemeDelete,
        "shop_themes",
        serde_json::json!({ "theme_id": id, "detached_shops": detached }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Theme deleted",
        serde_json::json!({ "detached_shops": detached }),
    ))
}

async fn ensure_name_free(state: &AppState, name: &str, except: Option<Uuid>) -> AppResult<()> {
    let mut finder = ShopThemes::find().filter(ThemeCol::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(ThemeCol::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::bad_request("Theme name is already taken"));
    }
    Ok(())
}
