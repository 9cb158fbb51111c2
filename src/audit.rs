use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Admin actions recorded in `audit_logs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    ThemeCreate,
    ThemeUpdate,
    ThemeDelete,
    ShopProvision,
    ShopUpdate,
    SettingsUpdate,
    MenuCreate,
    MenuUpdate,
    MenuDelete,
    OrderStatusUpdate,
    AvailabilityUpdate,
    HolidayCreate,
    HolidayDelete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "user_login",
            AuditAction::ThemeCreate => "theme_create",
            AuditAction::ThemeUpdate => "theme_update",
            AuditAction::ThemeDelete => "theme_delete",
            AuditAction::ShopProvision => "shop_provision",
            AuditAction::ShopUpdate => "shop_update",
            AuditAction::SettingsUpdate => "settings_update",
            AuditAction::MenuCreate => "menu_create",
            AuditAction::MenuUpdate => "menu_update",
            AuditAction::MenuDelete => "menu_delete",
            AuditAction::OrderStatusUpdate => "order_status_update",
            AuditAction::AvailabilityUpdate => "availability_update",
            AuditAction::HolidayCreate => "holiday_create",
            AuditAction::HolidayDelete => "holiday_delete",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action.as_str())
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Audit without failing the request; a lost audit row is only logged.
pub async fn audit(
    pool: &DbPool,
    user_id: Uuid,
    action: AuditAction,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(pool, Some(user_id), action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action = action.as_str(), "audit log failed");
    }
}
