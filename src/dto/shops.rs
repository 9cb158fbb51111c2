use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{AvailabilitySettings, Shop, ShopTheme, User};

/// Public storefront view of a shop.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShopProfile {
    pub shop: Shop,
    pub theme: Option<ShopTheme>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProvisionShopRequest {
    pub name: String,
    pub slug: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub currency_symbol: Option<String>,
    pub tax_rate_bps: Option<i32>,
    pub theme_id: Option<Uuid>,
    pub timezone: Option<String>,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProvisionedShop {
    pub shop: Shop,
    pub admin: User,
    pub availability: AvailabilitySettings,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateShopRequest {
    pub theme_id: Option<Uuid>,
    /// Detach the current theme. Ignored when `theme_id` is set.
    #[serde(default)]
    pub clear_theme: bool,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ShopSettingsRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub currency_symbol: Option<String>,
    pub tax_rate_bps: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShopList {
    pub items: Vec<Shop>,
}
