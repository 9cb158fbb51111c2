use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    availability::ManualOverride,
    entity::{
        customers, feedback, menu_items, order_items, orders, shop_themes, shops,
        store_availability, store_holidays, users,
    },
    error::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    ShopAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::ShopAdmin => "shop_admin",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "shop_admin" => Ok(Role::ShopAdmin),
            _ => Err(AppError::bad_request("Invalid role")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(AppError::bad_request("Invalid order status")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Card,
    Upi,
    Online,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::Card => "card",
            PaymentMode::Upi => "upi",
            PaymentMode::Online => "online",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Rounded,
    Pill,
    Square,
}

impl ButtonStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonStyle::Rounded => "rounded",
            ButtonStyle::Pill => "pill",
            ButtonStyle::Square => "square",
        }
    }
}

/// Admin account. The password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub shop_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopTheme {
    pub id: Uuid,
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub button_style: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub currency_symbol: String,
    pub tax_rate_bps: i32,
    pub theme_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub visit_count: i32,
    pub order_count: i32,
    pub total_spent: i64,
    pub last_order_at: Option<DateTime<Utc>>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub customer_id: Uuid,
    pub order_number: String,
    pub status: String,
    pub payment_mode: String,
    pub subtotal: i64,
    pub tax_rate_bps: i32,
    pub tax_amount: i64,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub line_no: i32,
    pub menu_item_id: Option<Uuid>,
    pub name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub line_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub order_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilitySettings {
    pub shop_id: Uuid,
    pub opening_time: String,
    pub closing_time: String,
    pub timezone: String,
    pub manual_override: ManualOverride,
    pub override_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Holiday {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub holiday_date: NaiveDate,
    pub reason: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            shop_id: model.shop_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<shop_themes::Model> for ShopTheme {
    fn from(model: shop_themes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            primary_color: model.primary_color,
            secondary_color: model.secondary_color,
            background_color: model.background_color,
            text_color: model.text_color,
            font_family: model.font_family,
            button_style: model.button_style,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<shops::Model> for Shop {
    fn from(model: shops::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            phone: model.phone,
            address: model.address,
            currency_symbol: model.currency_symbol,
            tax_rate_bps: model.tax_rate_bps,
            theme_id: model.theme_id,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<menu_items::Model> for MenuItem {
    fn from(model: menu_items::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            name: model.name,
            description: model.description,
            category: model.category,
            price: model.price,
            is_available: model.is_available,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            name: model.name,
            phone: model.phone,
            email: model.email,
            visit_count: model.visit_count,
            order_count: model.order_count,
            total_spent: model.total_spent,
            last_order_at: model.last_order_at.map(|dt| dt.with_timezone(&Utc)),
            device_type: model.device_type,
            browser: model.browser,
            os: model.os,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            customer_id: model.customer_id,
            order_number: model.order_number,
            status: model.status,
            payment_mode: model.payment_mode,
            subtotal: model.subtotal,
            tax_rate_bps: model.tax_rate_bps,
            tax_amount: model.tax_amount,
            total_amount: model.total_amount,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            line_no: model.line_no,
            menu_item_id: model.menu_item_id,
            name: model.name,
            quantity: model.quantity,
            unit_price: model.unit_price,
            line_total: model.line_total,
        }
    }
}

impl From<feedback::Model> for Feedback {
    fn from(model: feedback::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            order_id: model.order_id,
            customer_name: model.customer_name,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<store_holidays::Model> for Holiday {
    fn from(model: store_holidays::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            holiday_date: model.holiday_date,
            reason: model.reason,
        }
    }
}

impl From<store_availability::Model> for AvailabilitySettings {
    fn from(model: store_availability::Model) -> Self {
        let manual_override = model.manual_override.parse().unwrap_or_else(|_| {
            tracing::warn!(
                shop_id = %model.shop_id,
                value = %model.manual_override,
                "unknown stored override, treating as none"
            );
            ManualOverride::None
        });
        Self {
            shop_id: model.shop_id,
            opening_time: model.opening_time,
            closing_time: model.closing_time,
            timezone: model.timezone,
            manual_override,
            override_reason: model.override_reason,
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
