//! Shared setup for the database-backed flow tests. Every test provisions its
//! own shop under a fresh slug, so tests can run in parallel on one database.
#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use shop_ordering_api::{
    availability::ManualOverride,
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    dto::{
        availability::UpdateAvailabilityRequest,
        menu::CreateMenuItemRequest,
        orders::{CustomerDetails, OrderLineRequest, PlaceOrderRequest},
        shops::{ProvisionShopRequest, ProvisionedShop},
    },
    entity::users::ActiveModel as UserActive,
    fingerprint::ClientDevice,
    middleware::auth::AuthUser,
    models::{MenuItem, PaymentMode, Role},
    services::{availability_service, menu_service, shop_service},
    state::AppState,
};
use uuid::Uuid;

pub const IP_SALT: &str = "flow-salt";
pub const ADMIN_PASSWORD: &str = "flow-pass-1";
pub const IPHONE_UA: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148 Safari/604.1";
pub const DESKTOP_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
pub const BOT_UA: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Database to run against, or `None` to skip.
pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            None
        }
    }
}

pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = orm_from_pool(&pool);
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "flow-secret".into(),
        session_ttl_hours: 1,
        cookie_secure: false,
        ip_hash_salt: IP_SALT.into(),
        cors_allowed_origins: Vec::new(),
    };

    Ok(AppState {
        pool,
        orm,
        config: Arc::new(config),
    })
}

/// `prefix` plus a random suffix; valid as a slug and inside an email.
pub fn unique(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &suffix[..10])
}

pub async fn create_super_admin(state: &AppState) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}@example.com", unique("owner"))),
        password_hash: Set("dummy".into()),
        role: Set(Role::SuperAdmin.as_str().into()),
        shop_id: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: Role::SuperAdmin,
        shop_id: None,
    })
}

pub fn provision_request(slug: &str, tax_rate_bps: i32, theme_id: Option<Uuid>) -> ProvisionShopRequest {
    ProvisionShopRequest {
        name: format!("Cafe {slug}"),
        slug: slug.into(),
        phone: None,
        address: Some("1 Test Lane".into()),
        currency_symbol: Some("$".into()),
        tax_rate_bps: Some(tax_rate_bps),
        theme_id,
        timezone: Some("UTC".into()),
        admin_email: format!("{slug}@Example.com"),
        admin_password: ADMIN_PASSWORD.into(),
    }
}

/// Provision a fresh shop and return it with its admin.
pub async fn provision(
    state: &AppState,
    owner: &AuthUser,
    prefix: &str,
    tax_rate_bps: i32,
    theme_id: Option<Uuid>,
) -> anyhow::Result<(ProvisionedShop, AuthUser)> {
    let slug = unique(prefix);
    let provisioned =
        shop_service::provision_shop(state, owner, provision_request(&slug, tax_rate_bps, theme_id))
            .await?
            .data
            .expect("provisioned shop");
    let admin = AuthUser {
        user_id: provisioned.admin.id,
        role: Role::ShopAdmin,
        shop_id: Some(provisioned.shop.id),
    };
    Ok((provisioned, admin))
}

pub async fn set_override(
    state: &AppState,
    user: &AuthUser,
    manual_override: ManualOverride,
) -> anyhow::Result<()> {
    availability_service::update_availability(
        state,
        user,
        UpdateAvailabilityRequest {
            opening_time: "09:00".into(),
            closing_time: "22:00".into(),
            timezone: "UTC".into(),
            manual_override,
            override_reason: None,
        },
    )
    .await?;
    Ok(())
}

pub async fn add_menu_item(
    state: &AppState,
    admin: &AuthUser,
    name: &str,
    price: i64,
) -> anyhow::Result<MenuItem> {
    let item = menu_service::create_menu_item(
        state,
        admin,
        CreateMenuItemRequest {
            name: name.into(),
            description: None,
            category: Some("Coffee".into()),
            price,
            is_available: Some(true),
        },
    )
    .await?
    .data
    .expect("menu item");
    Ok(item)
}

pub fn device(user_agent: &'static str, ip: &'static str) -> ClientDevice {
    let mut headers = HeaderMap::new();
    headers.insert("user-agent", HeaderValue::from_static(user_agent));
    headers.insert("x-forwarded-for", HeaderValue::from_static(ip));
    ClientDevice::from_headers(&headers, None, IP_SALT)
}

pub fn mobile_device() -> ClientDevice {
    device(IPHONE_UA, "203.0.113.20")
}

pub fn order_for(phone: &str, lines: &[(Uuid, i32)]) -> PlaceOrderRequest {
    PlaceOrderRequest {
        customer: CustomerDetails {
            name: "Flow Customer".into(),
            phone: phone.into(),
            email: None,
        },
        items: lines
            .iter()
            .map(|&(menu_item_id, quantity)| OrderLineRequest {
                menu_item_id,
                quantity,
            })
            .collect(),
        payment_mode: PaymentMode::Card,
        notes: Some("No ice".into()),
    }
}
