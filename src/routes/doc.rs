use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    availability::{AvailabilityStatus, ManualOverride, StoreStatus},
    dto::{
        analytics::{CountBucket, DailyVisits, RecordVisitRequest, VisitRecorded, VisitStats},
        auth::{LoginRequest, LoginResponse},
        availability::{CreateHolidayRequest, HolidayList, UpdateAvailabilityRequest},
        customers::{CustomerDetail, CustomerList},
        feedback::{FeedbackList, SubmitFeedbackRequest},
        menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
        orders::{
            CustomerDetails, OrderLineRequest, OrderList, OrderWithItems, PlaceOrderRequest,
            UpdateOrderStatusRequest,
        },
        shops::{
            ProvisionShopRequest, ProvisionedShop, ShopList, ShopProfile, ShopSettingsRequest,
            UpdateShopRequest,
        },
        themes::{CreateThemeRequest, ThemeList, UpdateThemeRequest},
    },
    middleware::session::SESSION_COOKIE_NAME,
    models::{
        AvailabilitySettings, ButtonStyle, Customer, Feedback, Holiday, MenuItem, Order,
        OrderItem, OrderStatus, PaymentMode, Role, Shop, ShopTheme, User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, params, storefront, super_admin},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::me,
        storefront::get_shop,
        storefront::get_menu,
        storefront::get_status,
        storefront::place_order,
        storefront::get_order,
        storefront::submit_feedback,
        storefront::record_visit,
        admin::list_orders,
        admin::get_order,
        admin::update_order_status,
        admin::order_bill,
        admin::list_customers,
        admin::get_customer,
        admin::list_feedback,
        admin::get_settings,
        admin::update_settings,
        admin::list_menu,
        admin::create_menu_item,
        admin::update_menu_item,
        admin::delete_menu_item,
        admin::get_availability,
        admin::update_availability,
        admin::availability_status,
        admin::list_holidays,
        admin::create_holiday,
        admin::delete_holiday,
        super_admin::list_themes,
        super_admin::create_theme,
        super_admin::update_theme,
        super_admin::delete_theme,
        super_admin::list_shops,
        super_admin::provision_shop,
        super_admin::get_shop,
        super_admin::update_shop,
        super_admin::visit_stats
    ),
    components(
        schemas(
            User,
            Role,
            Shop,
            ShopTheme,
            ButtonStyle,
            MenuItem,
            Customer,
            Order,
            OrderItem,
            OrderStatus,
            PaymentMode,
            Feedback,
            AvailabilitySettings,
            Holiday,
            AvailabilityStatus,
            StoreStatus,
            ManualOverride,
            LoginRequest,
            LoginResponse,
            ShopProfile,
            ProvisionShopRequest,
            ProvisionedShop,
            UpdateShopRequest,
            ShopSettingsRequest,
            ShopList,
            CreateThemeRequest,
            UpdateThemeRequest,
            ThemeList,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuList,
            CustomerDetails,
            OrderLineRequest,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            OrderWithItems,
            OrderList,
            CustomerList,
            CustomerDetail,
            SubmitFeedbackRequest,
            FeedbackList,
            UpdateAvailabilityRequest,
            CreateHolidayRequest,
            HolidayList,
            RecordVisitRequest,
            VisitRecorded,
            CountBucket,
            DailyVisits,
            VisitStats,
            params::Pagination,
            params::SortOrder,
            params::OrderListQuery,
            params::CustomerQuery,
            params::VisitStatsQuery,
            params::BillQuery,
            Meta,
            ApiResponse<ShopProfile>,
            ApiResponse<MenuList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<AvailabilityStatus>,
            ApiResponse<ProvisionedShop>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login, logout and session endpoints"),
        (name = "Storefront", description = "Public per-shop ordering endpoints"),
        (name = "Shop Admin", description = "Endpoints scoped to the logged-in admin's shop"),
        (name = "Super Admin", description = "Platform-wide theme, shop and analytics endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
