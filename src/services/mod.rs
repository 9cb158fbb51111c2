pub mod analytics_service;
pub mod auth_service;
pub mod availability_service;
pub mod customer_service;
pub mod feedback_service;
pub mod menu_service;
pub mod order_service;
pub mod shop_service;
pub mod theme_service;
