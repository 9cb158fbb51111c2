pub mod audit_logs;
pub mod customers;
pub mod feedback;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod page_visits;
pub mod shop_themes;
pub mod shops;
pub mod store_availability;
pub mod store_holidays;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use customers::Entity as Customers;
pub use feedback::Entity as Feedback;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use page_visits::Entity as PageVisits;
pub use shop_themes::Entity as ShopThemes;
pub use shops::Entity as Shops;
pub use store_availability::Entity as StoreAvailability;
pub use store_holidays::Entity as StoreHolidays;
pub use users::Entity as Users;
