pub mod analytics;
pub mod auth;
pub mod availability;
pub mod customers;
pub mod feedback;
pub mod menu;
pub mod orders;
pub mod shops;
pub mod themes;
