use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Customer, Order};

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub items: Vec<Customer>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub recent_orders: Vec<Order>,
}
