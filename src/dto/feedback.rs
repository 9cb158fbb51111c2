use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Feedback;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitFeedbackRequest {
    /// 1 to 5 inclusive.
    pub rating: i32,
    pub comment: Option<String>,
    pub customer_name: Option<String>,
    pub order_number: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackList {
    pub items: Vec<Feedback>,
    pub average_rating: Option<f64>,
}
