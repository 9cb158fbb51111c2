use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordVisitRequest {
    pub page: String,
    pub referrer: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisitRecorded {
    pub recorded: bool,
    pub device_type: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct CountBucket {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct DailyVisits {
    pub date: NaiveDate,
    pub visits: i64,
    pub unique_visitors: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisitStats {
    pub days: i64,
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub by_device: Vec<CountBucket>,
    pub top_pages: Vec<CountBucket>,
    pub daily: Vec<DailyVisits>,
}
