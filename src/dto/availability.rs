use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{availability::ManualOverride, models::Holiday};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAvailabilityRequest {
    /// `HH:MM`, 24-hour.
    pub opening_time: String,
    /// `HH:MM`, 24-hour. Earlier than `opening_time` means the window runs past midnight.
    pub closing_time: String,
    /// IANA zone name, e.g. `Asia/Kolkata`.
    pub timezone: String,
    #[serde(default)]
    pub manual_override: ManualOverride,
    pub override_reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHolidayRequest {
    pub holiday_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HolidayList {
    pub items: Vec<Holiday>,
}
