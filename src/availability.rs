//! Store availability resolution.
//!
//! Everything here is pure: callers supply the shop's schedule, its holiday
//! calendar and the current wall-clock time in the shop's timezone, and get
//! back a [`AvailabilityStatus`]. The only clock read lives in [`local_now`].

use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern is a valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("invalid time '{0}', expected HH:MM (00:00-23:59)")]
    InvalidTime(String),

    #[error("unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("invalid manual override '{0}'")]
    InvalidOverride(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ManualOverride {
    #[default]
    None,
    ForceOpen,
    ForceClose,
}

impl ManualOverride {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManualOverride::None => "none",
            ManualOverride::ForceOpen => "force_open",
            ManualOverride::ForceClose => "force_close",
        }
    }
}

impl FromStr for ManualOverride {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(ManualOverride::None),
            "force_open" => Ok(ManualOverride::ForceOpen),
            "force_close" => Ok(ManualOverride::ForceClose),
            other => Err(AvailabilityError::InvalidOverride(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    Open,
    Closed,
    OpensLater,
    Holiday,
    ForceOpen,
    ForceClose,
}

impl StoreStatus {
    /// Whether the shop accepts orders in this state.
    pub fn is_open(&self) -> bool {
        matches!(self, StoreStatus::Open | StoreStatus::ForceOpen)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Open => "open",
            StoreStatus::Closed => "closed",
            StoreStatus::OpensLater => "opens_later",
            StoreStatus::Holiday => "holiday",
            StoreStatus::ForceOpen => "force_open",
            StoreStatus::ForceClose => "force_close",
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self {
            minutes: u16::from(hour) * 60 + u16::from(minute),
        })
    }

    pub fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    /// `13:05` renders as `1:05 PM`.
    pub fn to_12_hour(&self) -> String {
        let hour = self.hour();
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{display_hour}:{:02} {suffix}", self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s)
    }
}

impl From<NaiveDateTime> for ClockTime {
    fn from(value: NaiveDateTime) -> Self {
        Self {
            minutes: (value.hour() * 60 + value.minute()) as u16,
        }
    }
}

/// Parse a strict `HH:MM` string.
pub fn parse_time(value: &str) -> Result<ClockTime, AvailabilityError> {
    let invalid = || AvailabilityError::InvalidTime(value.to_string());
    let caps = TIME_RE.captures(value).ok_or_else(invalid)?;
    let hour = caps[1].parse::<u8>().map_err(|_| invalid())?;
    let minute = caps[2].parse::<u8>().map_err(|_| invalid())?;
    ClockTime::new(hour, minute).ok_or_else(invalid)
}

pub fn validate_time(value: &str) -> Result<(), AvailabilityError> {
    parse_time(value).map(|_| ())
}

/// Format an `HH:MM` string for display, e.g. `"13:05"` -> `"1:05 PM"`.
pub fn format_time_12h(value: &str) -> Result<String, AvailabilityError> {
    parse_time(value).map(|t| t.to_12_hour())
}

pub fn validate_timezone(name: &str) -> Result<Tz, AvailabilityError> {
    name.parse::<Tz>()
        .map_err(|_| AvailabilityError::InvalidTimezone(name.to_string()))
}

/// Current wall-clock time for a shop. Unknown zones fall back to UTC.
pub fn local_now(timezone: &str, now: DateTime<Utc>) -> NaiveDateTime {
    match validate_timezone(timezone) {
        Ok(tz) => now.with_timezone(&tz).naive_local(),
        Err(_) => {
            tracing::warn!(timezone, "unknown shop timezone, using UTC");
            now.naive_utc()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHours {
    pub opening_time: String,
    pub closing_time: String,
    pub timezone: String,
    pub manual_override: ManualOverride,
    pub override_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct AvailabilityStatus {
    pub status: StoreStatus,
    pub message: String,
    pub is_open: bool,
    pub opening_time: String,
    pub closing_time: String,
    pub timezone: String,
    pub manual_override: ManualOverride,
    /// Shop-local time the status was computed for, `HH:MM`.
    pub local_time: String,
}

/// Resolve the store status at `now` (shop-local time).
///
/// Precedence: manual override, then holiday, then the opening window.
pub fn resolve(
    hours: &StoreHours,
    holidays: &[Holiday],
    now: NaiveDateTime,
) -> Result<AvailabilityStatus, AvailabilityError> {
    let (status, message) = resolve_status(hours, holidays, now)?;
    Ok(AvailabilityStatus {
        status,
        message,
        is_open: status.is_open(),
        opening_time: hours.opening_time.clone(),
        closing_time: hours.closing_time.clone(),
        timezone: hours.timezone.clone(),
        manual_override: hours.manual_override,
        local_time: ClockTime::from(now).to_string(),
    })
}

fn resolve_status(
    hours: &StoreHours,
    holidays: &[Holiday],
    now: NaiveDateTime,
) -> Result<(StoreStatus, String), AvailabilityError> {
    let reason = hours
        .override_reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    match hours.manual_override {
        ManualOverride::ForceOpen => {
            let message = match reason {
                Some(r) => format!("Open now: {r}"),
                None => "Open now".to_string(),
            };
            return Ok((StoreStatus::ForceOpen, message));
        }
        ManualOverride::ForceClose => {
            let message = match reason {
                Some(r) => format!("Temporarily closed: {r}"),
                None => "Temporarily closed".to_string(),
            };
            return Ok((StoreStatus::ForceClose, message));
        }
        ManualOverride::None => {}
    }

    if let Some(holiday) = holidays.iter().find(|h| h.date == now.date()) {
        return Ok((
            StoreStatus::Holiday,
            format!("Closed today for {}", holiday.reason),
        ));
    }

    let opening = parse_time(&hours.opening_time)?;
    let closing = parse_time(&hours.closing_time)?;
    let current = ClockTime::from(now);

    if opening == closing {
        return Ok((StoreStatus::Closed, "Closed today".to_string()));
    }

    let within = if opening < closing {
        opening <= current && current < closing
    } else {
        current >= opening || current < closing
    };

    if within {
        return Ok((
            StoreStatus::Open,
            format!("Open until {}", closing.to_12_hour()),
        ));
    }

    // Overnight windows are closed only between closing and opening, so the
    // next opening is always later the same day.
    if current < opening {
        Ok((
            StoreStatus::OpensLater,
            format!("Opens at {}", opening.to_12_hour()),
        ))
    } else {
        Ok((
            StoreStatus::Closed,
            format!("Closed. Opens tomorrow at {}", opening.to_12_hour()),
        ))
    }
}
