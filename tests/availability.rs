use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use shop_ordering_api::availability::{
    AvailabilityError, ClockTime, Holiday, ManualOverride, StoreHours, StoreStatus,
    format_time_12h, local_now, parse_time, resolve, validate_time, validate_timezone,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn hours(open: &str, close: &str) -> StoreHours {
    StoreHours {
        opening_time: open.into(),
        closing_time: close.into(),
        timezone: "UTC".into(),
        manual_override: ManualOverride::None,
        override_reason: None,
    }
}

#[test]
fn parses_strict_clock_times() {
    assert_eq!(parse_time("00:00").unwrap(), ClockTime::new(0, 0).unwrap());
    assert_eq!(parse_time("23:59").unwrap(), ClockTime::new(23, 59).unwrap());
    for bad in ["24:00", "9:00", "09:60", "0900", "", "ab:cd", " 09:00"] {
        assert_eq!(
            validate_time(bad),
            Err(AvailabilityError::InvalidTime(bad.to_string())),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn formats_twelve_hour_times() {
    assert_eq!(format_time_12h("13:05").unwrap(), "1:05 PM");
    assert_eq!(format_time_12h("00:30").unwrap(), "12:30 AM");
    assert_eq!(format_time_12h("12:00").unwrap(), "12:00 PM");
    assert_eq!(format_time_12h("09:00").unwrap(), "9:00 AM");
    assert!(format_time_12h("25:00").is_err());
}

#[test]
fn open_inside_window_and_closed_at_closing_time() {
    let h = hours("09:00", "22:00");

    let open = resolve(&h, &[], at(2024, 5, 1, 9, 0)).unwrap();
    assert_eq!(open.status, StoreStatus::Open);
    assert!(open.is_open);
    assert_eq!(open.message, "Open until 10:00 PM");
    assert_eq!(open.local_time, "09:00");

    let before = resolve(&h, &[], at(2024, 5, 1, 7, 30)).unwrap();
    assert_eq!(before.status, StoreStatus::OpensLater);
    assert!(!before.is_open);
    assert_eq!(before.message, "Opens at 9:00 AM");

    let after = resolve(&h, &[], at(2024, 5, 1, 22, 0)).unwrap();
    assert_eq!(after.status, StoreStatus::Closed);
    assert_eq!(after.message, "Closed. Opens tomorrow at 9:00 AM");
}

#[test]
fn overnight_window_spans_midnight() {
    let h = hours("18:00", "02:00");

    let late = resolve(&h, &[], at(2024, 5, 1, 23, 15)).unwrap();
    assert_eq!(late.status, StoreStatus::Open);
    assert_eq!(late.message, "Open until 2:00 AM");

    let early = resolve(&h, &[], at(2024, 5, 2, 1, 59)).unwrap();
    assert!(early.is_open);

    let afternoon = resolve(&h, &[], at(2024, 5, 2, 12, 0)).unwrap();
    assert_eq!(afternoon.status, StoreStatus::OpensLater);
    assert_eq!(afternoon.message, "Opens at 6:00 PM");
}

#[test]
fn equal_open_and_close_means_closed_all_day() {
    let status = resolve(&hours("10:00", "10:00"), &[], at(2024, 5, 1, 10, 0)).unwrap();
    assert_eq!(status.status, StoreStatus::Closed);
    assert_eq!(status.message, "Closed today");
}

#[test]
fn holiday_closes_the_shop_for_that_date_only() {
    let h = hours("09:00", "22:00");
    let holidays = vec![Holiday {
        date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
        reason: "Christmas".into(),
    }];

    let closed = resolve(&h, &holidays, at(2024, 12, 25, 12, 0)).unwrap();
    assert_eq!(closed.status, StoreStatus::Holiday);
    assert!(!closed.is_open);
    assert_eq!(closed.message, "Closed today for Christmas");

    let next_day = resolve(&h, &holidays, at(2024, 12, 26, 12, 0)).unwrap();
    assert_eq!(next_day.status, StoreStatus::Open);
}

#[test]
fn manual_override_beats_holiday_and_schedule() {
    let holidays = vec![Holiday {
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        reason: "New Year".into(),
    }];

    let mut h = hours("09:00", "22:00");
    h.manual_override = ManualOverride::ForceOpen;
    h.override_reason = Some("Special event".into());
    let forced = resolve(&h, &holidays, at(2024, 1, 1, 3, 0)).unwrap();
    assert_eq!(forced.status, StoreStatus::ForceOpen);
    assert!(forced.is_open);
    assert_eq!(forced.message, "Open now: Special event");

    h.manual_override = ManualOverride::ForceClose;
    h.override_reason = Some("   ".into());
    let closed = resolve(&h, &[], at(2024, 1, 2, 12, 0)).unwrap();
    assert_eq!(closed.status, StoreStatus::ForceClose);
    assert!(!closed.is_open);
    assert_eq!(closed.message, "Temporarily closed");
}

#[test]
fn override_ignores_malformed_schedule() {
    let mut h = hours("nope", "22:00");
    assert!(resolve(&h, &[], at(2024, 1, 2, 12, 0)).is_err());

    h.manual_override = ManualOverride::ForceClose;
    assert!(resolve(&h, &[], at(2024, 1, 2, 12, 0)).is_ok());
}

#[test]
fn override_values_round_trip_through_strings() {
    assert_eq!("force_open".parse::<ManualOverride>().unwrap(), ManualOverride::ForceOpen);
    assert_eq!("none".parse::<ManualOverride>().unwrap(), ManualOverride::None);
    assert_eq!(ManualOverride::ForceClose.as_str(), "force_close");
    assert!("sometimes".parse::<ManualOverride>().is_err());
}

#[test]
fn local_now_converts_into_shop_timezone() {
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
    assert_eq!(local_now("Asia/Kolkata", now), at(2024, 7, 1, 17, 30));
    assert_eq!(local_now("America/New_York", now), at(2024, 7, 1, 8, 0));
    assert_eq!(local_now("Mars/Olympus", now), at(2024, 7, 1, 12, 0));

    assert!(validate_timezone("Europe/Berlin").is_ok());
    assert_eq!(
        validate_timezone("Mars/Olympus").unwrap_err(),
        AvailabilityError::InvalidTimezone("Mars/Olympus".into())
    );
}
