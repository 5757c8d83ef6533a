use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// The single fixed business timezone. Weekday and hour-of-day reads on a
/// stored UTC instant must go through this, never through the host timezone.
pub const BUSINESS_TZ: Tz = chrono_tz::Asia::Shanghai;

/// The 10 fixed daily teaching slots, in canonical display order.
pub const STANDARD_SLOTS: [&str; 10] = [
    "09:00", "10:00", "11:00", "13:00", "14:00",
    "15:00", "16:00", "17:00", "19:00", "20:00",
];

pub const WEEKDAY_MIN: i32 = 1;
pub const WEEKDAY_MAX: i32 = 7;

pub const MAX_SLOTS_PER_DAY: usize = STANDARD_SLOTS.len();
pub const MAX_SLOTS_PER_WEEK: usize = MAX_SLOTS_PER_DAY * 7;

pub fn is_standard_slot(time: &str) -> bool {
    STANDARD_SLOTS.contains(&time)
}

pub fn slot_index(time: &str) -> Option<usize> {
    STANDARD_SLOTS.iter().position(|s| *s == time)
}

pub fn is_valid_weekday(weekday: i32) -> bool {
    (WEEKDAY_MIN..=WEEKDAY_MAX).contains(&weekday)
}

pub fn weekday_label(weekday: i32) -> &'static str {
    match weekday {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        7 => "Sunday",
        _ => "Unknown",
    }
}

/// Older clients use the 0-6 scheme with Sunday = 0. Canonically only
/// Sunday differs (7 vs 0), but both ends stay behind this adapter.
pub fn weekday_from_legacy(legacy: i32) -> Option<i32> {
    match legacy {
        0 => Some(7),
        1..=6 => Some(legacy),
        _ => None,
    }
}

pub fn weekday_to_legacy(weekday: i32) -> Option<i32> {
    match weekday {
        7 => Some(0),
        1..=6 => Some(weekday),
        _ => None,
    }
}

/// Canonical weekday (Monday = 1) of a calendar date.
pub fn weekday_of(date: NaiveDate) -> i32 {
    date.weekday().number_from_monday() as i32
}

/// Today's date in the business timezone.
pub fn business_today() -> NaiveDate {
    Utc::now().with_timezone(&BUSINESS_TZ).date_naive()
}

/// The UTC instant at which a slot starts on a business-timezone date.
/// Returns None for a time outside the catalog.
pub fn slot_start_utc(date: NaiveDate, slot: &str) -> Option<DateTime<Utc>> {
    if !is_standard_slot(slot) {
        return None;
    }
    let time = NaiveTime::parse_from_str(slot, "%H:%M").ok()?;
    BUSINESS_TZ
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Maps a stored UTC instant back to its business-timezone calendar
/// position: (date, canonical weekday, slot label). The local time is
/// floored to the hour so any instant inside the one-hour window maps to
/// the slot it occupies.
pub fn business_slot_of(instant: DateTime<Utc>) -> (NaiveDate, i32, String) {
    let local = instant.with_timezone(&BUSINESS_TZ);
    let date = local.date_naive();
    let weekday = local.weekday().number_from_monday() as i32;
    let slot = format!("{:02}:00", local.hour());
    (date, weekday, slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_ordered_and_complete() {
        assert_eq!(STANDARD_SLOTS.len(), 10);
        assert!(is_standard_slot("09:00"));
        assert!(is_standard_slot("20:00"));
        assert!(!is_standard_slot("12:00"));
        assert!(!is_standard_slot("9:00"));
        assert_eq!(slot_index("09:00"), Some(0));
        assert_eq!(slot_index("13:00"), Some(3));
        assert_eq!(slot_index("21:00"), None);
    }

    #[test]
    fn legacy_weekday_roundtrip() {
        assert_eq!(weekday_from_legacy(0), Some(7));
        assert_eq!(weekday_from_legacy(1), Some(1));
        assert_eq!(weekday_from_legacy(6), Some(6));
        assert_eq!(weekday_from_legacy(7), None);
        assert_eq!(weekday_to_legacy(7), Some(0));
        assert_eq!(weekday_to_legacy(3), Some(3));
        assert_eq!(weekday_to_legacy(0), None);
    }

    #[test]
    fn utc_instant_maps_to_business_weekday() {
        // 2025-08-18T01:30:00Z is 09:30 Monday in UTC+8, not Sunday 01:30.
        let instant = Utc.with_ymd_and_hms(2025, 8, 18, 1, 30, 0).unwrap();
        let (date, weekday, slot) = business_slot_of(instant);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 18).unwrap());
        assert_eq!(weekday, 1);
        assert_eq!(slot, "09:00");
    }

    #[test]
    fn slot_start_converts_to_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 18).unwrap();
        let start = slot_start_utc(date, "09:00").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 18, 1, 0, 0).unwrap());
        assert!(slot_start_utc(date, "12:00").is_none());
    }

    #[test]
    fn late_evening_slot_stays_on_the_same_business_date() {
        // 20:00 UTC+8 is 12:00 UTC of the same day; the mapping back must
        // not shift across the date line.
        let date = NaiveDate::from_ymd_opt(2025, 8, 24).unwrap(); // Sunday
        let start = slot_start_utc(date, "20:00").unwrap();
        let (d, weekday, slot) = business_slot_of(start);
        assert_eq!(d, date);
        assert_eq!(weekday, 7);
        assert_eq!(slot, "20:00");
    }
}
