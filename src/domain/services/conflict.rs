use crate::domain::models::reservation::Reservation;
use crate::domain::models::slot::{business_slot_of, BUSINESS_TZ};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// A candidate (weekday, slot) cell that collides with a committed
/// reservation inside the checked date range.
#[derive(Debug, Serialize)]
pub struct ConflictRecord {
    pub weekday: i32,
    pub slot: String,
    pub reservation_uuid: String,
    pub reason: String,
}

pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), AppError> {
    if from > to {
        return Err(AppError::Validation(format!(
            "Invalid date range: {} is after {}",
            from, to
        )));
    }
    Ok(())
}

/// UTC window covering [from, to] as full business-timezone days, for the
/// repository fetch that precedes the in-memory match.
pub fn range_window_utc(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = BUSINESS_TZ
        .from_local_datetime(&from.and_hms_opt(0, 0, 0).unwrap())
        .single()
        .unwrap()
        .with_timezone(&Utc);
    let end = BUSINESS_TZ
        .from_local_datetime(&to.and_hms_opt(23, 59, 59).unwrap())
        .single()
        .unwrap()
        .with_timezone(&Utc);
    (start, end)
}

/// Matches slot-holding reservations against the candidate cells. Each
/// reservation's stored UTC instant is mapped back through the business
/// timezone, so a booking near midnight lands on the correct weekday.
pub fn find_conflicts(
    candidates: &[(i32, String)],
    reservations: &[Reservation],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<ConflictRecord> {
    let candidate_set: HashSet<(i32, &str)> = candidates
        .iter()
        .map(|(weekday, slot)| (*weekday, slot.as_str()))
        .collect();

    let mut conflicts = Vec::new();
    for reservation in reservations.iter().filter(|r| r.holds_slot()) {
        let (date, weekday, slot) = business_slot_of(reservation.reserve_time);
        if date < from || date > to {
            continue;
        }
        if candidate_set.contains(&(weekday, slot.as_str())) {
            conflicts.push(ConflictRecord {
                weekday,
                slot: slot.clone(),
                reservation_uuid: reservation.uuid.clone(),
                reason: format!("booked session on {} at {}", date, slot),
            });
        }
    }

    conflicts.sort_by(|a, b| {
        (a.weekday, a.slot.as_str(), a.reservation_uuid.as_str())
            .cmp(&(b.weekday, b.slot.as_str(), b.reservation_uuid.as_str()))
    });
    conflicts
}
