use crate::domain::models::availability::{AvailabilityEntry, TemplateDiff, WeeklyTemplate};
use crate::domain::models::reservation::Reservation;
use crate::domain::models::slot::{
    is_standard_slot, is_valid_weekday, weekday_label, weekday_of, MAX_SLOTS_PER_DAY,
    MAX_SLOTS_PER_WEEK, STANDARD_SLOTS,
};
use crate::domain::models::slot::{business_slot_of, slot_index};
use crate::error::AppError;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Unavailable,
    Available,
    Reserved,
}

#[derive(Debug, Serialize)]
pub struct SlotView {
    pub time: String,
    pub status: SlotStatus,
}

#[derive(Debug, Serialize)]
pub struct DaySchedule {
    pub week: String,
    pub date: String,
    pub slots: Vec<SlotView>,
}

/// Defense in depth behind the schema layer: weekday range, slot enum
/// membership, per-day uniqueness and the 10-per-day / 70-total bounds.
pub fn validate_template(template: &WeeklyTemplate) -> Result<(), AppError> {
    let mut total = 0usize;

    for (weekday, slots) in template {
        if !is_valid_weekday(*weekday) {
            return Err(AppError::Validation(format!("Invalid weekday: {}", weekday)));
        }
        if slots.len() > MAX_SLOTS_PER_DAY {
            return Err(AppError::Validation(format!(
                "Weekday {} has {} slots, maximum is {}",
                weekday,
                slots.len(),
                MAX_SLOTS_PER_DAY
            )));
        }

        let mut seen = HashSet::new();
        for slot in slots {
            if !is_standard_slot(slot) {
                return Err(AppError::Validation(format!("Invalid slot time: {}", slot)));
            }
            if !seen.insert(slot.as_str()) {
                return Err(AppError::Validation(format!(
                    "Duplicate slot {} on weekday {}",
                    slot, weekday
                )));
            }
        }
        total += slots.len();
    }

    if total > MAX_SLOTS_PER_WEEK {
        return Err(AppError::Validation(format!(
            "Template has {} entries, maximum is {}",
            total, MAX_SLOTS_PER_WEEK
        )));
    }

    Ok(())
}

/// Full-swap set difference between the stored entries and the submitted
/// template. Cells present on both sides persist untouched; a removed
/// cell is deactivated and counted as deleted; re-submitting a
/// previously removed cell reactivates its row and counts as updated.
pub fn diff_template(current: &[AvailabilityEntry], template: &WeeklyTemplate) -> TemplateDiff {
    let submitted: HashSet<(i32, &str)> = template
        .iter()
        .flat_map(|(weekday, slots)| slots.iter().map(|s| (*weekday, s.as_str())))
        .collect();
    let existing: HashSet<(i32, &str)> = current
        .iter()
        .map(|e| (e.weekday, e.slot.as_str()))
        .collect();

    let mut diff = TemplateDiff::default();

    for (weekday, slot) in &submitted {
        if !existing.contains(&(*weekday, *slot)) {
            diff.to_insert.push((*weekday, slot.to_string()));
        }
    }
    for entry in current {
        let key = (entry.weekday, entry.slot.as_str());
        if !submitted.contains(&key) {
            // Already-inactive rows are not deleted a second time.
            if entry.is_active {
                diff.to_delete.push((entry.weekday, entry.slot.clone()));
            }
        } else if !entry.is_active {
            diff.to_reactivate.push((entry.weekday, entry.slot.clone()));
        }
    }

    sort_cells(&mut diff.to_insert);
    sort_cells(&mut diff.to_delete);
    sort_cells(&mut diff.to_reactivate);
    diff
}

fn sort_cells(cells: &mut [(i32, String)]) {
    cells.sort_by_key(|(weekday, slot)| (*weekday, slot_index(slot).unwrap_or(usize::MAX)));
}

/// The template as stored, grouped per weekday in catalog order.
pub fn template_of(entries: &[AvailabilityEntry]) -> WeeklyTemplate {
    let mut template = WeeklyTemplate::new();
    for entry in entries.iter().filter(|e| e.is_active) {
        template.entry(entry.weekday).or_default().push(entry.slot.clone());
    }
    for slots in template.values_mut() {
        slots.sort_by_key(|s| slot_index(s).unwrap_or(usize::MAX));
    }
    template
}

pub fn slots_by_day(template: &WeeklyTemplate) -> BTreeMap<i32, usize> {
    template.iter().map(|(weekday, slots)| (*weekday, slots.len())).collect()
}

/// Projects the weekly template plus live reservations onto concrete
/// dates, starting at `start` (the caller passes tomorrow in business
/// time). Every catalog slot appears for every day, in canonical order.
pub fn project_schedule(
    entries: &[AvailabilityEntry],
    reservations: &[Reservation],
    start: NaiveDate,
    days: u32,
) -> Vec<DaySchedule> {
    let enabled: HashSet<(i32, &str)> = entries
        .iter()
        .filter(|e| e.is_active)
        .map(|e| (e.weekday, e.slot.as_str()))
        .collect();

    let mut reserved: HashSet<(NaiveDate, String)> = HashSet::new();
    for reservation in reservations.iter().filter(|r| r.holds_slot()) {
        let (date, _, slot) = business_slot_of(reservation.reserve_time);
        reserved.insert((date, slot));
    }

    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            let weekday = weekday_of(date);

            let slots = STANDARD_SLOTS
                .iter()
                .map(|slot| {
                    let status = if reserved.contains(&(date, slot.to_string())) {
                        SlotStatus::Reserved
                    } else if enabled.contains(&(weekday, *slot)) {
                        SlotStatus::Available
                    } else {
                        SlotStatus::Unavailable
                    };
                    SlotView { time: slot.to_string(), status }
                })
                .collect();

            DaySchedule {
                week: weekday_label(weekday).to_string(),
                date: date.format("%Y-%m-%d").to_string(),
                slots,
            }
        })
        .collect()
}
