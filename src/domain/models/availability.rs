use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// One (weekday, slot) cell of a teacher's recurring weekly template.
/// Unique per (teacher_id, weekday, slot); removing a cell from the
/// template flips `is_active` off rather than dropping the row.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityEntry {
    pub id: i64,
    pub teacher_id: i64,
    pub weekday: i32,
    pub slot: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Canonical in-memory shape of a weekly template: weekday (1-7) to the
/// slots enabled on that day, in catalog order.
pub type WeeklyTemplate = BTreeMap<i32, Vec<String>>;

/// Rows to apply when swapping a teacher's template, plus the audit
/// counts reported back to the caller.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TemplateDiff {
    pub to_insert: Vec<(i32, String)>,
    pub to_delete: Vec<(i32, String)>,
    pub to_reactivate: Vec<(i32, String)>,
}

impl TemplateDiff {
    pub fn created_count(&self) -> usize {
        self.to_insert.len()
    }

    pub fn updated_count(&self) -> usize {
        self.to_reactivate.len()
    }

    pub fn deleted_count(&self) -> usize {
        self.to_delete.len()
    }
}
