use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A student's paid entitlement to sessions of one course. Invariant at
/// every write: 0 <= quantity_used <= quantity_total.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PurchaseRecord {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub quantity_total: i32,
    pub quantity_used: i32,
    pub created_at: DateTime<Utc>,
}

impl PurchaseRecord {
    pub fn quantity_remaining(&self) -> i32 {
        self.quantity_total - self.quantity_used
    }

    pub fn has_remaining(&self) -> bool {
        self.quantity_remaining() > 0
    }
}
