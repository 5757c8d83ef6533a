use crate::domain::models::availability::WeeklyTemplate;
use crate::domain::models::purchase::PurchaseRecord;
use crate::domain::models::reservation::{EffectiveStatus, Reservation};
use crate::domain::services::conflict::ConflictRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct WeeklyScheduleResponse {
    pub weekly_schedule: WeeklyTemplate,
    pub total_slots: usize,
    pub slots_by_day: BTreeMap<i32, usize>,
    pub created_count: usize,
    pub updated_count: usize,
    pub deleted_count: usize,
}

#[derive(Serialize)]
pub struct ScheduleView {
    pub weekly_schedule: WeeklyTemplate,
    pub total_slots: usize,
    pub slots_by_day: BTreeMap<i32, usize>,
}

#[derive(Serialize)]
pub struct ConflictReportResponse {
    pub conflicts: Vec<ConflictRecord>,
}

#[derive(Serialize)]
pub struct ReservationResponse {
    pub uuid: String,
    pub course_id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
    pub purchase_id: i64,
    pub reserve_time: DateTime<Utc>,
    pub teacher_status: String,
    pub student_status: String,
    pub effective_status: EffectiveStatus,
    pub response_deadline: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Reservation> for ReservationResponse {
    fn from(r: &Reservation) -> Self {
        Self {
            uuid: r.uuid.clone(),
            course_id: r.course_id,
            teacher_id: r.teacher_id,
            student_id: r.student_id,
            purchase_id: r.purchase_id,
            reserve_time: r.reserve_time,
            teacher_status: r.teacher_status.clone(),
            student_status: r.student_status.clone(),
            effective_status: r.effective_status(),
            response_deadline: r.response_deadline,
            rejection_reason: r.rejection_reason.clone(),
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct PurchaseResponse {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub quantity_total: i32,
    pub quantity_used: i32,
    pub quantity_remaining: i32,
}

impl From<&PurchaseRecord> for PurchaseResponse {
    fn from(p: &PurchaseRecord) -> Self {
        Self {
            id: p.id,
            student_id: p.student_id,
            course_id: p.course_id,
            quantity_total: p.quantity_total,
            quantity_used: p.quantity_used,
            quantity_remaining: p.quantity_remaining(),
        }
    }
}
