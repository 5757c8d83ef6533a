use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Full weekly template as submitted by the client: weekday key ("1".."7",
/// or legacy "0" for Sunday) to slot start times. A weekday omitted from
/// the map has all its slots removed.
#[derive(Deserialize)]
#[serde(transparent)]
pub struct ReplaceScheduleRequest(pub BTreeMap<String, Vec<String>>);

#[derive(Deserialize)]
pub struct SlotCell {
    pub weekday: i32,
    pub slot: String,
}

#[derive(Deserialize)]
pub struct ConflictCheckRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// When omitted, the teacher's entire current template is audited.
    pub slots: Option<Vec<SlotCell>>,
}

#[derive(Deserialize)]
pub struct ProjectionQuery {
    pub days: Option<u32>,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub course_id: i64,
    pub teacher_id: i64,
    pub purchase_id: i64,
    pub date: String,
    pub time: String,
    pub require_confirmation: Option<bool>,
}

#[derive(Deserialize)]
pub struct RejectReservationRequest {
    pub reason: String,
}
