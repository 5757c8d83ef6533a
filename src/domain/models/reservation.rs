use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status of one party's side of a reservation. Teacher and student carry
/// an independent copy of the same machine, because either can act
/// without the other's cooperation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartyStatus {
    Pending,
    Reserved,
    Completed,
    Cancelled,
    Rejected,
}

impl PartyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyStatus::Pending => "PENDING",
            PartyStatus::Reserved => "RESERVED",
            PartyStatus::Completed => "COMPLETED",
            PartyStatus::Cancelled => "CANCELLED",
            PartyStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(PartyStatus::Pending),
            "RESERVED" => Some(PartyStatus::Reserved),
            "COMPLETED" => Some(PartyStatus::Completed),
            "CANCELLED" => Some(PartyStatus::Cancelled),
            "REJECTED" => Some(PartyStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PartyStatus::Completed | PartyStatus::Cancelled | PartyStatus::Rejected
        )
    }

    /// A party in this state still occupies the time slot.
    pub fn holds_slot(&self) -> bool {
        matches!(self, PartyStatus::Pending | PartyStatus::Reserved)
    }

    pub fn can_transition_to(&self, next: PartyStatus) -> bool {
        matches!(
            (self, next),
            (PartyStatus::Pending, PartyStatus::Reserved)
                | (PartyStatus::Pending, PartyStatus::Rejected)
                | (PartyStatus::Pending, PartyStatus::Cancelled)
                | (PartyStatus::Reserved, PartyStatus::Completed)
                | (PartyStatus::Reserved, PartyStatus::Cancelled)
        )
    }
}

/// Combined view over the two axes, derived rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EffectiveStatus {
    Pending,
    Reserved,
    Completed,
    Cancelled,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub uuid: String,
    pub course_id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
    pub purchase_id: i64,
    pub reserve_time: DateTime<Utc>,
    pub teacher_status: String,
    pub student_status: String,
    pub response_deadline: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One optimistic status write. The repository applies it only while the
/// stored pair still equals `expected`, so two racing transitions cannot
/// clobber each other or double-release quota.
pub struct StatusUpdate {
    pub expected: (PartyStatus, PartyStatus),
    pub teacher_status: PartyStatus,
    pub student_status: PartyStatus,
    pub rejection_reason: Option<String>,
    pub release_quota: bool,
}

pub struct NewReservationParams {
    pub course_id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
    pub purchase_id: i64,
    pub reserve_time: DateTime<Utc>,
    /// When set, both sides start PENDING and the teacher has 24 hours to
    /// confirm; otherwise the booking is immediately RESERVED.
    pub require_confirmation: bool,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        let (status, deadline) = if params.require_confirmation {
            (PartyStatus::Pending, Some(Utc::now() + Duration::hours(24)))
        } else {
            (PartyStatus::Reserved, None)
        };

        Self {
            uuid: Uuid::new_v4().to_string(),
            course_id: params.course_id,
            teacher_id: params.teacher_id,
            student_id: params.student_id,
            purchase_id: params.purchase_id,
            reserve_time: params.reserve_time,
            teacher_status: status.as_str().to_string(),
            student_status: status.as_str().to_string(),
            response_deadline: deadline,
            rejection_reason: None,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn teacher_state(&self) -> PartyStatus {
        PartyStatus::parse(&self.teacher_status).unwrap_or(PartyStatus::Pending)
    }

    pub fn student_state(&self) -> PartyStatus {
        PartyStatus::parse(&self.student_status).unwrap_or(PartyStatus::Pending)
    }

    pub fn effective_status(&self) -> EffectiveStatus {
        let (t, s) = (self.teacher_state(), self.student_state());
        if t == PartyStatus::Rejected || s == PartyStatus::Rejected {
            EffectiveStatus::Rejected
        } else if t == PartyStatus::Cancelled || s == PartyStatus::Cancelled {
            EffectiveStatus::Cancelled
        } else if t == PartyStatus::Completed && s == PartyStatus::Completed {
            EffectiveStatus::Completed
        } else if t == PartyStatus::Reserved && s == PartyStatus::Reserved {
            EffectiveStatus::Reserved
        } else {
            EffectiveStatus::Pending
        }
    }

    /// The reservation still occupies its time slot. Matches the partial
    /// unique index on (teacher_id, reserve_time).
    pub fn holds_slot(&self) -> bool {
        self.deleted_at.is_none()
            && self.teacher_state().holds_slot()
            && self.student_state().holds_slot()
    }

    /// A review can be attached only once both sides completed.
    pub fn can_review(&self) -> bool {
        self.effective_status() == EffectiveStatus::Completed
    }

    pub fn is_party(&self, user_id: i64) -> bool {
        self.teacher_id == user_id || self.student_id == user_id
    }
}
