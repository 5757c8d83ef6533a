use crate::domain::models::{
    availability::{AvailabilityEntry, TemplateDiff},
    purchase::PurchaseRecord,
    reservation::{Reservation, StatusUpdate},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn list_by_teacher(&self, teacher_id: i64) -> Result<Vec<AvailabilityEntry>, AppError>;
    /// Applies a precomputed template diff (inserts, deletes,
    /// reactivations) in one transaction, so a partial failure leaves the
    /// prior template intact.
    async fn apply_diff(&self, teacher_id: i64, diff: &TemplateDiff) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts the reservation and consumes one unit from its purchase in
    /// the same transaction. Quota exhaustion aborts the insert.
    async fn create_with_quota(&self, reservation: &Reservation) -> Result<Reservation, AppError>;
    async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Reservation>, AppError>;
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Reservation>, AppError>;
    /// Non-deleted reservations for a teacher with reserve_time inside
    /// [start, end]. Status filtering happens in the domain layer.
    async fn list_in_window(
        &self,
        teacher_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, AppError>;
    /// Writes both axes plus the optional rejection reason, and releases
    /// one quota unit in the same transaction when `release_quota` is set.
    /// The write only lands while the stored pair still equals
    /// `update.expected`; a concurrent transition surfaces as Conflict.
    async fn update_status(&self, uuid: &str, update: StatusUpdate) -> Result<Reservation, AppError>;
    /// PENDING-on-both-axes reservations whose response deadline has
    /// passed, for the background sweeper.
    async fn list_pending_expired(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, AppError>;
}

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<PurchaseRecord>, AppError>;
    async fn consume(&self, purchase_id: i64, quantity: i32) -> Result<PurchaseRecord, AppError>;
    async fn release(&self, purchase_id: i64, quantity: i32) -> Result<PurchaseRecord, AppError>;
}
