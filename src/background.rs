use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::domain::models::reservation::{PartyStatus, StatusUpdate};
use crate::error::AppError;
use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Sweeps pending reservations whose response deadline has passed: both
/// axes move to REJECTED and the quota unit goes back to the purchase.
pub async fn start_deadline_sweeper(state: Arc<AppState>) {
    info!("Starting reservation deadline sweeper...");

    loop {
        match state.reservation_repo.list_pending_expired(Utc::now()).await {
            Ok(expired) => {
                for reservation in expired {
                    let uuid = reservation.uuid.clone();

                    let span = info_span!(
                        "deadline_sweep",
                        reservation_uuid = %uuid,
                        teacher_id = reservation.teacher_id,
                        student_id = reservation.student_id,
                    );

                    let state = state.clone();
                    async move {
                        let result = state
                            .reservation_repo
                            .update_status(&uuid, StatusUpdate {
                                expected: (PartyStatus::Pending, PartyStatus::Pending),
                                teacher_status: PartyStatus::Rejected,
                                student_status: PartyStatus::Rejected,
                                rejection_reason: Some("Response deadline expired".to_string()),
                                release_quota: true,
                            })
                            .await;

                        match result {
                            Ok(_) => info!("Expired pending reservation, quota released"),
                            // A party acted between the fetch and the write.
                            Err(AppError::Conflict(_)) => info!("Reservation no longer pending, skipped"),
                            Err(e) => error!("Failed to expire reservation: {:?}", e),
                        }
                    }
                    .instrument(span)
                    .await;
                }
            }
            Err(e) => error!("Failed to fetch expired reservations: {:?}", e),
        }
        sleep(SWEEP_INTERVAL).await;
    }
}
