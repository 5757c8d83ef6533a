use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateReservationRequest, RejectReservationRequest};
use crate::api::dtos::responses::ReservationResponse;
use crate::api::extractors::auth::{AuthStudent, AuthTeacher, AuthUser, Role};
use crate::config::QuotaReleasePolicy;
use crate::domain::models::reservation::{NewReservationParams, PartyStatus, Reservation, StatusUpdate};
use crate::domain::models::slot::{business_today, is_standard_slot, slot_start_utc, weekday_of};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    AuthStudent(student_id): AuthStudent,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".to_string()))?;

    if !is_standard_slot(&payload.time) {
        return Err(AppError::Validation(format!("Invalid slot time: {}", payload.time)));
    }
    // Bookable days start tomorrow in business time, matching the projection.
    if date <= business_today() {
        return Err(AppError::Validation("Bookings must be at least one day ahead".to_string()));
    }

    let purchase = state.purchase_repo.find_by_id(payload.purchase_id).await?
        .ok_or(AppError::NotFound("Purchase not found".to_string()))?;
    if purchase.student_id != student_id {
        return Err(AppError::Forbidden("Purchase belongs to another student".to_string()));
    }
    if purchase.course_id != payload.course_id {
        return Err(AppError::Business("Purchase is for a different course".to_string()));
    }

    let weekday = weekday_of(date);
    let entries = state.availability_repo.list_by_teacher(payload.teacher_id).await?;
    let enabled = entries
        .iter()
        .any(|e| e.is_active && e.weekday == weekday && e.slot == payload.time);
    if !enabled {
        return Err(AppError::Business("Teacher has not opened this slot".to_string()));
    }

    let reserve_time = slot_start_utc(date, &payload.time)
        .ok_or(AppError::Validation(format!("Invalid slot time: {}", payload.time)))?;

    let reservation = Reservation::new(NewReservationParams {
        course_id: payload.course_id,
        teacher_id: payload.teacher_id,
        student_id,
        purchase_id: payload.purchase_id,
        reserve_time,
        require_confirmation: payload.require_confirmation.unwrap_or(false),
    });

    // Quota consumption and the insert share one transaction; the partial
    // unique index on (teacher_id, reserve_time) is the double-booking
    // guard and surfaces as 409.
    let created = state.reservation_repo.create_with_quota(&reservation).await?;

    info!(
        "Reservation {} created: teacher {} student {} at {}",
        created.uuid, created.teacher_id, created.student_id, created.reserve_time
    );
    Ok(Json(ReservationResponse::from(&created)))
}

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let reservations = state.reservation_repo.list_for_user(user.id).await?;
    let views: Vec<ReservationResponse> = reservations.iter().map(ReservationResponse::from).collect();
    Ok(Json(views))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = find_for_party(&state, &uuid, user.id).await?;
    Ok(Json(ReservationResponse::from(&reservation)))
}

/// Teacher accepts a pending request: both axes move to RESERVED.
pub async fn confirm_reservation(
    State(state): State<Arc<AppState>>,
    AuthTeacher(teacher_id): AuthTeacher,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = find_for_party(&state, &uuid, teacher_id).await?;
    if reservation.teacher_id != teacher_id {
        return Err(AppError::Forbidden("Not the teacher of this reservation".to_string()));
    }
    // Both axes must still be PENDING: a cancelled or rejected request
    // must not be resurrected by a late confirm.
    require_transition(reservation.teacher_state(), PartyStatus::Reserved)?;
    require_transition(reservation.student_state(), PartyStatus::Reserved)?;

    let updated = state
        .reservation_repo
        .update_status(&uuid, StatusUpdate {
            expected: (reservation.teacher_state(), reservation.student_state()),
            teacher_status: PartyStatus::Reserved,
            student_status: PartyStatus::Reserved,
            rejection_reason: None,
            release_quota: false,
        })
        .await?;

    info!("Reservation {} confirmed by teacher {}", uuid, teacher_id);
    Ok(Json(ReservationResponse::from(&updated)))
}

/// Teacher declines a pending request: both axes move to REJECTED and the
/// quota unit consumed at creation is returned.
pub async fn reject_reservation(
    State(state): State<Arc<AppState>>,
    AuthTeacher(teacher_id): AuthTeacher,
    Path(uuid): Path<String>,
    Json(payload): Json<RejectReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = find_for_party(&state, &uuid, teacher_id).await?;
    if reservation.teacher_id != teacher_id {
        return Err(AppError::Forbidden("Not the teacher of this reservation".to_string()));
    }
    require_transition(reservation.teacher_state(), PartyStatus::Rejected)?;
    require_transition(reservation.student_state(), PartyStatus::Rejected)?;

    let release = reservation.holds_slot();
    let updated = state
        .reservation_repo
        .update_status(&uuid, StatusUpdate {
            expected: (reservation.teacher_state(), reservation.student_state()),
            teacher_status: PartyStatus::Rejected,
            student_status: PartyStatus::Rejected,
            rejection_reason: Some(payload.reason),
            release_quota: release,
        })
        .await?;

    info!("Reservation {} rejected by teacher {}", uuid, teacher_id);
    Ok(Json(ReservationResponse::from(&updated)))
}

/// Either party cancels its own side. The quota unit is returned only on
/// the transition that actually frees the slot, per the release policy.
pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = find_for_party(&state, &uuid, user.id).await?;
    let (own, teacher_status, student_status) = next_pair(&reservation, &user, PartyStatus::Cancelled)?;
    require_transition(own, PartyStatus::Cancelled)?;

    let release = reservation.holds_slot()
        && quota_refundable(state.config.quota_release_policy, &reservation);

    let updated = state
        .reservation_repo
        .update_status(&uuid, StatusUpdate {
            expected: (reservation.teacher_state(), reservation.student_state()),
            teacher_status,
            student_status,
            rejection_reason: None,
            release_quota: release,
        })
        .await?;

    info!("Reservation {} cancelled by user {} (refund: {})", uuid, user.id, release);
    Ok(Json(ReservationResponse::from(&updated)))
}

/// Either party marks its own side completed. Reviews unlock once both
/// sides are COMPLETED.
pub async fn complete_reservation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = find_for_party(&state, &uuid, user.id).await?;
    let (own, teacher_status, student_status) = next_pair(&reservation, &user, PartyStatus::Completed)?;
    require_transition(own, PartyStatus::Completed)?;

    let updated = state
        .reservation_repo
        .update_status(&uuid, StatusUpdate {
            expected: (reservation.teacher_state(), reservation.student_state()),
            teacher_status,
            student_status,
            rejection_reason: None,
            release_quota: false,
        })
        .await?;

    Ok(Json(ReservationResponse::from(&updated)))
}

async fn find_for_party(
    state: &Arc<AppState>,
    uuid: &str,
    user_id: i64,
) -> Result<Reservation, AppError> {
    let reservation = state.reservation_repo.find_by_uuid(uuid).await?
        .ok_or(AppError::NotFound("Reservation not found".to_string()))?;
    if !reservation.is_party(user_id) {
        return Err(AppError::Forbidden("Not a party to this reservation".to_string()));
    }
    Ok(reservation)
}

/// Current state of the acting party's axis, plus the status pair after
/// moving only that axis to `next`.
fn next_pair(
    reservation: &Reservation,
    user: &AuthUser,
    next: PartyStatus,
) -> Result<(PartyStatus, PartyStatus, PartyStatus), AppError> {
    match user.role {
        Role::Teacher if reservation.teacher_id == user.id => {
            Ok((reservation.teacher_state(), next, reservation.student_state()))
        }
        Role::Student if reservation.student_id == user.id => {
            Ok((reservation.student_state(), reservation.teacher_state(), next))
        }
        _ => Err(AppError::Forbidden("Not a party to this reservation".to_string())),
    }
}

fn require_transition(from: PartyStatus, to: PartyStatus) -> Result<(), AppError> {
    if !from.can_transition_to(to) {
        return Err(AppError::Business(format!(
            "Cannot move reservation from {} to {}",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(())
}

fn quota_refundable(policy: QuotaReleasePolicy, reservation: &Reservation) -> bool {
    match policy {
        QuotaReleasePolicy::Always => true,
        QuotaReleasePolicy::BeforeDeadline => {
            let cutoff = reservation.response_deadline.unwrap_or(reservation.reserve_time);
            Utc::now() < cutoff
        }
    }
}
