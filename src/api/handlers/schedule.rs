use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use std::sync::Arc;

use crate::api::dtos::requests::ProjectionQuery;
use crate::domain::models::slot::business_today;
use crate::domain::services::conflict::range_window_utc;
use crate::domain::services::schedule::project_schedule;
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_PROJECTION_DAYS: u32 = 7;
const MAX_PROJECTION_DAYS: u32 = 30;

/// Public projection of a teacher's bookable calendar. Always starts
/// tomorrow in business time, never today.
pub async fn get_teacher_schedule(
    State(state): State<Arc<AppState>>,
    Path(teacher_id): Path<i64>,
    Query(query): Query<ProjectionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let days = query.days.unwrap_or(DEFAULT_PROJECTION_DAYS);
    if days == 0 || days > MAX_PROJECTION_DAYS {
        return Err(AppError::Validation(format!(
            "days must be between 1 and {}",
            MAX_PROJECTION_DAYS
        )));
    }

    let start = business_today() + Duration::days(1);
    let end = start + Duration::days(days as i64 - 1);

    let entries = state.availability_repo.list_by_teacher(teacher_id).await?;
    let (window_start, window_end) = range_window_utc(start, end);
    let reservations = state
        .reservation_repo
        .list_in_window(teacher_id, window_start, window_end)
        .await?;

    Ok(Json(project_schedule(&entries, &reservations, start, days)))
}
