use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ConflictCheckRequest, ReplaceScheduleRequest};
use crate::api::dtos::responses::{ConflictReportResponse, ScheduleView, WeeklyScheduleResponse};
use crate::api::extractors::auth::AuthTeacher;
use crate::domain::models::availability::WeeklyTemplate;
use crate::domain::models::slot::{is_standard_slot, is_valid_weekday, weekday_from_legacy};
use crate::domain::services::conflict::{find_conflicts, range_window_utc, validate_range};
use crate::domain::services::schedule::{diff_template, slots_by_day, template_of, validate_template};
use crate::error::AppError;
use crate::state::AppState;

fn parse_template(payload: ReplaceScheduleRequest) -> Result<WeeklyTemplate, AppError> {
    let mut template = WeeklyTemplate::new();

    for (key, slots) in payload.0 {
        let raw: i32 = key.parse()
            .map_err(|_| AppError::Validation(format!("Invalid weekday key: {}", key)))?;
        // "0" is the legacy Sunday key; everything else must already be canonical.
        let weekday = if raw == 0 {
            weekday_from_legacy(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid weekday key: {}", key)))?
        } else {
            raw
        };
        if template.insert(weekday, slots).is_some() {
            return Err(AppError::Validation(format!("Duplicate weekday key: {}", key)));
        }
    }

    Ok(template)
}

pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    AuthTeacher(teacher_id): AuthTeacher,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.availability_repo.list_by_teacher(teacher_id).await?;
    let template = template_of(&entries);

    Ok(Json(ScheduleView {
        total_slots: template.values().map(|s| s.len()).sum(),
        slots_by_day: slots_by_day(&template),
        weekly_schedule: template,
    }))
}

pub async fn replace_schedule(
    State(state): State<Arc<AppState>>,
    AuthTeacher(teacher_id): AuthTeacher,
    Json(payload): Json<ReplaceScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let template = parse_template(payload)?;
    validate_template(&template)?;

    let current = state.availability_repo.list_by_teacher(teacher_id).await?;
    let diff = diff_template(&current, &template);

    state.availability_repo.apply_diff(teacher_id, &diff).await?;

    info!(
        "Schedule replaced for teacher {}: +{} ~{} -{}",
        teacher_id,
        diff.created_count(),
        diff.updated_count(),
        diff.deleted_count()
    );

    let entries = state.availability_repo.list_by_teacher(teacher_id).await?;
    let stored = template_of(&entries);

    Ok(Json(WeeklyScheduleResponse {
        total_slots: stored.values().map(|s| s.len()).sum(),
        slots_by_day: slots_by_day(&stored),
        weekly_schedule: stored,
        created_count: diff.created_count(),
        updated_count: diff.updated_count(),
        deleted_count: diff.deleted_count(),
    }))
}

pub async fn check_conflicts(
    State(state): State<Arc<AppState>>,
    AuthTeacher(teacher_id): AuthTeacher,
    Json(payload): Json<ConflictCheckRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_range(payload.from, payload.to)?;

    let candidates: Vec<(i32, String)> = match payload.slots {
        Some(cells) => {
            for cell in &cells {
                if !is_valid_weekday(cell.weekday) {
                    return Err(AppError::Validation(format!("Invalid weekday: {}", cell.weekday)));
                }
                if !is_standard_slot(&cell.slot) {
                    return Err(AppError::Validation(format!("Invalid slot time: {}", cell.slot)));
                }
            }
            cells.into_iter().map(|c| (c.weekday, c.slot)).collect()
        }
        // Self-audit: check the entire current template.
        None => state
            .availability_repo
            .list_by_teacher(teacher_id)
            .await?
            .into_iter()
            .filter(|e| e.is_active)
            .map(|e| (e.weekday, e.slot))
            .collect(),
    };

    let (start, end) = range_window_utc(payload.from, payload.to);
    let reservations = state.reservation_repo.list_in_window(teacher_id, start, end).await?;
    let conflicts = find_conflicts(&candidates, &reservations, payload.from, payload.to);

    Ok(Json(ConflictReportResponse { conflicts }))
}
