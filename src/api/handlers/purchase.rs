use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::dtos::responses::PurchaseResponse;
use crate::api::extractors::auth::AuthStudent;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_purchase(
    State(state): State<Arc<AppState>>,
    AuthStudent(student_id): AuthStudent,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let purchase = state.purchase_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Purchase not found".to_string()))?;
    if purchase.student_id != student_id {
        return Err(AppError::Forbidden("Purchase belongs to another student".to_string()));
    }
    Ok(Json(PurchaseResponse::from(&purchase)))
}
