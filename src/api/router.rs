use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, health, purchase, reservation, schedule};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Teacher weekly template
        .route("/api/v1/teacher/schedule", get(availability::get_schedule).put(availability::replace_schedule))
        .route("/api/v1/teacher/schedule/conflicts", post(availability::check_conflicts))

        // Public calendar projection
        .route("/api/v1/teachers/{teacher_id}/schedule", get(schedule::get_teacher_schedule))

        // Reservations
        .route("/api/v1/reservations", post(reservation::create_reservation).get(reservation::list_reservations))
        .route("/api/v1/reservations/{uuid}", get(reservation::get_reservation))
        .route("/api/v1/reservations/{uuid}/confirm", post(reservation::confirm_reservation))
        .route("/api/v1/reservations/{uuid}/reject", post(reservation::reject_reservation))
        .route("/api/v1/reservations/{uuid}/cancel", post(reservation::cancel_reservation))
        .route("/api/v1/reservations/{uuid}/complete", post(reservation::complete_reservation))

        // Purchase quota
        .route("/api/v1/purchases/{id}", get(purchase::get_purchase))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
