mod common;

use axum::http::StatusCode;
use common::{authed_request, parse_body, upcoming_date, TestApp};
use serde_json::json;
use tower::ServiceExt;
use tutoring_backend::domain::models::slot::weekday_of;

const TEACHER: i64 = 100;
const STUDENT: i64 = 200;
const COURSE: i64 = 7;

/// Opens Monday 09:00/10:00 and books the next Monday's 09:00 slot.
/// Returns (booked date, reservation uuid).
async fn setup_booked_monday(app: &TestApp) -> (chrono::NaiveDate, String) {
    let res = app.router.clone().oneshot(authed_request(
        "PUT", "/api/v1/teacher/schedule", TEACHER, "teacher",
        Some(json!({ "1": ["09:00", "10:00"] })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let purchase_id = app.seed_purchase(STUDENT, COURSE, 5).await;
    let date = upcoming_date(1);
    assert_eq!(weekday_of(date), 1);

    let res = app.router.clone().oneshot(authed_request(
        "POST", "/api/v1/reservations", STUDENT, "student",
        Some(json!({
            "course_id": COURSE,
            "teacher_id": TEACHER,
            "purchase_id": purchase_id,
            "date": date.format("%Y-%m-%d").to_string(),
            "time": "09:00"
        })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    (date, body["uuid"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn candidate_slot_collides_with_booking() {
    let app = TestApp::new().await;
    let (date, uuid) = setup_booked_monday(&app).await;

    let res = app.router.clone().oneshot(authed_request(
        "POST", "/api/v1/teacher/schedule/conflicts", TEACHER, "teacher",
        Some(json!({
            "from": date.format("%Y-%m-%d").to_string(),
            "to": (date + chrono::Duration::days(6)).format("%Y-%m-%d").to_string(),
            "slots": [{ "weekday": 1, "slot": "09:00" }]
        })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    let conflicts = body["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["weekday"], 1);
    assert_eq!(conflicts[0]["slot"], "09:00");
    assert_eq!(conflicts[0]["reservation_uuid"], uuid.as_str());
}

#[tokio::test]
async fn clean_candidates_report_no_conflicts() {
    let app = TestApp::new().await;
    let (date, _) = setup_booked_monday(&app).await;

    let res = app.router.clone().oneshot(authed_request(
        "POST", "/api/v1/teacher/schedule/conflicts", TEACHER, "teacher",
        Some(json!({
            "from": date.format("%Y-%m-%d").to_string(),
            "to": (date + chrono::Duration::days(6)).format("%Y-%m-%d").to_string(),
            "slots": [{ "weekday": 1, "slot": "10:00" }, { "weekday": 2, "slot": "09:00" }]
        })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert!(body["conflicts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn omitted_slots_audit_the_whole_template() {
    let app = TestApp::new().await;
    let (date, uuid) = setup_booked_monday(&app).await;

    let res = app.router.clone().oneshot(authed_request(
        "POST", "/api/v1/teacher/schedule/conflicts", TEACHER, "teacher",
        Some(json!({
            "from": date.format("%Y-%m-%d").to_string(),
            "to": date.format("%Y-%m-%d").to_string()
        })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    let conflicts = body["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["reservation_uuid"], uuid.as_str());
}

#[tokio::test]
async fn range_outside_the_booking_is_clean() {
    let app = TestApp::new().await;
    let (date, _) = setup_booked_monday(&app).await;

    // The week after the booked Monday.
    let from = date + chrono::Duration::days(1);
    let to = date + chrono::Duration::days(6);
    let res = app.router.clone().oneshot(authed_request(
        "POST", "/api/v1/teacher/schedule/conflicts", TEACHER, "teacher",
        Some(json!({
            "from": from.format("%Y-%m-%d").to_string(),
            "to": to.format("%Y-%m-%d").to_string()
        })),
    )).await.unwrap();
    let body = parse_body(res).await;
    assert!(body["conflicts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn cancelled_reservation_is_not_a_conflict() {
    let app = TestApp::new().await;
    let (date, uuid) = setup_booked_monday(&app).await;

    let res = app.router.clone().oneshot(authed_request(
        "POST", &format!("/api/v1/reservations/{}/cancel", uuid), STUDENT, "student", None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(authed_request(
        "POST", "/api/v1/teacher/schedule/conflicts", TEACHER, "teacher",
        Some(json!({
            "from": date.format("%Y-%m-%d").to_string(),
            "to": date.format("%Y-%m-%d").to_string(),
            "slots": [{ "weekday": 1, "slot": "09:00" }]
        })),
    )).await.unwrap();
    let body = parse_body(res).await;
    assert!(body["conflicts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(authed_request(
        "POST", "/api/v1/teacher/schedule/conflicts", TEACHER, "teacher",
        Some(json!({
            "from": "2026-09-10",
            "to": "2026-09-01"
        })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_candidate_cells_are_rejected() {
    let app = TestApp::new().await;

    for slots in [
        json!([{ "weekday": 0, "slot": "09:00" }]),
        json!([{ "weekday": 8, "slot": "09:00" }]),
        json!([{ "weekday": 1, "slot": "12:00" }]),
    ] {
        let res = app.router.clone().oneshot(authed_request(
            "POST", "/api/v1/teacher/schedule/conflicts", TEACHER, "teacher",
            Some(json!({ "from": "2026-09-01", "to": "2026-09-07", "slots": slots })),
        )).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
