use tutoring_backend::{
    api::router::create_router,
    config::{Config, QuotaReleasePolicy},
    infra::repositories::{
        sqlite_availability_repo::SqliteAvailabilityRepo,
        sqlite_purchase_repo::SqlitePurchaseRepo,
        sqlite_reservation_repo::SqliteReservationRepo,
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(QuotaReleasePolicy::Always).await
    }

    pub async fn with_policy(policy: QuotaReleasePolicy) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            quota_release_policy: policy,
        };

        let state = Arc::new(AppState {
            config,
            availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            reservation_repo: Arc::new(SqliteReservationRepo::new(pool.clone())),
            purchase_repo: Arc::new(SqlitePurchaseRepo::new(pool.clone())),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Seeds a paid entitlement directly, the way the purchase/checkout
    /// collaborator would, and returns its id.
    pub async fn seed_purchase(&self, student_id: i64, course_id: i64, quantity_total: i32) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO purchases (student_id, course_id, quantity_total, quantity_used, created_at)
             VALUES (?, ?, ?, 0, ?) RETURNING id"
        )
            .bind(student_id)
            .bind(course_id)
            .bind(quantity_total)
            .bind(chrono::Utc::now())
            .fetch_one(&self.pool)
            .await
            .expect("Failed to seed purchase")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

/// Request with the identity headers the gateway would attach.
pub fn authed_request(method: &str, uri: &str, user_id: i64, role: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user_id.to_string())
        .header("x-user-role", role)
        .header(header::CONTENT_TYPE, "application/json");

    match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn anon_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// First date with the given canonical weekday that is bookable, i.e. at
/// least tomorrow in business time.
pub fn upcoming_date(weekday: i32) -> chrono::NaiveDate {
    use tutoring_backend::domain::models::slot::{business_today, weekday_of};

    let mut date = business_today() + chrono::Duration::days(1);
    while weekday_of(date) != weekday {
        date += chrono::Duration::days(1);
    }
    date
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
