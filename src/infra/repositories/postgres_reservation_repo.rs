use crate::domain::models::reservation::{Reservation, StatusUpdate};
use crate::domain::ports::ReservationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresReservationRepo {
    pool: PgPool,
}

impl PostgresReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepo {
    async fn create_with_quota(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query(
            "UPDATE purchases SET quantity_used = quantity_used + 1 WHERE id = $1 AND quantity_used + 1 <= quantity_total"
        )
            .bind(reservation.purchase_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::Business("Purchase quota exceeded".to_string()));
        }

        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (uuid, course_id, teacher_id, student_id, purchase_id, reserve_time, teacher_status, student_status, response_deadline, rejection_reason, deleted_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *"
        )
            .bind(&reservation.uuid).bind(reservation.course_id).bind(reservation.teacher_id)
            .bind(reservation.student_id).bind(reservation.purchase_id).bind(reservation.reserve_time)
            .bind(&reservation.teacher_status).bind(&reservation.student_status)
            .bind(reservation.response_deadline).bind(&reservation.rejection_reason)
            .bind(reservation.deleted_at).bind(reservation.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE uuid = $1 AND deleted_at IS NULL"
        )
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE (teacher_id = $1 OR student_id = $1) AND deleted_at IS NULL ORDER BY reserve_time ASC"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_in_window(
        &self,
        teacher_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE teacher_id = $1 AND reserve_time >= $2 AND reserve_time <= $3 AND deleted_at IS NULL"
        )
            .bind(teacher_id).bind(start).bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, uuid: &str, update: StatusUpdate) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Optimistic guard: the write only lands while the stored pair is
        // still the one the caller read its decision from.
        let updated = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET teacher_status = $1, student_status = $2, rejection_reason = COALESCE($3, rejection_reason)
             WHERE uuid = $4 AND teacher_status = $5 AND student_status = $6 AND deleted_at IS NULL
             RETURNING *"
        )
            .bind(update.teacher_status.as_str()).bind(update.student_status.as_str())
            .bind(update.rejection_reason).bind(uuid)
            .bind(update.expected.0.as_str()).bind(update.expected.1.as_str())
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let Some(updated) = updated else {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM reservations WHERE uuid = $1 AND deleted_at IS NULL"
            )
                .bind(uuid)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            return Err(if exists > 0 {
                AppError::Conflict("Reservation status changed concurrently".to_string())
            } else {
                AppError::NotFound("Reservation not found".to_string())
            });
        };

        if update.release_quota {
            let result = sqlx::query(
                "UPDATE purchases SET quantity_used = quantity_used - 1 WHERE id = $1 AND quantity_used >= 1"
            )
                .bind(updated.purchase_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
            if result.rows_affected() == 0 {
                return Err(AppError::Business("Purchase has no consumed quota to release".to_string()));
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn list_pending_expired(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations
             WHERE teacher_status = 'PENDING' AND student_status = 'PENDING'
               AND response_deadline IS NOT NULL AND response_deadline < $1
               AND deleted_at IS NULL"
        )
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
