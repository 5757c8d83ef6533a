use crate::domain::models::availability::{AvailabilityEntry, TemplateDiff};
use crate::domain::ports::AvailabilityRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresAvailabilityRepo {
    pool: PgPool,
}

impl PostgresAvailabilityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepo {
    async fn list_by_teacher(&self, teacher_id: i64) -> Result<Vec<AvailabilityEntry>, AppError> {
        sqlx::query_as::<_, AvailabilityEntry>(
            "SELECT * FROM weekly_availability WHERE teacher_id = $1 ORDER BY weekday, slot"
        )
            .bind(teacher_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn apply_diff(&self, teacher_id: i64, diff: &TemplateDiff) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Removal deactivates the row; a later re-submit reactivates it.
        for (weekday, slot) in &diff.to_delete {
            sqlx::query("UPDATE weekly_availability SET is_active = FALSE WHERE teacher_id = $1 AND weekday = $2 AND slot = $3")
                .bind(teacher_id).bind(weekday).bind(slot)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        for (weekday, slot) in &diff.to_insert {
            sqlx::query(
                "INSERT INTO weekly_availability (teacher_id, weekday, slot, is_active, created_at) VALUES ($1, $2, $3, TRUE, $4)"
            )
                .bind(teacher_id).bind(weekday).bind(slot).bind(Utc::now())
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        for (weekday, slot) in &diff.to_reactivate {
            sqlx::query("UPDATE weekly_availability SET is_active = TRUE WHERE teacher_id = $1 AND weekday = $2 AND slot = $3")
                .bind(teacher_id).bind(weekday).bind(slot)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
