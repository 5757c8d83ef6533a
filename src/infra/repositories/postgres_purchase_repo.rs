use crate::domain::models::purchase::PurchaseRecord;
use crate::domain::ports::PurchaseRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPurchaseRepo {
    pool: PgPool,
}

impl PostgresPurchaseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn require(&self, id: i64) -> Result<PurchaseRecord, AppError> {
        sqlx::query_as::<_, PurchaseRecord>("SELECT * FROM purchases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Purchase not found".to_string()))
    }
}

#[async_trait]
impl PurchaseRepository for PostgresPurchaseRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<PurchaseRecord>, AppError> {
        sqlx::query_as::<_, PurchaseRecord>("SELECT * FROM purchases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn consume(&self, purchase_id: i64, quantity: i32) -> Result<PurchaseRecord, AppError> {
        let updated = sqlx::query_as::<_, PurchaseRecord>(
            "UPDATE purchases SET quantity_used = quantity_used + $1
             WHERE id = $2 AND quantity_used + $1 <= quantity_total
             RETURNING *"
        )
            .bind(quantity).bind(purchase_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        match updated {
            Some(record) => Ok(record),
            None => {
                self.require(purchase_id).await?;
                Err(AppError::Business("Purchase quota exceeded".to_string()))
            }
        }
    }

    async fn release(&self, purchase_id: i64, quantity: i32) -> Result<PurchaseRecord, AppError> {
        let updated = sqlx::query_as::<_, PurchaseRecord>(
            "UPDATE purchases SET quantity_used = quantity_used - $1
             WHERE id = $2 AND quantity_used >= $1
             RETURNING *"
        )
            .bind(quantity).bind(purchase_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        match updated {
            Some(record) => Ok(record),
            None => {
                self.require(purchase_id).await?;
                Err(AppError::Business("Purchase has no consumed quota to release".to_string()))
            }
        }
    }
}
