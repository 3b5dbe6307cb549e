use crate::domain::{models::court::Court, ports::CourtRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCourtRepo {
    pool: PgPool,
}

impl PostgresCourtRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourtRepository for PostgresCourtRepo {
    async fn create(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "INSERT INTO courts (id, name, sport_type_id, price_per_hour, max_people, image_url, active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&court.id).bind(&court.name).bind(&court.sport_type_id).bind(court.price_per_hour)
            .bind(court.max_people).bind(&court.image_url).bind(court.active).bind(court.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, only_active: bool) -> Result<Vec<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE active OR NOT $1 ORDER BY name ASC")
            .bind(only_active)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "UPDATE courts SET name = $1, sport_type_id = $2, price_per_hour = $3, max_people = $4, image_url = $5
             WHERE id = $6
             RETURNING *"
        )
            .bind(&court.name).bind(&court.sport_type_id).bind(court.price_per_hour)
            .bind(court.max_people).bind(&court.image_url).bind(&court.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Court not found".into()))
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("UPDATE courts SET active = $1 WHERE id = $2 RETURNING *")
            .bind(active)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM courts WHERE id = $1")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
