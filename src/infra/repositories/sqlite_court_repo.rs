use crate::domain::{models::court::Court, ports::CourtRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCourtRepo {
    pool: SqlitePool,
}

impl SqliteCourtRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourtRepository for SqliteCourtRepo {
    async fn create(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "INSERT INTO courts (id, name, sport_type_id, price_per_hour, max_people, image_url, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&court.id).bind(&court.name).bind(&court.sport_type_id).bind(court.price_per_hour)
            .bind(court.max_people).bind(&court.image_url).bind(court.active).bind(court.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, only_active: bool) -> Result<Vec<Court>, AppError> {
        let sql = if only_active {
            "SELECT * FROM courts WHERE active = 1 ORDER BY name ASC"
        } else {
            "SELECT * FROM courts ORDER BY name ASC"
        };
        sqlx::query_as::<_, Court>(sql)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "UPDATE courts SET name = ?, sport_type_id = ?, price_per_hour = ?, max_people = ?, image_url = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(&court.name).bind(&court.sport_type_id).bind(court.price_per_hour)
            .bind(court.max_people).bind(&court.image_url).bind(&court.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Court not found".into()))
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("UPDATE courts SET active = ? WHERE id = ? RETURNING *")
            .bind(active)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM courts WHERE id = ?")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
