use crate::domain::{models::court::SportType, ports::SportTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSportTypeRepo {
    pool: SqlitePool,
}

impl SqliteSportTypeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SportTypeRepository for SqliteSportTypeRepo {
    async fn create(&self, sport_type: &SportType) -> Result<SportType, AppError> {
        sqlx::query_as::<_, SportType>(
            "INSERT INTO sport_types (id, name, description, max_people, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&sport_type.id)
            .bind(&sport_type.name)
            .bind(&sport_type.description)
            .bind(sport_type.max_people)
            .bind(sport_type.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<SportType>, AppError> {
        sqlx::query_as::<_, SportType>("SELECT * FROM sport_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<SportType>, AppError> {
        sqlx::query_as::<_, SportType>("SELECT * FROM sport_types ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
