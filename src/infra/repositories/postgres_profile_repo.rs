use crate::domain::{models::user::{UserAccount, UserProfile}, ports::ProfileRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

pub struct PostgresProfileRepo {
    pool: PgPool,
}

impl PostgresProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepo {
    async fn create(&self, profile: &UserProfile) -> Result<UserProfile, AppError> {
        sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (id, user_id, name, phone, role, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
            .bind(&profile.id)
            .bind(&profile.user_id)
            .bind(&profile.name)
            .bind(&profile.phone)
            .bind(profile.role.as_str())
            .bind(profile.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, AppError> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_accounts(&self) -> Result<Vec<UserAccount>, AppError> {
        sqlx::query_as::<_, UserAccount>(
            "SELECT p.id, p.user_id, p.name, p.phone, p.role, u.email, p.created_at
             FROM user_profiles p
             LEFT JOIN users u ON u.id = p.user_id
             ORDER BY p.created_at DESC"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, profile: &UserProfile) -> Result<UserProfile, AppError> {
        sqlx::query_as::<_, UserProfile>(
            "UPDATE user_profiles SET name = $1, phone = $2, role = $3 WHERE id = $4 RETURNING *"
        )
            .bind(&profile.name)
            .bind(&profile.phone)
            .bind(profile.role.as_str())
            .bind(&profile.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("User not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres profile deletion failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
