use crate::domain::models::{
    auth::RefreshTokenRecord,
    court::{Court, SportType},
    reservation::{Reservation, ReservationDetails, StatusChange},
    user::{User, UserAccount, UserProfile},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

#[async_trait]
pub trait SportTypeRepository: Send + Sync {
    async fn create(&self, sport_type: &SportType) -> Result<SportType, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<SportType>, AppError>;
    async fn list(&self) -> Result<Vec<SportType>, AppError>;
}

#[async_trait]
pub trait CourtRepository: Send + Sync {
    async fn create(&self, court: &Court) -> Result<Court, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError>;
    async fn list(&self, only_active: bool) -> Result<Vec<Court>, AppError>;
    async fn update(&self, court: &Court) -> Result<Court, AppError>;
    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Court>, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts the reservation unless an ACTIVE reservation on the same court
    /// and date overlaps it. Returns `None` when the slot was taken.
    async fn create_if_free(&self, reservation: &Reservation) -> Result<Option<Reservation>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    async fn list_active_for_court_on(&self, court_id: &str, date: NaiveDate) -> Result<Vec<Reservation>, AppError>;
    async fn list_details_by_user(&self, user_id: &str) -> Result<Vec<ReservationDetails>, AppError>;
    async fn list_details(&self) -> Result<Vec<ReservationDetails>, AppError>;
    /// Applies the change only while the reservation is still ACTIVE.
    async fn update_status(&self, id: &str, change: StatusChange) -> Result<Option<Reservation>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, profile: &UserProfile) -> Result<UserProfile, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, AppError>;
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserProfile>, AppError>;
    async fn list_accounts(&self) -> Result<Vec<UserAccount>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn update(&self, profile: &UserProfile) -> Result<UserProfile, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
    async fn revoke_user_tokens(&self, user_id: &str) -> Result<u64, AppError>;
}
