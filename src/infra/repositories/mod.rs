pub mod sqlite_auth_repo;
pub mod sqlite_court_repo;
pub mod sqlite_profile_repo;
pub mod sqlite_reservation_repo;
pub mod sqlite_sport_type_repo;
pub mod sqlite_user_repo;

pub mod postgres_auth_repo;
pub mod postgres_court_repo;
pub mod postgres_profile_repo;
pub mod postgres_reservation_repo;
pub mod postgres_sport_type_repo;
pub mod postgres_user_repo;
