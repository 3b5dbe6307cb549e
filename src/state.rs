use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, CourtRepository, ProfileRepository, ReservationRepository,
    SportTypeRepository, UserRepository,
};
use crate::domain::services::{auth_service::AuthService, policy::BookingPolicy};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub policy: BookingPolicy,
    pub user_repo: Arc<dyn UserRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub sport_type_repo: Arc<dyn SportTypeRepository>,
    pub court_repo: Arc<dyn CourtRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
}
