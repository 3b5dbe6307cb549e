use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::responses::{DashboardResponse, ProfileResponse};
use crate::domain::models::user::Actor;
use crate::domain::services::stats::user_dashboard;
use std::sync::Arc;

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(load_profile(&state, &actor).await?))
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let profile = load_profile(&state, &actor).await?;
    let reservations = state.reservation_repo.list_details_by_user(&actor.user_id).await?;
    let today = Utc::now().with_timezone(&state.config.facility_timezone).date_naive();

    Ok(Json(DashboardResponse {
        profile,
        summary: user_dashboard(&reservations, today),
    }))
}

async fn load_profile(state: &AppState, actor: &Actor) -> Result<ProfileResponse, AppError> {
    let profile = state.profile_repo.find_by_id(&actor.profile_id).await?
        .ok_or(AppError::NotFound("Profile not found".into()))?;
    let user = state.user_repo.find_by_id(&actor.user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    Ok(ProfileResponse::new(profile, user.email))
}
