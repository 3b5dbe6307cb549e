use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::{requests::UpdateUserRequest, responses::UserAccountResponse};
use crate::domain::models::user::{Actor, UserProfile};
use crate::domain::services::stats::{user_activity, UserFilter};
use std::sync::Arc;
use tracing::info;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<UserFilter>,
) -> Result<impl IntoResponse, AppError> {
    let reservations = state.reservation_repo.list_details().await?;

    let users: Vec<UserAccountResponse> = state.profile_repo.list_accounts().await?
        .into_iter()
        .filter(|account| filter.matches(account))
        .map(|account| UserAccountResponse {
            activity: user_activity(&account.user_id, &reservations),
            account,
        })
        .collect();

    Ok(Json(users))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(profile_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }

    let mut profile = find_profile(&state, &profile_id).await?;
    profile.name = name.to_string();
    profile.phone = payload.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());

    let updated = state.profile_repo.update(&profile).await?;
    info!("Profile {} updated", updated.id);
    Ok(Json(updated))
}

pub async fn toggle_role(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(profile_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut profile = find_profile(&state, &profile_id).await?;
    ensure_not_self(&admin, &profile, "You cannot change your own role")?;

    profile.role = profile.role.toggled();
    let updated = state.profile_repo.update(&profile).await?;

    info!("Profile {} role changed to {} by {}", updated.id, updated.role, admin.user_id);
    Ok(Json(updated))
}

/// Removes the profile and revokes the user's sessions. The login identity
/// and reservation history stay in place.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(profile_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = find_profile(&state, &profile_id).await?;
    ensure_not_self(&admin, &profile, "You cannot delete your own account")?;

    if !state.profile_repo.delete(&profile.id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    let revoked = state.auth_repo.revoke_user_tokens(&profile.user_id).await?;

    info!("Profile {} deleted by {}; {} refresh tokens revoked", profile.id, admin.user_id, revoked);
    Ok(StatusCode::NO_CONTENT)
}

async fn find_profile(state: &AppState, profile_id: &str) -> Result<UserProfile, AppError> {
    state.profile_repo.find_by_id(profile_id).await?
        .ok_or(AppError::NotFound("User not found".into()))
}

fn ensure_not_self(admin: &Actor, profile: &UserProfile, message: &str) -> Result<(), AppError> {
    if profile.user_id == admin.user_id {
        return Err(AppError::Forbidden(message.to_string()));
    }
    Ok(())
}
