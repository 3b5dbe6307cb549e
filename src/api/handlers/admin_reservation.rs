use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::responses::AdminStatsResponse;
use crate::domain::models::reservation::{Reservation, ReservationDetails, StatusChange};
use crate::domain::models::user::Actor;
use crate::domain::services::policy::{BookingPolicy, PolicyViolation};
use crate::domain::services::stats::{admin_stats, ReservationFilter};
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

const RECENT_LIMIT: usize = 10;

pub async fn stats(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let reservations = state.reservation_repo.list_details().await?;
    let courts = state.court_repo.list(false).await?;
    let total_users = state.profile_repo.count().await?;
    let today = Utc::now().with_timezone(&state.config.facility_timezone).date_naive();

    let stats = admin_stats(&reservations, &courts, total_users.max(0) as usize, today);

    let mut recent_reservations: Vec<ReservationDetails> = reservations;
    recent_reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_reservations.truncate(RECENT_LIMIT);

    let mut recent_users = state.profile_repo.list_accounts().await?;
    recent_users.truncate(RECENT_LIMIT);

    Ok(Json(AdminStatsResponse { stats, recent_reservations, recent_users }))
}

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<ReservationFilter>,
) -> Result<impl IntoResponse, AppError> {
    let reservations: Vec<ReservationDetails> = state.reservation_repo.list_details().await?
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();

    Ok(Json(reservations))
}

pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = transition(&state, &admin, &reservation_id, BookingPolicy::admin_cancel).await?;
    info!("Reservation {} cancelled by admin {}", updated.id, admin.user_id);
    Ok(Json(updated))
}

pub async fn complete_reservation(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = transition(&state, &admin, &reservation_id, BookingPolicy::complete).await?;
    info!("Reservation {} completed by admin {}", updated.id, admin.user_id);
    Ok(Json(updated))
}

async fn transition<F>(
    state: &AppState,
    admin: &Actor,
    reservation_id: &str,
    decide: F,
) -> Result<Reservation, AppError>
where
    F: Fn(&BookingPolicy, &Actor, &Reservation) -> Result<StatusChange, PolicyViolation>,
{
    let reservation = state.reservation_repo.find_by_id(reservation_id).await?
        .ok_or(AppError::NotFound("Reservation not found".into()))?;

    let change = decide(&state.policy, admin, &reservation)?;

    state.reservation_repo.update_status(&reservation.id, change).await?
        .ok_or(AppError::Conflict("Reservation is no longer active".into()))
}
