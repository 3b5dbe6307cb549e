use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{requests::CreateReservationRequest, responses::MyReservationResponse};
use crate::api::handlers::catalog::{find_active_court, load_day};
use crate::domain::models::reservation::{NewReservationParams, Reservation};
use crate::domain::services::{availability::parse_slot, policy::facility_instant};
use std::sync::Arc;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::info;

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let start = parse_slot(&payload.start_time)
        .ok_or(AppError::Validation("start_time must be HH:MM".into()))?;
    state.policy.check_duration(payload.duration_hours)?;

    let court = find_active_court(&state, &payload.court_id).await?;

    let start_at = start_instant(&state, payload.date, start)?;
    state.policy.check_booking_lead(start_at, Utc::now())?;

    let day = load_day(&state, &court, payload.date).await?;
    if !day.is_operating() {
        return Err(AppError::Validation("The facility is closed on that day".into()));
    }
    if !day.slots.contains(&start) {
        return Err(AppError::Validation("Start time is not a bookable slot".into()));
    }

    let duration_slots = payload.duration_hours * state.config.slots_per_hour();
    if !day.is_selectable(start, duration_slots) {
        return Err(AppError::Validation("The selected time range is not available".into()));
    }
    let end = day.end_of(start, duration_slots)
        .ok_or(AppError::Validation("Reservation cannot run past midnight".into()))?;

    let reservation = Reservation::new(NewReservationParams {
        user_id: actor.user_id.clone(),
        court_id: court.id.clone(),
        date: payload.date,
        start_time: start,
        end_time: end,
    });

    let created = state.reservation_repo.create_if_free(&reservation).await?
        .ok_or(AppError::Conflict("The selected time range was just booked".into()))?;

    info!("Reservation {} created: court {} on {} {}-{}", created.id, court.id, created.date, created.start_time, created.end_time);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_my_reservations(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let tz = state.config.facility_timezone;

    let reservations = state.reservation_repo.list_details_by_user(&actor.user_id).await?
        .into_iter()
        .map(|reservation| {
            let start_at = facility_instant(tz, reservation.date, reservation.start_time);
            MyReservationResponse {
                cancellable: start_at.is_some_and(|s| state.policy.cancellable_by_owner(reservation.status, s, now)),
                cancellable_until: start_at.map(|s| state.policy.cancellation_deadline(s)),
                reservation,
            }
        })
        .collect::<Vec<_>>();

    Ok(Json(reservations))
}

pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservation_repo.find_by_id(&reservation_id).await?
        .ok_or(AppError::NotFound("Reservation not found".into()))?;

    let start_at = start_instant(&state, reservation.date, reservation.start_time)?;
    let change = state.policy.owner_cancel(&actor, &reservation, start_at, Utc::now())?;

    let updated = state.reservation_repo.update_status(&reservation.id, change).await?
        .ok_or(AppError::Conflict("Reservation is no longer active".into()))?;

    info!("Reservation {} cancelled by owner {} (penalty applied)", updated.id, actor.user_id);

    Ok(Json(updated))
}

pub(crate) fn start_instant(state: &AppState, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, AppError> {
    facility_instant(state.config.facility_timezone, date, time)
        .ok_or(AppError::Validation("That time does not exist in the facility time zone".into()))
}
