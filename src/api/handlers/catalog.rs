use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::AvailabilityQuery,
    responses::{AvailabilityResponse, SlotResponse},
};
use crate::domain::models::court::Court;
use crate::domain::services::{
    availability::{compute_day_availability, format_slot, DayAvailability},
    catalog::group_by_sport,
    policy::facility_instant,
};
use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::debug;

pub async fn list_sport_types(
    State(state): State<Arc<AppState>>,
    AuthUser(_actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.sport_type_repo.list().await?))
}

pub async fn list_courts(
    State(state): State<Arc<AppState>>,
    AuthUser(_actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let sport_types = state.sport_type_repo.list().await?;
    let courts = state.court_repo.list(true).await?;
    Ok(Json(group_by_sport(&sport_types, courts)))
}

pub async fn court_availability(
    State(state): State<Arc<AppState>>,
    AuthUser(_actor): AuthUser,
    Path(court_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let duration = query.duration.unwrap_or(1);
    state.policy.check_duration(duration)?;

    let court = find_active_court(&state, &court_id).await?;
    let day = load_day(&state, &court, query.date).await?;
    let duration_slots = duration * state.config.slots_per_hour();
    let now = Utc::now();
    let tz = state.config.facility_timezone;

    debug!("Availability for court {} on {}: {}/{} free", court.id, query.date, day.available.len(), day.slots.len());

    let slots = day.slots.iter()
        .map(|&slot| SlotResponse {
            time: format_slot(slot),
            available: day.is_available(slot),
            selectable: day.is_selectable(slot, duration_slots)
                && facility_instant(tz, query.date, slot)
                    .is_some_and(|start_at| state.policy.check_booking_lead(start_at, now).is_ok()),
        })
        .collect();

    Ok(Json(AvailabilityResponse {
        date: query.date,
        operating: day.is_operating(),
        open: day.window.map(|w| format_slot(w.open)),
        close: day.window.map(|w| format_slot(w.close)),
        duration,
        slots,
    }))
}

/// Courts that are inactive or missing are indistinguishable to callers.
pub(crate) async fn find_active_court(state: &AppState, court_id: &str) -> Result<Court, AppError> {
    state.court_repo.find_by_id(court_id).await?
        .filter(|court| court.active)
        .ok_or(AppError::NotFound("Court not found".into()))
}

pub(crate) async fn load_day(state: &AppState, court: &Court, date: NaiveDate) -> Result<DayAvailability, AppError> {
    let booked: Vec<(NaiveTime, NaiveTime)> = state.reservation_repo
        .list_active_for_court_on(&court.id, date).await?
        .into_iter()
        .map(|r| (r.start_time, r.end_time))
        .collect();

    Ok(compute_day_availability(
        &state.config.operating_hours,
        date,
        state.config.slot_granularity(),
        &booked,
    ))
}
