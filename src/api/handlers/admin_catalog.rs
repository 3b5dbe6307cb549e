use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::{CourtRequest, CreateSportTypeRequest};
use crate::domain::models::court::{Court, NewCourtParams, SportType};
use crate::domain::services::catalog::{validate_court, validate_sport_type};
use std::sync::Arc;
use tracing::info;

pub async fn create_sport_type(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateSportTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_sport_type(&payload.name, payload.max_people)?;

    let description = payload.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    let created = state.sport_type_repo
        .create(&SportType::new(payload.name.trim().to_string(), description, payload.max_people))
        .await?;

    info!("Sport type created: {} ({})", created.name, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_courts(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.court_repo.list(false).await?))
}

pub async fn create_court(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CourtRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_court_request(&state, &payload).await?;

    let created = state.court_repo.create(&Court::new(NewCourtParams {
        name: payload.name.trim().to_string(),
        sport_type_id: payload.sport_type_id,
        price_per_hour: payload.price_per_hour,
        max_people: payload.max_people,
        image_url: clean_url(payload.image_url),
    })).await?;

    info!("Court created: {} ({})", created.name, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_court(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(court_id): Path<String>,
    Json(payload): Json<CourtRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut court = state.court_repo.find_by_id(&court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    validate_court_request(&state, &payload).await?;

    court.name = payload.name.trim().to_string();
    court.sport_type_id = payload.sport_type_id;
    court.price_per_hour = payload.price_per_hour;
    court.max_people = payload.max_people;
    court.image_url = clean_url(payload.image_url);

    let updated = state.court_repo.update(&court).await?;
    info!("Court updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_court(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(court_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.court_repo.delete(&court_id).await? {
        return Err(AppError::NotFound("Court not found".into()));
    }
    info!("Court deleted: {}", court_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_court_active(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(court_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let court = state.court_repo.find_by_id(&court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    let updated = state.court_repo.set_active(&court.id, !court.active).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    info!("Court {} is now {}", updated.id, if updated.active { "active" } else { "inactive" });
    Ok(Json(updated))
}

async fn validate_court_request(state: &AppState, payload: &CourtRequest) -> Result<(), AppError> {
    validate_court(&payload.name, &payload.sport_type_id, payload.price_per_hour, payload.max_people)?;
    if state.sport_type_repo.find_by_id(&payload.sport_type_id).await?.is_none() {
        return Err(AppError::Validation("Unknown sport type".into()));
    }
    Ok(())
}

fn clean_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}
