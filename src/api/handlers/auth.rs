use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{LoginRequest, RegisterRequest},
    responses::{AuthResponse, ProfileResponse},
};
use crate::domain::models::auth::TokenPair;
use crate::domain::models::user::{User, UserProfile};
use crate::domain::services::auth_service::{hash_password, verify_password};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;

const MIN_PASSWORD_LEN: usize = 8;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&payload.email);
    let name = payload.name.trim();

    if !email.contains('@') || name.is_empty() {
        return Err(AppError::Validation("A valid email and a name are required".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!("Password must be at least {} characters", MIN_PASSWORD_LEN)));
    }
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let user = state.user_repo.create(&User::new(email, hash_password(&payload.password)?)).await?;
    let phone = payload.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    let profile = state.profile_repo.create(&UserProfile::new(user.id.clone(), name.to_string(), phone)).await?;

    info!("User registered: {}", user.id);

    Ok((StatusCode::CREATED, Json(ProfileResponse::new(profile, user.email))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&normalize_email(&payload.email)).await?
        .ok_or(AppError::Unauthorized)?;

    verify_password(&payload.password, &user.password_hash)?;

    let profile = state.profile_repo.find_by_user_id(&user.id).await?
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.auth_service.login(&user.id).await?;
    set_cookies(&cookies, &tokens, state.config.cookie_secure);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: tokens.csrf_token,
        user: ProfileResponse::new(profile, user.email),
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get("refresh_token").ok_or(AppError::Unauthorized)?;

    let (user_id, tokens) = state.auth_service.refresh(refresh_cookie.value()).await?;

    let user = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::Unauthorized)?;
    let profile = state.profile_repo.find_by_user_id(&user_id).await?
        .ok_or(AppError::Unauthorized)?;

    set_cookies(&cookies, &tokens, state.config.cookie_secure);

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: tokens.csrf_token,
        user: ProfileResponse::new(profile, user.email),
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get("refresh_token") {
        state.auth_service.logout(cookie.value()).await?;
    }

    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());

    info!("User logged out");

    Ok(StatusCode::OK)
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn set_cookies(cookies: &Cookies, tokens: &TokenPair, secure: bool) {
    cookies.add(session_cookie("access_token", &tokens.access_token, Duration::minutes(15), secure));
    cookies.add(session_cookie("refresh_token", &tokens.refresh_token, Duration::days(7), secure));
}

fn session_cookie(name: &'static str, value: &str, max_age: Duration, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(max_age);
    cookie
}
