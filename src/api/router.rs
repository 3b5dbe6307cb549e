use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    account, admin_catalog, admin_reservation, admin_user, auth, catalog, health, reservation,
};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Account
        .route("/api/v1/me", get(account::me))
        .route("/api/v1/me/dashboard", get(account::dashboard))

        // Catalog & availability
        .route("/api/v1/sport-types", get(catalog::list_sport_types))
        .route("/api/v1/courts", get(catalog::list_courts))
        .route("/api/v1/courts/{court_id}/availability", get(catalog::court_availability))

        // Reservations
        .route("/api/v1/reservations", post(reservation::create_reservation))
        .route("/api/v1/reservations/mine", get(reservation::list_my_reservations))
        .route("/api/v1/reservations/{reservation_id}/cancel", post(reservation::cancel_reservation))

        // Admin
        .route("/api/v1/admin/stats", get(admin_reservation::stats))
        .route("/api/v1/admin/reservations", get(admin_reservation::list_reservations))
        .route("/api/v1/admin/reservations/{reservation_id}/cancel", post(admin_reservation::cancel_reservation))
        .route("/api/v1/admin/reservations/{reservation_id}/complete", post(admin_reservation::complete_reservation))
        .route("/api/v1/admin/sport-types", post(admin_catalog::create_sport_type))
        .route("/api/v1/admin/courts", get(admin_catalog::list_courts).post(admin_catalog::create_court))
        .route("/api/v1/admin/courts/{court_id}", put(admin_catalog::update_court).delete(admin_catalog::delete_court))
        .route("/api/v1/admin/courts/{court_id}/toggle-active", post(admin_catalog::toggle_court_active))
        .route("/api/v1/admin/users", get(admin_user::list_users))
        .route("/api/v1/admin/users/{profile_id}", put(admin_user::update_user).delete(admin_user::delete_user))
        .route("/api/v1/admin/users/{profile_id}/toggle-role", post(admin_user::toggle_role))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
