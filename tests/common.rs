#![allow(dead_code)]

use court_booking_backend::{
    api::router::create_router,
    config::Config,
    domain::models::reservation::{NewReservationParams, Reservation},
    domain::services::availability::OperatingCalendar,
    infra::factory::{seed_admin, sqlite_state},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    Router,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@club.test";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const PASSWORD: &str = "player-password";

pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

pub fn test_config(db_url: &str) -> Config {
    Config {
        database_url: db_url.to_string(),
        port: 0,
        jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
        jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
        auth_issuer: "test-issuer".to_string(),
        cookie_secure: true,
        facility_timezone: Tz::UTC,
        operating_hours: OperatingCalendar::default(),
        slot_minutes: 60,
        booking_lead_hours: 24,
        cancellation_lead_hours: 2,
        max_duration_hours: 2,
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut config = test_config(&db_url);
        adjust(&mut config);

        let state = sqlite_state(&config, pool.clone()).expect("Failed to build state");
        seed_admin(&state).await.expect("Failed to seed admin");
        let state = Arc::new(state);

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, auth: &AuthHeaders) -> Response {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .body(Body::empty())
                .unwrap()
        ).await
    }

    pub async fn write(&self, method: &str, uri: &str, auth: &AuthHeaders, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token);

        let request = match body {
            Some(payload) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string())),
            None => builder.body(Body::empty()),
        };
        self.send(request.unwrap()).await
    }

    pub async fn post(&self, uri: &str, auth: &AuthHeaders, body: Value) -> Response {
        self.write("POST", uri, auth, Some(body)).await
    }

    pub async fn register(&self, email: &str, name: &str) -> Value {
        let response = self.send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({
                    "email": email,
                    "password": PASSWORD,
                    "name": name,
                    "phone": "555-0100"
                }).to_string()))
                .unwrap()
        ).await;

        assert_eq!(response.status(), StatusCode::CREATED, "register failed for {}", email);
        parse_body(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let response = self.send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "email": email, "password": password }).to_string()))
                .unwrap()
        ).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let access_token = cookie_value(&response, "access_token").expect("No access_token cookie returned");
        let refresh_token = cookie_value(&response, "refresh_token").expect("No refresh_token cookie returned");

        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            refresh_token,
            csrf_token,
        }
    }

    pub async fn admin(&self) -> AuthHeaders {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Registers and logs in a fresh player.
    pub async fn player(&self, name: &str) -> (AuthHeaders, Value) {
        let email = format!("{}-{}@club.test", name.to_lowercase(), Uuid::new_v4());
        let profile = self.register(&email, name).await;
        (self.login(&email, PASSWORD).await, profile)
    }

    /// Creates a sport type and an active court; returns the court id.
    pub async fn create_court(&self, admin: &AuthHeaders, name: &str, price_per_hour: f64) -> String {
        let sport = self.post("/api/v1/admin/sport-types", admin, json!({
            "name": format!("Padel {}", Uuid::new_v4()),
            "description": "Doubles",
            "max_people": 4
        })).await;
        assert_eq!(sport.status(), StatusCode::CREATED);
        let sport = parse_body(sport).await;

        let court = self.post("/api/v1/admin/courts", admin, json!({
            "name": name,
            "sport_type_id": sport["id"],
            "price_per_hour": price_per_hour,
            "max_people": 4
        })).await;
        assert_eq!(court.status(), StatusCode::CREATED);
        parse_body(court).await["id"].as_str().unwrap().to_string()
    }

    pub async fn book(&self, auth: &AuthHeaders, court_id: &str, date: NaiveDate, start: &str, hours: u32) -> Response {
        self.post("/api/v1/reservations", auth, json!({
            "court_id": court_id,
            "date": date.to_string(),
            "start_time": start,
            "duration_hours": hours
        })).await
    }

    /// Stores a reservation directly, skipping the lead-time checks of the API.
    pub async fn insert_reservation(&self, user_id: &str, court_id: &str, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Reservation {
        self.state.reservation_repo.create_if_free(&Reservation::new(NewReservationParams {
            user_id: user_id.to_string(),
            court_id: court_id.to_string(),
            date,
            start_time: start,
            end_time: end,
        })).await.unwrap().expect("slot already taken")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub fn cookie_value(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find(|c| c.starts_with(&prefix))
        .map(|c| c[prefix.len()..].split(';').next().unwrap_or_default().to_string())
}

/// A date on `weekday` at least a week out, so booking lead time never interferes.
pub fn upcoming(weekday: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(7);
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
