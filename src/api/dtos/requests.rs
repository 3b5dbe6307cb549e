use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub duration: Option<u32>,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub court_id: String,
    pub date: NaiveDate,
    /// "HH:MM"
    pub start_time: String,
    pub duration_hours: u32,
}

#[derive(Deserialize)]
pub struct CreateSportTypeRequest {
    pub name: String,
    pub description: Option<String>,
    pub max_people: i32,
}

#[derive(Deserialize)]
pub struct CourtRequest {
    pub name: String,
    pub sport_type_id: String,
    pub price_per_hour: f64,
    pub max_people: i32,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub phone: Option<String>,
}
