use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Cancelled,
    CancelledAdmin,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "ACTIVE",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::CancelledAdmin => "CANCELLED_ADMIN",
            ReservationStatus::Completed => "COMPLETED",
        }
    }

    /// ACTIVE is the only status a reservation can leave.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Active)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReservationStatus::Cancelled | ReservationStatus::CancelledAdmin)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "ACTIVE" => Ok(ReservationStatus::Active),
            "CANCELLED" => Ok(ReservationStatus::Cancelled),
            "CANCELLED_ADMIN" => Ok(ReservationStatus::CancelledAdmin),
            "COMPLETED" => Ok(ReservationStatus::Completed),
            other => Err(format!("unknown reservation status: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub court_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub penalty_applied: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewReservationParams {
    pub user_id: String,
    pub court_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Reservation {
    pub fn new(params: NewReservationParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            court_id: params.court_id,
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            status: ReservationStatus::Active,
            penalty_applied: false,
            created_at: Utc::now(),
        }
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_minutes() as f64 / 60.0
    }
}

/// Reservation joined with the court, sport type and booking user,
/// as listed on the admin and "my reservations" screens.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReservationDetails {
    pub id: String,
    pub user_id: String,
    pub court_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub penalty_applied: bool,
    pub created_at: DateTime<Utc>,
    pub court_name: String,
    pub price_per_hour: f64,
    pub sport_type_id: String,
    pub sport_type_name: String,
    pub user_name: Option<String>,
}

impl ReservationDetails {
    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_minutes() as f64 / 60.0
    }
}

/// Status and penalty flag to persist for a transition out of ACTIVE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ReservationStatus,
    pub penalty_applied: bool,
}
