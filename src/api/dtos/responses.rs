use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use crate::domain::models::reservation::ReservationDetails;
use crate::domain::models::user::{Role, UserAccount, UserProfile};
use crate::domain::services::stats::{AdminStats, UserActivity, UserDashboard};

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl ProfileResponse {
    pub fn new(profile: UserProfile, email: String) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            email,
            name: profile.name,
            phone: profile.phone,
            role: profile.role,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: ProfileResponse,
}

#[derive(Serialize)]
pub struct SlotResponse {
    pub time: String,
    pub available: bool,
    pub selectable: bool,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    pub operating: bool,
    pub open: Option<String>,
    pub close: Option<String>,
    pub duration: u32,
    pub slots: Vec<SlotResponse>,
}

#[derive(Serialize)]
pub struct MyReservationResponse {
    #[serde(flatten)]
    pub reservation: ReservationDetails,
    pub cancellable: bool,
    pub cancellable_until: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub profile: ProfileResponse,
    #[serde(flatten)]
    pub summary: UserDashboard,
}

#[derive(Serialize)]
pub struct AdminStatsResponse {
    #[serde(flatten)]
    pub stats: AdminStats,
    pub recent_reservations: Vec<ReservationDetails>,
    pub recent_users: Vec<UserAccount>,
}

#[derive(Serialize)]
pub struct UserAccountResponse {
    #[serde(flatten)]
    pub account: UserAccount,
    #[serde(flatten)]
    pub activity: UserActivity,
}
