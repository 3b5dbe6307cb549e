use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{de::{DeserializeOwned, IntoDeserializer}, Deserialize, Deserializer, Serialize};
use crate::domain::models::court::Court;
use crate::domain::models::reservation::{ReservationDetails, ReservationStatus};
use crate::domain::models::user::{Role, UserAccount};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AdminStats {
    pub total_reservations: usize,
    pub active_reservations: usize,
    pub active_courts: usize,
    pub total_users: usize,
    pub today_reservations: usize,
    pub revenue: f64,
}

/// Revenue counts completed reservations only, billed per hour booked.
pub fn admin_stats(
    reservations: &[ReservationDetails],
    courts: &[Court],
    total_users: usize,
    today: NaiveDate,
) -> AdminStats {
    let active = |r: &&ReservationDetails| r.status == ReservationStatus::Active;

    AdminStats {
        total_reservations: reservations.len(),
        active_reservations: reservations.iter().filter(active).count(),
        active_courts: courts.iter().filter(|c| c.active).count(),
        total_users,
        today_reservations: reservations.iter().filter(active).filter(|r| r.date == today).count(),
        revenue: reservations.iter()
            .filter(|r| r.status == ReservationStatus::Completed)
            .map(|r| r.price_per_hour * r.duration_hours())
            .sum(),
    }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct UserActivity {
    pub total_reservations: usize,
    pub active_reservations: usize,
    pub completed_reservations: usize,
    pub cancelled_reservations: usize,
    pub last_activity: Option<DateTime<Utc>>,
}

pub fn user_activity(user_id: &str, reservations: &[ReservationDetails]) -> UserActivity {
    let mine: Vec<&ReservationDetails> = reservations.iter().filter(|r| r.user_id == user_id).collect();

    UserActivity {
        total_reservations: mine.len(),
        active_reservations: mine.iter().filter(|r| r.status == ReservationStatus::Active).count(),
        completed_reservations: mine.iter().filter(|r| r.status == ReservationStatus::Completed).count(),
        cancelled_reservations: mine.iter().filter(|r| r.status.is_cancelled()).count(),
        last_activity: mine.iter().map(|r| r.created_at).max(),
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UserDashboard {
    pub active_reservations: usize,
    pub today_reservations: usize,
    pub next_seven_days: usize,
}

pub fn user_dashboard(reservations: &[ReservationDetails], today: NaiveDate) -> UserDashboard {
    let week_end = today + Duration::days(7);
    let active: Vec<&ReservationDetails> = reservations.iter()
        .filter(|r| r.status == ReservationStatus::Active)
        .collect();

    UserDashboard {
        active_reservations: active.len(),
        today_reservations: active.iter().filter(|r| r.date == today).count(),
        next_seven_days: active.iter().filter(|r| r.date >= today && r.date <= week_end).count(),
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ReservationFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<ReservationStatus>,
    pub sport_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
}

impl ReservationFilter {
    pub fn matches(&self, r: &ReservationDetails) -> bool {
        if let Some(status) = self.status && r.status != status {
            return false;
        }
        if let Some(sport) = non_empty(&self.sport_type)
            && !r.sport_type_name.eq_ignore_ascii_case(sport) && r.sport_type_id != sport {
            return false;
        }
        if let Some(from) = self.date_from && r.date < from {
            return false;
        }
        if let Some(to) = self.date_to && r.date > to {
            return false;
        }
        if let Some(term) = non_empty(&self.search) {
            let term = term.to_lowercase();
            let user_hit = r.user_name.as_deref().is_some_and(|n| n.to_lowercase().contains(&term));
            if !user_hit
                && !r.court_name.to_lowercase().contains(&term)
                && !r.sport_type_name.to_lowercase().contains(&term) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct UserFilter {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub role: Option<Role>,
}

impl UserFilter {
    pub fn matches(&self, user: &UserAccount) -> bool {
        if let Some(role) = self.role && user.role != role {
            return false;
        }
        if let Some(term) = non_empty(&self.search) {
            let term = term.to_lowercase();
            let contains = |field: Option<&str>| field.is_some_and(|v| v.to_lowercase().contains(&term));
            return contains(Some(&user.name)) || contains(user.phone.as_deref()) || contains(user.email.as_deref());
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Filter forms submit every field; a blank value means "no filter".
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::deserialize(value.to_string().into_deserializer()).map(Some),
    }
}
