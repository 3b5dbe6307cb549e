use std::env;
use std::str::FromStr;
use chrono::Duration;
use chrono_tz::Tz;
use thiserror::Error;
use crate::domain::services::availability::OperatingCalendar;
use crate::domain::services::policy::BookingPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Ed25519 private key, PEM
    pub jwt_public_key: String, // Ed25519 public key, PEM
    pub auth_issuer: String,
    /// Marks session cookies `Secure`. Turn off only for plain-HTTP local runs.
    pub cookie_secure: bool,
    pub facility_timezone: Tz,
    pub operating_hours: OperatingCalendar,
    pub slot_minutes: i64,
    pub booking_lead_hours: i64,
    pub cancellation_lead_hours: i64,
    pub max_duration_hours: u32,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let operating_hours = match env::var("OPERATING_HOURS") {
            Ok(raw) => OperatingCalendar::from_json(&raw)
                .map_err(|reason| ConfigError::Invalid { name: "OPERATING_HOURS", reason })?,
            Err(_) => OperatingCalendar::default(),
        };

        let config = Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("PORT", 3000)?,
            jwt_secret_key: required("JWT_SECRET_KEY")?,
            jwt_public_key: required("JWT_PUBLIC_KEY")?,
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.court-booking.local".to_string()),
            cookie_secure: parsed("COOKIE_SECURE", true)?,
            facility_timezone: parsed("FACILITY_TIMEZONE", Tz::UTC)?,
            operating_hours,
            slot_minutes: parsed("SLOT_MINUTES", 60)?,
            booking_lead_hours: parsed("BOOKING_LEAD_HOURS", 24)?,
            cancellation_lead_hours: parsed("CANCELLATION_LEAD_HOURS", 2)?,
            max_duration_hours: parsed("MAX_DURATION_HOURS", 2)?,
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_minutes <= 0 || 60 % self.slot_minutes != 0 {
            return Err(ConfigError::Invalid {
                name: "SLOT_MINUTES",
                reason: "must be a positive divisor of 60".into(),
            });
        }
        if self.max_duration_hours == 0 {
            return Err(ConfigError::Invalid { name: "MAX_DURATION_HOURS", reason: "must be at least 1".into() });
        }
        if self.booking_lead_hours < 0 {
            return Err(ConfigError::Invalid { name: "BOOKING_LEAD_HOURS", reason: "cannot be negative".into() });
        }
        if self.cancellation_lead_hours < 0 {
            return Err(ConfigError::Invalid { name: "CANCELLATION_LEAD_HOURS", reason: "cannot be negative".into() });
        }
        Ok(())
    }

    pub fn slot_granularity(&self) -> Duration {
        Duration::minutes(self.slot_minutes)
    }

    /// Slots per booked hour at the configured granularity.
    pub fn slots_per_hour(&self) -> u32 {
        (60 / self.slot_minutes.max(1)) as u32
    }

    pub fn booking_policy(&self) -> BookingPolicy {
        BookingPolicy {
            booking_lead: Duration::hours(self.booking_lead_hours),
            cancellation_lead: Duration::hours(self.cancellation_lead_hours),
            max_duration_hours: self.max_duration_hours,
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid { name, reason: e.to_string() }),
        Err(_) => Ok(default),
    }
}
