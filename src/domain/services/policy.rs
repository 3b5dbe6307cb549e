use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use crate::domain::models::reservation::{Reservation, ReservationStatus, StatusChange};
use crate::domain::models::user::Actor;
use crate::error::AppError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Reservations must be made at least {0} hours in advance")]
    InsufficientBookingLead(i64),
    #[error("Reservations can only be cancelled up to {0} hours before they start")]
    CancellationWindowClosed(i64),
    #[error("Duration must be between 1 and {max} hours, got {requested}")]
    UnsupportedDuration { requested: u32, max: u32 },
    #[error("Reservation is already {0}")]
    NotActive(ReservationStatus),
    #[error("Only the owner can cancel this reservation")]
    NotOwner,
    #[error("Administrator role required")]
    AdminOnly,
}

impl From<PolicyViolation> for AppError {
    fn from(violation: PolicyViolation) -> Self {
        match violation {
            PolicyViolation::InsufficientBookingLead(_)
            | PolicyViolation::CancellationWindowClosed(_)
            | PolicyViolation::UnsupportedDuration { .. } => AppError::Validation(violation.to_string()),
            PolicyViolation::NotActive(_) => AppError::Conflict(violation.to_string()),
            PolicyViolation::NotOwner | PolicyViolation::AdminOnly => AppError::Forbidden(violation.to_string()),
        }
    }
}

/// Lead-time rules and the reservation status machine.
///
/// ACTIVE can move to CANCELLED (owner, with penalty), CANCELLED_ADMIN
/// (admin, no penalty) or COMPLETED (admin). Nothing leaves a terminal status.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    pub booking_lead: Duration,
    pub cancellation_lead: Duration,
    pub max_duration_hours: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            booking_lead: Duration::hours(24),
            cancellation_lead: Duration::hours(2),
            max_duration_hours: 2,
        }
    }
}

impl BookingPolicy {
    pub fn check_duration(&self, requested: u32) -> Result<(), PolicyViolation> {
        if requested == 0 || requested > self.max_duration_hours {
            return Err(PolicyViolation::UnsupportedDuration { requested, max: self.max_duration_hours });
        }
        Ok(())
    }

    pub fn check_booking_lead(&self, start_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), PolicyViolation> {
        if start_at - now < self.booking_lead {
            return Err(PolicyViolation::InsufficientBookingLead(self.booking_lead.num_hours()));
        }
        Ok(())
    }

    pub fn cancellation_deadline(&self, start_at: DateTime<Utc>) -> DateTime<Utc> {
        start_at - self.cancellation_lead
    }

    pub fn cancellable_by_owner(&self, status: ReservationStatus, start_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        status == ReservationStatus::Active && start_at - now >= self.cancellation_lead
    }

    pub fn owner_cancel(
        &self,
        actor: &Actor,
        reservation: &Reservation,
        start_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, PolicyViolation> {
        if reservation.user_id != actor.user_id {
            return Err(PolicyViolation::NotOwner);
        }
        ensure_active(reservation)?;
        if start_at - now < self.cancellation_lead {
            return Err(PolicyViolation::CancellationWindowClosed(self.cancellation_lead.num_hours()));
        }
        Ok(StatusChange { status: ReservationStatus::Cancelled, penalty_applied: true })
    }

    pub fn admin_cancel(&self, actor: &Actor, reservation: &Reservation) -> Result<StatusChange, PolicyViolation> {
        ensure_admin(actor)?;
        ensure_active(reservation)?;
        Ok(StatusChange { status: ReservationStatus::CancelledAdmin, penalty_applied: false })
    }

    pub fn complete(&self, actor: &Actor, reservation: &Reservation) -> Result<StatusChange, PolicyViolation> {
        ensure_admin(actor)?;
        ensure_active(reservation)?;
        Ok(StatusChange { status: ReservationStatus::Completed, penalty_applied: reservation.penalty_applied })
    }
}

fn ensure_admin(actor: &Actor) -> Result<(), PolicyViolation> {
    if !actor.is_admin() {
        return Err(PolicyViolation::AdminOnly);
    }
    Ok(())
}

fn ensure_active(reservation: &Reservation) -> Result<(), PolicyViolation> {
    if reservation.status.is_terminal() {
        return Err(PolicyViolation::NotActive(reservation.status));
    }
    Ok(())
}

/// Instant at which a facility-local date and time occurs. Times skipped by a
/// DST jump have no instant; repeated times resolve to the earlier one.
pub fn facility_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
