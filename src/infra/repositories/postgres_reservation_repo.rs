use crate::domain::{
    models::reservation::{Reservation, ReservationDetails, StatusChange},
    ports::ReservationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

const DETAILS_SELECT: &str =
    "SELECT r.id, r.user_id, r.court_id, r.date, r.start_time, r.end_time, r.status, r.penalty_applied, r.created_at,
            c.name AS court_name, c.price_per_hour, c.sport_type_id, s.name AS sport_type_name, p.name AS user_name
     FROM reservations r
     JOIN courts c ON c.id = r.court_id
     JOIN sport_types s ON s.id = c.sport_type_id
     LEFT JOIN user_profiles p ON p.user_id = r.user_id";

pub struct PostgresReservationRepo {
    pool: PgPool,
}

impl PostgresReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepo {
    async fn create_if_free(&self, reservation: &Reservation) -> Result<Option<Reservation>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the court serializes concurrent bookings for it.
        let court = sqlx::query_scalar::<_, String>("SELECT id FROM courts WHERE id = $1 FOR UPDATE")
            .bind(&reservation.court_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        if court.is_none() {
            return Err(AppError::NotFound("Court not found".into()));
        }

        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, user_id, court_id, date, start_time, end_time, status, penalty_applied, created_at)
             SELECT $1, $2, $3, $4::date, $5::time, $6::time, $7, $8, $9
             WHERE NOT EXISTS (
                 SELECT 1 FROM reservations
                 WHERE court_id = $3 AND date = $4::date AND status = 'ACTIVE'
                   AND start_time < $6::time AND end_time > $5::time
             )
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.user_id).bind(&reservation.court_id)
            .bind(reservation.date).bind(reservation.start_time).bind(reservation.end_time)
            .bind(reservation.status.as_str()).bind(reservation.penalty_applied).bind(reservation.created_at)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_for_court_on(&self, court_id: &str, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE court_id = $1 AND date = $2 AND status = 'ACTIVE' ORDER BY start_time ASC"
        )
            .bind(court_id)
            .bind(date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_details_by_user(&self, user_id: &str) -> Result<Vec<ReservationDetails>, AppError> {
        let sql = format!("{} WHERE r.user_id = $1 ORDER BY r.date DESC, r.start_time DESC", DETAILS_SELECT);
        sqlx::query_as::<_, ReservationDetails>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_details(&self) -> Result<Vec<ReservationDetails>, AppError> {
        let sql = format!("{} ORDER BY r.date DESC, r.start_time DESC", DETAILS_SELECT);
        sqlx::query_as::<_, ReservationDetails>(&sql)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, change: StatusChange) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $1, penalty_applied = $2 WHERE id = $3 AND status = 'ACTIVE' RETURNING *"
        )
            .bind(change.status.as_str())
            .bind(change.penalty_applied)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
