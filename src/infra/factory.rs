use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::error::AppError;
use crate::domain::models::user::{Role, User, UserProfile};
use crate::domain::services::auth_service::{hash_password, AuthService};
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_court_repo::PostgresCourtRepo,
    postgres_profile_repo::PostgresProfileRepo, postgres_reservation_repo::PostgresReservationRepo,
    postgres_sport_type_repo::PostgresSportTypeRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_court_repo::SqliteCourtRepo,
    sqlite_profile_repo::SqliteProfileRepo, sqlite_reservation_repo::SqliteReservationRepo,
    sqlite_sport_type_repo::SqliteSportTypeRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let opts = PgConnectOptions::from_str(database_url)
            .map_err(AppError::Database)?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .map_err(AppError::Database)?;

        run_postgres_migrations(&pool).await?;
        postgres_state(config, pool)?
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(AppError::Database)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(AppError::Database)?;

        run_sqlite_migrations(&pool).await?;
        sqlite_state(config, pool)?
    };

    seed_admin(&state).await?;
    Ok(state)
}

pub fn sqlite_state(config: &Config, pool: SqlitePool) -> Result<AppState, AppError> {
    let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config)?);

    Ok(AppState {
        config: config.clone(),
        policy: config.booking_policy(),
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        profile_repo: Arc::new(SqliteProfileRepo::new(pool.clone())),
        sport_type_repo: Arc::new(SqliteSportTypeRepo::new(pool.clone())),
        court_repo: Arc::new(SqliteCourtRepo::new(pool.clone())),
        reservation_repo: Arc::new(SqliteReservationRepo::new(pool)),
        auth_repo,
        auth_service,
    })
}

pub fn postgres_state(config: &Config, pool: PgPool) -> Result<AppState, AppError> {
    let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config)?);

    Ok(AppState {
        config: config.clone(),
        policy: config.booking_policy(),
        user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
        profile_repo: Arc::new(PostgresProfileRepo::new(pool.clone())),
        sport_type_repo: Arc::new(PostgresSportTypeRepo::new(pool.clone())),
        court_repo: Arc::new(PostgresCourtRepo::new(pool.clone())),
        reservation_repo: Arc::new(PostgresReservationRepo::new(pool)),
        auth_repo,
        auth_service,
    })
}

/// Creates the administrator named by `ADMIN_EMAIL`/`ADMIN_PASSWORD` unless
/// that email is already registered. Existing accounts are left untouched.
pub async fn seed_admin(state: &AppState) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password) else {
        return Ok(());
    };

    let email = email.trim().to_lowercase();
    if state.user_repo.find_by_email(&email).await?.is_some() {
        info!("Bootstrap administrator {} already exists", email);
        return Ok(());
    }

    let user = state.user_repo.create(&User::new(email.clone(), hash_password(password)?)).await?;
    let mut profile = UserProfile::new(user.id.clone(), "Administrator".to_string(), None);
    profile.role = Role::Admin;
    state.profile_repo.create(&profile).await?;

    warn!("Created bootstrap administrator {}", email);
    Ok(())
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
