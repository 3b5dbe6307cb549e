pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;

use crate::config::Config;
use crate::infra::factory::bootstrap_state;
use api::router::create_router;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("./logs", "court-booking.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("info,court_booking_backend=debug"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized. Writing JSON logs to ./logs/");
    guard
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = init_logging();

    let config = Config::from_env().inspect_err(|e| error!("Configuration error: {}", e))?;
    let state = bootstrap_state(&config).await.inspect_err(|e| error!("Startup failed: {}", e))?;

    info!(
        timezone = %config.facility_timezone,
        slot_minutes = config.slot_minutes,
        booking_lead_hours = config.booking_lead_hours,
        "Booking rules loaded"
    );

    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!("Server running on port {}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
