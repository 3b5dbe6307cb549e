pub mod auth;
pub mod court;
pub mod reservation;
pub mod user;
