pub mod account;
pub mod admin_catalog;
pub mod admin_reservation;
pub mod admin_user;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod reservation;
