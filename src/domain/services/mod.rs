pub mod auth_service;
pub mod availability;
pub mod catalog;
pub mod policy;
pub mod stats;
