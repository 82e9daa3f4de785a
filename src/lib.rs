pub mod app;
pub mod beverages;
pub mod coerce;
pub mod config;
pub mod consumption;
pub mod error;
pub mod state;
pub mod users;
