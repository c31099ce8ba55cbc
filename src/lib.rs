pub mod calendar;
pub mod config;
pub mod error;
pub mod events;
pub mod holidays;
pub mod ui;
