pub mod calendar;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod forecaster;
pub mod models;
pub mod series_store;
pub mod sufficiency;
