// src/lib.rs

pub mod api;
pub mod app;
pub mod assistant;
pub mod config;
pub mod constants;
pub mod context;
pub mod desktop;
pub mod errors;
pub mod key_handlers;
pub mod logging;
pub mod markup;
pub mod models;
pub mod status_indicator;
pub mod ui;
