pub mod api;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod sentiment;
