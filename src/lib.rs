pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod health;
pub mod pages;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod views;
