pub mod config;
pub mod reload;
pub mod server;
pub mod telemetry;
pub mod web;
