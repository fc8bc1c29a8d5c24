//! HTTP integration: firewall configuration, axum middleware, and the demo server.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod wiring;
