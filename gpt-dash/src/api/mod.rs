//! HTTP API handlers for gpt-dash

pub mod charts;
pub mod health;

pub use charts::chart_routes;
pub use health::health_routes;
