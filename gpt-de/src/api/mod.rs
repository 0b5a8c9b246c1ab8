//! HTTP API handlers for gpt-de

pub mod entity;
pub mod error;
pub mod health;

pub use entity::entity_routes;
pub use error::ApiError;
pub use health::health_routes;
