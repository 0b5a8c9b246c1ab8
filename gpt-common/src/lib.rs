//! # Guitar Practice Tracker Common Library
//!
//! Shared code for the data entry service (gpt-de), the dashboard
//! (gpt-dash) and the backup tool:
//! - Raw table store over PostgreSQL or the local SQLite fallback
//! - Entity records (artists, songs, arrangements, sessions, guitars, ...)
//! - View resolver (left joins, summary tables, lookup controls)
//! - Reporting aggregator (stage, heatmap, repertoire, string wear)
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod resolve;
pub mod time;

pub use error::{Error, Result};
pub use models::Stage;
