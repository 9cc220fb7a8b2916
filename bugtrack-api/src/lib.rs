//! Bugtrack API - REST API Layer
//!
//! This crate exposes the bug-tracking REST surface over Axum and persists
//! bug records through a PostgreSQL connection pool. Routes map the five
//! HTTP verbs onto the five bug collection operations; the error module
//! translates store and validation failures into uniform JSON bodies.

pub mod config;
pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::ApiConfig;
pub use db::{BugFilter, DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use types::*;
pub use validation::ValidatedBug;
