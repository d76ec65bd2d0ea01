//! Core library for the Clearpath AI Advisory readiness assessment service.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;

pub use error::AppError;
