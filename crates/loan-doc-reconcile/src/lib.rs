//! Reconciles AI-extracted Thai loan documents against stored applicant profiles.

pub mod config;
pub mod error;
pub mod reconciliation;
pub mod telemetry;

pub use config::AppConfig;
pub use error::AppError;
