//! Core library for the iris prediction service
//!
//! This crate provides:
//! - Model provisioning (persisted artifact or fallback training)
//! - Random forest inference
//! - Request shape normalization
//! - Health checks and observability

pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod shape;

pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{Classifier, ModelError};
pub use shape::{SampleInput, ShapeError};
