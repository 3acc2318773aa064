//! # Cardiolens
//!
//! Heart-disease risk assessment from thirteen clinical parameters.
//!
//! This crate provides:
//! - A pure rule engine (risk tiers, clinical insights, precautions)
//! - A narrow port over a pre-trained scaler and classifier
//! - Terminal UI and plain-text presenters over the same value objects
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientRecord, RiskTier, Insight, Precautions)
//! - `ports`: Trait definitions for the external model artifacts
//! - `adapters`: Concrete implementations (JSON model bundle, log redaction)
//! - `application`: The assessment pipeline composing domain and ports
//! - `report`: Plain-text presenter
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod report;
pub mod tui;

pub use domain::{Assessment, Insight, PatientRecord, PredictionResult, RiskTier, Severity};

/// Result type for Cardiolens operations
pub type Result<T> = std::result::Result<T, CardiolensError>;

/// Main error type for Cardiolens
#[derive(Debug, thiserror::Error)]
pub enum CardiolensError {
    #[error("Model operation failed: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Invalid patient data: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
