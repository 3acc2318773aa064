//! Adapters layer: Concrete implementations of ports.
//!
//! - `model`: JSON scaler/classifier artifacts exported by the training pipeline
//! - `sanitize`: patient-data redaction for logs

pub mod model;
pub mod sanitize;

pub use model::ModelBundle;
