//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the assessment pipeline and the pre-trained model artifacts.

mod model;

pub use model::{Classifier, FeatureScaler, FeatureVector, ModelError, ModelOutput};
