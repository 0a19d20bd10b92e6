//! Domain model for growthscope
//!
//! This module contains core domain types and errors that provide:
//! - Constructor-checked observations (positive size, finite time)
//! - The closed set of complexity classes and their reference functions
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{ComplexityClass, Observation};

pub use errors::{AnalysisError, ConfigError, ExportError, PipelineError, TableError};
