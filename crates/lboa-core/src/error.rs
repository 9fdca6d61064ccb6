//! Error types for LBOA

use thiserror::Error;

/// Main error type for LBOA operations
#[derive(Debug, Error)]
pub enum LboaError {
    /// The original, master and subproblem copies do not line up
    #[error("Model mismatch: {0}")]
    ModelMismatch(String),

    /// No objective is active on the model
    #[error("Model '{0}' has no active objective")]
    NoActiveObjective(String),

    /// More than one objective is active on the model
    #[error("Model '{model}' has {count} active objectives, expected exactly one")]
    MultipleActiveObjectives { model: String, count: usize },

    /// A discrete variable holds a value too far from an integer
    #[error("Discrete variable '{name}' has non-integral value {value}")]
    NonIntegralValue { name: String, value: f64 },

    /// A variable that should carry a solution value has none
    #[error("Variable '{0}' has no value")]
    MissingValue(String),

    /// A variable id outside the model
    #[error("Unknown variable index {0}")]
    UnknownVariable(usize),

    /// Failure reported by an external solver or cut generator
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias for LBOA operations
pub type Result<T> = std::result::Result<T, LboaError>;
