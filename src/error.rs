//! Error types for the simulation engine

use thiserror::Error;

/// Main error type for simulation operations
///
/// Validators fail fast with one of these; metrics functions never error
/// (they degrade to zero/neutral values so a dashboard can always render).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Insufficient capital: required {required:.2}, available {available:.2}")]
    InsufficientCapital { required: f64, available: f64 },

    #[error("Insufficient holdings: requested {requested:.4}, available {available:.4}")]
    InsufficientHoldings { requested: f64, available: f64 },

    #[error("No valid price data for {0}")]
    InsufficientPriceData(String),
}

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, SimulationError>;
