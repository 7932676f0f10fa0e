//! Core types and constants

use chrono::{DateTime, Utc};

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier for assets (e.g. "AAPL", "BTC-USD")
pub type Symbol = String;

/// Price type
pub type Price = f64;

/// Quantity type (fractional units are allowed)
pub type Quantity = f64;

/// Money/cash type
pub type Cash = f64;

/// Percentage type (0.0 to 100.0)
pub type Percent = f64;

/// Unique identifier for transactions
pub type TransactionId = uuid::Uuid;

/// Unique identifier for users (assigned by the surrounding store)
pub type UserId = u64;

/// Positions with less quantity than this are treated as closed
pub const POSITION_EPSILON: f64 = 1e-4;
