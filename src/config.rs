//! Simulation rule set and deployment defaults

use crate::types::{Cash, Percent};
use serde::{Deserialize, Serialize};

/// Default starting capital granted to each user
pub const DEFAULT_INITIAL_CAPITAL: Cash = 10_000.0;

/// Default commission rate (fraction of notional)
pub const DEFAULT_COMMISSION_RATE: f64 = 0.0005;

/// Default minimum trade amount in dollars
pub const DEFAULT_MIN_TRADE_AMOUNT: Cash = 1.0;

/// Default cap on a single position as a fraction of portfolio value
pub const DEFAULT_MAX_POSITION_SIZE_PCT: Percent = 25.0;

/// Process-wide simulation rule set
///
/// Supplied to the engine per call and never mutated by it. The surrounding
/// application decides where these values live (environment, database row,
/// per-deployment file).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Capital granted to a fresh account
    pub initial_capital: Cash,
    /// Commission charged as a fraction of notional, on both sides
    pub commission_rate: f64,
    /// Smallest order notional accepted
    pub min_trade_amount: Cash,
    /// Largest single position allowed, as a percentage of portfolio value
    pub max_position_size_pct: Percent,
}

impl SimulationConfig {
    pub fn new(
        initial_capital: Cash,
        commission_rate: f64,
        min_trade_amount: Cash,
        max_position_size_pct: Percent,
    ) -> Self {
        Self {
            initial_capital,
            commission_rate,
            min_trade_amount,
            max_position_size_pct,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            commission_rate: DEFAULT_COMMISSION_RATE,
            min_trade_amount: DEFAULT_MIN_TRADE_AMOUNT,
            max_position_size_pct: DEFAULT_MAX_POSITION_SIZE_PCT,
        }
    }
}
