//! Price lookup collaborator
//!
//! The engine never fetches quotes itself. Callers inject a [`PriceSource`]
//! (any symbol -> price mapping) for portfolio valuation, and a validated
//! [`PriceSnapshot`] for order execution. [`PriceTable`] is an in-memory
//! implementation suitable for tests and for callers that maintain their own
//! quote cache.

use crate::error::{Result, SimulationError};
use crate::types::{Price, Symbol, Timestamp};
use chrono::Duration;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Quotes older than this are considered stale for order execution
pub const DEFAULT_PRICE_MAX_AGE_SECS: i64 = 600;

/// Snapshot of a quote at a moment in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub symbol: Symbol,
    pub price: Price,
    pub timestamp: Timestamp,
}

impl PriceSnapshot {
    pub fn new(symbol: impl Into<Symbol>, price: Price, timestamp: Timestamp) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            timestamp,
        }
    }

    /// Check the snapshot is usable for execution
    pub fn validate(&self) -> Result<()> {
        if self.price <= 0.0 {
            return Err(SimulationError::InvalidOperation(format!(
                "invalid price for {}: {}",
                self.symbol, self.price
            )));
        }
        Ok(())
    }

    /// Whether the quote is still fresh at `now`, given a maximum age
    pub fn is_fresh(&self, now: Timestamp, max_age: Duration) -> bool {
        now.signed_duration_since(self.timestamp) <= max_age
    }
}

/// Symbol -> current price lookup
///
/// Valuation treats a missing symbol as price 0 rather than an error, so
/// reconstruction can always complete; see the portfolio module.
pub trait PriceSource {
    fn price(&self, symbol: &str) -> Option<Price>;
}

impl PriceSource for HashMap<Symbol, Price> {
    fn price(&self, symbol: &str) -> Option<Price> {
        self.get(symbol).copied()
    }
}

impl PriceSource for std::collections::HashMap<Symbol, Price> {
    fn price(&self, symbol: &str) -> Option<Price> {
        self.get(symbol).copied()
    }
}

/// In-memory table of validated quote snapshots with a freshness contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    snapshots: HashMap<Symbol, PriceSnapshot>,
    max_age_secs: i64,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::with_max_age(DEFAULT_PRICE_MAX_AGE_SECS)
    }

    pub fn with_max_age(max_age_secs: i64) -> Self {
        Self {
            snapshots: HashMap::new(),
            max_age_secs,
        }
    }

    /// Insert a snapshot, replacing any previous quote for the symbol
    pub fn insert(&mut self, snapshot: PriceSnapshot) -> Result<()> {
        snapshot.validate()?;
        self.snapshots.insert(snapshot.symbol.clone(), snapshot);
        Ok(())
    }

    /// Latest quote regardless of age
    pub fn latest(&self, symbol: &str) -> Option<&PriceSnapshot> {
        self.snapshots.get(symbol)
    }

    /// Quote usable for execution at `now`
    ///
    /// Missing or stale quotes abort the trade with `InsufficientPriceData`.
    pub fn quote(&self, symbol: &str, now: Timestamp) -> Result<&PriceSnapshot> {
        let snapshot = self
            .snapshots
            .get(symbol)
            .ok_or_else(|| SimulationError::InsufficientPriceData(symbol.to_string()))?;

        if !snapshot.is_fresh(now, Duration::seconds(self.max_age_secs)) {
            log::warn!(
                "stale quote for {}: {}s old",
                symbol,
                now.signed_duration_since(snapshot.timestamp).num_seconds()
            );
            return Err(SimulationError::InsufficientPriceData(symbol.to_string()));
        }

        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for PriceTable {
    fn price(&self, symbol: &str) -> Option<Price> {
        self.snapshots.get(symbol).map(|s| s.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_snapshot_validation() {
        let good = PriceSnapshot::new("AAPL", 150.0, Utc::now());
        assert!(good.validate().is_ok());

        let bad = PriceSnapshot::new("AAPL", 0.0, Utc::now());
        assert!(matches!(
            bad.validate(),
            Err(SimulationError::InvalidOperation(_))
        ));

        let negative = PriceSnapshot::new("AAPL", -10.0, Utc::now());
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_snapshot_freshness() {
        let now = Utc::now();
        let snapshot = PriceSnapshot::new("AAPL", 150.0, now - Duration::seconds(300));

        assert!(snapshot.is_fresh(now, Duration::seconds(600)));
        assert!(!snapshot.is_fresh(now, Duration::seconds(120)));
    }

    #[test]
    fn test_table_quote_missing_symbol() {
        let table = PriceTable::new();
        let err = table.quote("TSLA", Utc::now()).unwrap_err();
        assert_eq!(
            err,
            SimulationError::InsufficientPriceData("TSLA".to_string())
        );
    }

    #[test]
    fn test_table_quote_stale() {
        let now = Utc::now();
        let mut table = PriceTable::with_max_age(600);
        table
            .insert(PriceSnapshot::new("AAPL", 150.0, now - Duration::seconds(601)))
            .unwrap();

        assert!(table.quote("AAPL", now).is_err());
        // Still visible to the valuation path
        assert_eq!(table.price("AAPL"), Some(150.0));
    }

    #[test]
    fn test_table_rejects_invalid_snapshot() {
        let mut table = PriceTable::new();
        assert!(table
            .insert(PriceSnapshot::new("AAPL", -1.0, Utc::now()))
            .is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_hashmap_price_source() {
        let mut prices: HashMap<Symbol, Price> = HashMap::new();
        prices.insert("AAPL".to_string(), 150.0);

        assert_eq!(prices.price("AAPL"), Some(150.0));
        assert_eq!(prices.price("TSLA"), None);
    }
}
