//! # Simvest Engine
//!
//! The financial simulation engine behind the Simvest paper-trading
//! platform: order validation, ledger-derived portfolio reconstruction,
//! P&L/risk/allocation metrics, and structured educational feedback.
//!
//! The engine is purely functional. It owns no state and performs no I/O:
//! callers load the transaction ledger and configuration from their store,
//! fetch quotes from their market-data provider, and hand everything in by
//! argument. The ledger is the sole source of truth for positions; every
//! snapshot is recomputed from it.
//!
//! ## Example
//!
//! ```rust
//! use simvest::prelude::*;
//! use chrono::Utc;
//! use hashbrown::HashMap;
//!
//! let engine = SimulationEngine::new(SimulationConfig::default());
//! let prices: HashMap<String, f64> = HashMap::new();
//!
//! let quote = PriceSnapshot::new("AAPL", 150.0, Utc::now());
//! let result = engine
//!     .execute_buy(&[], &prices, BuySizing::Units(10.0), &quote)
//!     .unwrap();
//!
//! // The caller persists the transaction; the ledger grows append-only.
//! let ledger = vec![result.to_transaction(1, Utc::now())];
//! let snapshot = engine.portfolio(&ledger, &prices);
//! assert_eq!(snapshot.quantity_held("AAPL"), 10.0);
//! ```

pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod metrics;
pub mod orders;
pub mod portfolio;
pub mod prices;
pub mod transaction;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::config::SimulationConfig;
    pub use crate::dashboard::{generate_dashboard_data, DashboardData};
    pub use crate::engine::{ExecutionResult, SimulationEngine};
    pub use crate::error::{Result, SimulationError};
    pub use crate::feedback::{
        generate_extended_buy_feedback, generate_extended_sell_feedback, BuyFeedback, SellFeedback,
    };
    pub use crate::metrics::{
        calculate_portfolio_metrics, calculate_risk_profile, PortfolioMetrics, RiskProfile,
    };
    pub use crate::orders::{validate_buy_order, validate_sell_order, BuySizing};
    pub use crate::portfolio::{
        calculate_portfolio_from_transactions, Holding, PortfolioSnapshot,
    };
    pub use crate::prices::{PriceSnapshot, PriceSource, PriceTable};
    pub use crate::transaction::{Transaction, TransactionStatus, TransactionType};
    pub use crate::types::*;
}
