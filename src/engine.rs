//! Simulation engine facade
//!
//! Ties validation, reconstruction, and the position-size control together
//! for the request handlers. The engine is pure: it reads the ledger and a
//! quote, and returns the [`ExecutionResult`] the caller persists as a new
//! [`Transaction`]. Serializing "validate then persist" across concurrent
//! orders is the store's job, not the engine's.

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::orders::{calculate_buy_cost, validate_buy_order, validate_sell_order, BuySizing};
use crate::portfolio::{calculate_portfolio_from_transactions, PortfolioSnapshot};
use crate::prices::{PriceSnapshot, PriceSource};
use crate::transaction::{Transaction, TransactionType};
use crate::types::{Cash, Price, Quantity, Symbol, Timestamp, UserId};
use log::debug;
use serde::{Deserialize, Serialize};

/// Outcome of a fully validated order, ready to be persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub symbol: Symbol,
    pub kind: TransactionType,
    pub quantity: Quantity,
    pub price_per_unit: Price,
    /// Notional before commission
    pub total_amount: Cash,
    pub commission_amount: Cash,
    /// Cash moved: notional + commission on buys, notional - commission on
    /// sells
    pub total_cost: Cash,
    /// Cash left after the trade settles
    pub remaining_capital: Cash,
}

impl ExecutionResult {
    /// Build the ledger record for this execution
    pub fn to_transaction(&self, user_id: UserId, timestamp: Timestamp) -> Transaction {
        Transaction::new(
            user_id,
            self.symbol.clone(),
            self.kind,
            self.quantity,
            self.price_per_unit,
            self.commission_amount,
            timestamp,
        )
    }
}

/// Stateless facade over the validation and reconstruction functions
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Reconstruct the current portfolio for a ledger
    pub fn portfolio<P: PriceSource>(
        &self,
        ledger: &[Transaction],
        prices: &P,
    ) -> PortfolioSnapshot {
        calculate_portfolio_from_transactions(ledger, prices, self.config.initial_capital)
    }

    /// Validate a buy against the ledger-derived state
    ///
    /// Applies the configured position-size cap on top of the plain order
    /// checks: the post-trade position may not exceed
    /// `max_position_size_pct` of the post-trade portfolio value.
    pub fn execute_buy<P: PriceSource>(
        &self,
        ledger: &[Transaction],
        prices: &P,
        sizing: BuySizing,
        quote: &PriceSnapshot,
    ) -> Result<ExecutionResult> {
        quote.validate()?;

        let snapshot = self.portfolio(ledger, prices);

        let (quantity, total_cost) = validate_buy_order(
            sizing,
            snapshot.cash_available,
            quote.price,
            self.config.commission_rate,
            self.config.min_trade_amount,
        )?;

        let (notional, commission_amount) =
            calculate_buy_cost(quantity, quote.price, self.config.commission_rate)?;

        self.check_position_size(&snapshot, &quote.symbol, notional, commission_amount)?;

        let remaining_capital = snapshot.cash_available - total_cost;
        debug!(
            "buy validated: {:.4} {} @ {:.2}, cost {:.2}, cash left {:.2}",
            quantity, quote.symbol, quote.price, total_cost, remaining_capital
        );

        Ok(ExecutionResult {
            symbol: quote.symbol.clone(),
            kind: TransactionType::Buy,
            quantity,
            price_per_unit: quote.price,
            total_amount: notional,
            commission_amount,
            total_cost,
            remaining_capital,
        })
    }

    /// Validate a sell against the ledger-derived state
    pub fn execute_sell<P: PriceSource>(
        &self,
        ledger: &[Transaction],
        prices: &P,
        quantity_to_sell: Quantity,
        quote: &PriceSnapshot,
    ) -> Result<ExecutionResult> {
        quote.validate()?;

        let snapshot = self.portfolio(ledger, prices);
        let quantity_available = snapshot.quantity_held(&quote.symbol);

        let (quantity, net_proceeds) = validate_sell_order(
            quantity_to_sell,
            quantity_available,
            quote.price,
            self.config.commission_rate,
            self.config.min_trade_amount,
        )?;

        let notional = quantity * quote.price;
        let commission_amount = notional - net_proceeds;
        let remaining_capital = snapshot.cash_available + net_proceeds;
        debug!(
            "sell validated: {:.4} {} @ {:.2}, proceeds {:.2}, cash after {:.2}",
            quantity, quote.symbol, quote.price, net_proceeds, remaining_capital
        );

        Ok(ExecutionResult {
            symbol: quote.symbol.clone(),
            kind: TransactionType::Sell,
            quantity,
            price_per_unit: quote.price,
            total_amount: notional,
            commission_amount,
            total_cost: net_proceeds,
            remaining_capital,
        })
    }

    /// Reject buys that would push one position past the configured cap
    ///
    /// Buying converts cash into position value, so the post-trade portfolio
    /// value only shrinks by the commission.
    fn check_position_size(
        &self,
        snapshot: &PortfolioSnapshot,
        symbol: &str,
        notional: Cash,
        commission_amount: Cash,
    ) -> Result<()> {
        let cap = self.config.max_position_size_pct;
        if cap <= 0.0 || cap >= 100.0 {
            return Ok(());
        }

        let post_trade_total = snapshot.total_portfolio_value - commission_amount;
        if post_trade_total <= 0.0 {
            return Ok(());
        }

        let current_value = snapshot
            .holdings
            .get(symbol)
            .map_or(0.0, |h| h.current_value);
        let projected_pct = (current_value + notional) / post_trade_total * 100.0;

        if projected_pct > cap {
            debug!(
                "buy rejected: {} would be {:.1}% of portfolio, cap {:.1}%",
                symbol, projected_pct, cap
            );
            return Err(SimulationError::InvalidOperation(format!(
                "position in {} would reach {:.1}% of your portfolio (cap {:.1}%)",
                symbol, projected_pct, cap
            )));
        }

        Ok(())
    }
}
