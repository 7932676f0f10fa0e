//! Portfolio reconstruction from the transaction ledger
//!
//! The ledger is the sole source of truth: every snapshot is recomputed from
//! the full transaction history plus the latest prices. Average-cost-basis
//! accounting is used; a sell removes a proportional share of the running
//! basis rather than tracking individual lots.

use crate::prices::PriceSource;
use crate::transaction::Transaction;
use crate::types::{Cash, Percent, Quantity, Symbol, POSITION_EPSILON};
use hashbrown::HashMap;
use log::trace;
use serde::{Deserialize, Serialize};

/// Per-symbol view derived from the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Units currently held
    pub quantity: Quantity,
    /// Weighted-average buy price (commission included)
    pub avg_buy_price: Cash,
    /// Total amount attributed to the held units, commission included
    pub cost_basis: Cash,
    /// Market value at the latest price (0 when no price is known)
    pub current_value: Cash,
}

/// Full portfolio state, derived fresh on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Invested cost bases plus cash
    pub total_capital: Cash,
    /// Sum of open-position cost bases
    pub total_invested: Cash,
    /// Cash left after replaying every trade against the initial capital
    pub cash_available: Cash,
    /// Open positions by symbol
    pub holdings: HashMap<Symbol, Holding>,
    /// Market value of open positions plus cash
    pub total_portfolio_value: Cash,
}

impl PortfolioSnapshot {
    /// An untouched account: all capital in cash
    pub fn empty(initial_capital: Cash) -> Self {
        Self {
            total_capital: initial_capital,
            total_invested: 0.0,
            cash_available: initial_capital,
            holdings: HashMap::new(),
            total_portfolio_value: initial_capital,
        }
    }

    /// Units held of a symbol (0 when the position is closed or unknown)
    pub fn quantity_held(&self, symbol: &str) -> Quantity {
        self.holdings.get(symbol).map_or(0.0, |h| h.quantity)
    }

    pub fn num_holdings(&self) -> usize {
        self.holdings.len()
    }

    /// A holding's share of total portfolio value, as a percentage
    pub fn weight_of(&self, symbol: &str) -> Percent {
        if self.total_portfolio_value <= 0.0 {
            return 0.0;
        }
        self.holdings
            .get(symbol)
            .map_or(0.0, |h| h.current_value / self.total_portfolio_value * 100.0)
    }
}

/// Running per-symbol accumulator used during replay
#[derive(Debug, Default)]
struct RunningPosition {
    quantity: Quantity,
    cost_basis: Cash,
}

/// Reconstruct portfolio state from the ledger and current prices
///
/// Transactions are replayed in timestamp order (stable for equal
/// timestamps), so out-of-order storage cannot change the average-cost
/// arithmetic. Cancelled rows are skipped. Positions whose remaining
/// quantity falls below [`POSITION_EPSILON`] are treated as closed and
/// dropped. A symbol with no known price values at 0 rather than erroring,
/// so the snapshot can always be produced.
pub fn calculate_portfolio_from_transactions<P: PriceSource>(
    ledger: &[Transaction],
    current_prices: &P,
    initial_capital: Cash,
) -> PortfolioSnapshot {
    let mut ordered: Vec<&Transaction> = ledger.iter().filter(|t| t.is_completed()).collect();
    ordered.sort_by_key(|t| t.timestamp);

    let mut positions: HashMap<Symbol, RunningPosition> = HashMap::new();

    for txn in &ordered {
        let position = positions.entry(txn.symbol.clone()).or_default();

        if txn.is_buy() {
            position.quantity += txn.quantity;
            position.cost_basis += txn.total_cost();
        } else {
            position.quantity -= txn.quantity;
            if position.quantity > 0.0 {
                // Remove the basis-weighted share of what was sold,
                // relative to the pre-sell quantity
                let reduction_ratio = txn.quantity / (position.quantity + txn.quantity);
                position.cost_basis *= 1.0 - reduction_ratio;
            } else {
                position.cost_basis = 0.0;
            }
        }
        trace!(
            "replayed {:?} {} {:.4} @ {:.2} -> qty {:.4}, basis {:.2}",
            txn.kind,
            txn.symbol,
            txn.quantity,
            txn.price_per_unit,
            position.quantity,
            position.cost_basis
        );
    }

    let mut holdings: HashMap<Symbol, Holding> = HashMap::new();
    let mut positions_value = 0.0;
    let mut total_invested = 0.0;

    for (symbol, position) in positions {
        if position.quantity <= POSITION_EPSILON {
            continue;
        }

        let current_price = current_prices.price(&symbol).unwrap_or(0.0);
        let current_value = position.quantity * current_price;
        let avg_buy_price = position.cost_basis / position.quantity;

        positions_value += current_value;
        total_invested += position.cost_basis;

        holdings.insert(
            symbol,
            Holding {
                quantity: position.quantity,
                avg_buy_price,
                cost_basis: position.cost_basis,
                current_value,
            },
        );
    }

    let cash_available = calculate_cash_from_transactions(ledger, initial_capital);

    PortfolioSnapshot {
        total_capital: total_invested + cash_available,
        total_invested,
        cash_available,
        holdings,
        total_portfolio_value: positions_value + cash_available,
    }
}

/// Replay the ledger against the configured initial capital to find cash
///
/// Buys debit notional + commission; sells credit notional - commission.
pub fn calculate_cash_from_transactions(ledger: &[Transaction], initial_capital: Cash) -> Cash {
    let mut cash = initial_capital;

    for txn in ledger.iter().filter(|t| t.is_completed()) {
        if txn.is_buy() {
            cash -= txn.total_cost();
        } else {
            cash += txn.net_proceeds();
        }
    }

    cash
}
