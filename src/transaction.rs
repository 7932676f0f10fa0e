//! Transaction - the append-only ledger record
//!
//! A Transaction is created after an order validates and is persisted by the
//! surrounding store. The ledger of transactions is the sole source of truth
//! for portfolio state; records are never mutated or deleted.

use crate::types::{Cash, Price, Quantity, Symbol, Timestamp, TransactionId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Buy,
    Sell,
}

/// Record status as stored by the ledger
///
/// Only completed rows participate in replay; cancelled rows are kept for
/// audit but skipped by every calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Completed,
    Cancelled,
}

/// An executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID
    pub id: TransactionId,
    /// Owning user
    pub user_id: UserId,
    /// Asset ticker
    pub symbol: Symbol,
    /// Buy or sell
    pub kind: TransactionType,
    /// Units traded (always positive)
    pub quantity: Quantity,
    /// Execution price per unit
    pub price_per_unit: Price,
    /// Notional before commission (quantity * price)
    pub total_amount: Cash,
    /// Commission charged on this trade
    pub commission_amount: Cash,
    /// Execution timestamp
    pub timestamp: Timestamp,
    /// Record status
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn new(
        user_id: UserId,
        symbol: impl Into<Symbol>,
        kind: TransactionType,
        quantity: Quantity,
        price_per_unit: Price,
        commission_amount: Cash,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            symbol: symbol.into(),
            kind,
            quantity,
            price_per_unit,
            total_amount: quantity * price_per_unit,
            commission_amount,
            timestamp,
            status: TransactionStatus::Completed,
        }
    }

    /// Total cash that left the account on a buy (notional + commission)
    ///
    /// For sells this still reports notional + commission; use
    /// [`net_proceeds`](Self::net_proceeds) for the cash credited back.
    pub fn total_cost(&self) -> Cash {
        self.total_amount + self.commission_amount
    }

    /// Cash credited on a sell (notional - commission)
    pub fn net_proceeds(&self) -> Cash {
        self.total_amount - self.commission_amount
    }

    pub fn is_buy(&self) -> bool {
        matches!(self.kind, TransactionType::Buy)
    }

    pub fn is_sell(&self) -> bool {
        matches!(self.kind, TransactionType::Sell)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, TransactionStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_transaction_creation() {
        let txn = Transaction::new(1, "AAPL", TransactionType::Buy, 10.0, 150.0, 0.75, Utc::now());

        assert_eq!(txn.symbol, "AAPL");
        assert_eq!(txn.quantity, 10.0);
        assert_eq!(txn.total_amount, 1500.0);
        assert_eq!(txn.commission_amount, 0.75);
        assert!(txn.is_buy());
        assert!(!txn.is_sell());
        assert!(txn.is_completed());
    }

    #[test]
    fn test_buy_total_cost() {
        let txn = Transaction::new(1, "AAPL", TransactionType::Buy, 10.0, 150.0, 0.75, Utc::now());
        assert_eq!(txn.total_cost(), 1500.75);
    }

    #[test]
    fn test_sell_net_proceeds() {
        let txn = Transaction::new(1, "AAPL", TransactionType::Sell, 10.0, 160.0, 0.80, Utc::now());
        assert_eq!(txn.total_amount, 1600.0);
        assert_eq!(txn.net_proceeds(), 1599.20);
        assert!(txn.is_sell());
    }

    #[test]
    fn test_unique_ids() {
        let now = Utc::now();
        let a = Transaction::new(1, "AAPL", TransactionType::Buy, 1.0, 100.0, 0.0, now);
        let b = Transaction::new(1, "AAPL", TransactionType::Buy, 1.0, 100.0, 0.0, now);
        assert_ne!(a.id, b.id);
    }
}
