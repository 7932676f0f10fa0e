//! Order cost calculation and validation
//!
//! Pure functions: an order either fully validates or is rejected before the
//! caller attempts any state mutation. Commission is a fraction of notional,
//! added to cost on buys and subtracted from proceeds on sells.

use crate::error::{Result, SimulationError};
use crate::types::{Cash, Price, Quantity};
use log::debug;

/// How a buy order is sized
///
/// Exactly one sizing mode per order. The earlier API took two optional
/// parameters and silently preferred the amount path when both were set;
/// the enum makes that state unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuySizing {
    /// Buy a specific number of units
    Units(Quantity),
    /// Spend a specific amount of capital (converted to units at the
    /// execution price)
    Amount(Cash),
}

fn check_trade_params(quantity: Quantity, price_per_unit: Price, commission_rate: f64) -> Result<()> {
    if quantity <= 0.0 {
        return Err(SimulationError::InvalidOperation(
            "quantity must be positive".to_string(),
        ));
    }
    if price_per_unit <= 0.0 {
        return Err(SimulationError::InvalidOperation(
            "price must be positive".to_string(),
        ));
    }
    if commission_rate < 0.0 {
        return Err(SimulationError::InvalidOperation(
            "commission rate cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Cost of a buy before and after commission
///
/// Returns `(notional, commission_amount)`.
pub fn calculate_buy_cost(
    quantity: Quantity,
    price_per_unit: Price,
    commission_rate: f64,
) -> Result<(Cash, Cash)> {
    check_trade_params(quantity, price_per_unit, commission_rate)?;

    let notional = quantity * price_per_unit;
    let commission_amount = notional * commission_rate;

    Ok((notional, commission_amount))
}

/// Proceeds of a sell before commission is deducted
///
/// Returns `(notional, commission_amount)`.
pub fn calculate_sell_proceeds(
    quantity: Quantity,
    price_per_unit: Price,
    commission_rate: f64,
) -> Result<(Cash, Cash)> {
    check_trade_params(quantity, price_per_unit, commission_rate)?;

    let notional = quantity * price_per_unit;
    let commission_amount = notional * commission_rate;

    Ok((notional, commission_amount))
}

/// Validate a buy order and resolve its final size
///
/// Returns `(final_quantity, total_cost)` where total cost includes
/// commission. The minimum-trade check applies only to amount-sized orders;
/// unit-sized orders of any notional are accepted, matching the platform's
/// original behavior.
pub fn validate_buy_order(
    sizing: BuySizing,
    capital_available: Cash,
    price_per_unit: Price,
    commission_rate: f64,
    min_trade_amount: Cash,
) -> Result<(Quantity, Cash)> {
    if price_per_unit <= 0.0 {
        return Err(SimulationError::InvalidOperation(
            "price must be positive".to_string(),
        ));
    }

    let final_quantity = match sizing {
        BuySizing::Amount(amount) => {
            if amount <= 0.0 {
                return Err(SimulationError::InvalidOperation(
                    "amount to invest must be positive".to_string(),
                ));
            }
            if amount < min_trade_amount {
                return Err(SimulationError::InvalidOperation(format!(
                    "minimum trade amount is {:.2}",
                    min_trade_amount
                )));
            }
            amount / price_per_unit
        }
        BuySizing::Units(quantity) => {
            if quantity <= 0.0 {
                return Err(SimulationError::InvalidOperation(
                    "quantity must be positive".to_string(),
                ));
            }
            quantity
        }
    };

    let (notional, commission_amount) =
        calculate_buy_cost(final_quantity, price_per_unit, commission_rate)?;
    let total_cost = notional + commission_amount;

    if total_cost > capital_available {
        debug!(
            "buy rejected: cost {:.2} exceeds capital {:.2}",
            total_cost, capital_available
        );
        return Err(SimulationError::InsufficientCapital {
            required: total_cost,
            available: capital_available,
        });
    }

    Ok((final_quantity, total_cost))
}

/// Validate a sell order
///
/// Returns `(quantity, net_proceeds)` after commission. Oversells are
/// rejected outright; there are no partial fills.
pub fn validate_sell_order(
    quantity_to_sell: Quantity,
    quantity_available: Quantity,
    price_per_unit: Price,
    commission_rate: f64,
    min_trade_amount: Cash,
) -> Result<(Quantity, Cash)> {
    if quantity_to_sell <= 0.0 {
        return Err(SimulationError::InvalidOperation(
            "quantity to sell must be positive".to_string(),
        ));
    }

    if quantity_to_sell > quantity_available {
        debug!(
            "sell rejected: requested {:.4}, holding {:.4}",
            quantity_to_sell, quantity_available
        );
        return Err(SimulationError::InsufficientHoldings {
            requested: quantity_to_sell,
            available: quantity_available,
        });
    }

    if price_per_unit <= 0.0 {
        return Err(SimulationError::InvalidOperation(
            "price must be positive".to_string(),
        ));
    }

    let (notional, commission_amount) =
        calculate_sell_proceeds(quantity_to_sell, price_per_unit, commission_rate)?;

    if notional < min_trade_amount {
        return Err(SimulationError::InvalidOperation(format!(
            "minimum trade amount is {:.2}",
            min_trade_amount
        )));
    }

    let net_proceeds = notional - commission_amount;

    Ok((quantity_to_sell, net_proceeds))
}
