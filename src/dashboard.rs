//! Dashboard payload assembly
//!
//! One call producing everything the portfolio view renders. The payload is
//! plain data (serde-serializable) so the web layer can hand it straight to
//! a template or JSON endpoint.

use crate::config::SimulationConfig;
use crate::metrics::{
    calculate_advanced_metrics, calculate_allocation_health, calculate_opportunity_cost,
    calculate_portfolio_metrics, calculate_risk_profile, AdvancedMetrics, AllocationHealth,
    OpportunityCost, PortfolioMetrics, RiskProfile, DEFAULT_BENCHMARK_RETURN_PCT,
};
use crate::portfolio::{calculate_portfolio_from_transactions, PortfolioSnapshot};
use crate::prices::PriceSource;
use crate::transaction::Transaction;
use crate::types::{Cash, Percent, Price, Quantity, Symbol};
use serde::{Deserialize, Serialize};

/// One row of the holdings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingDetail {
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub avg_buy_price: Price,
    pub current_price: Price,
    pub current_value: Cash,
    pub cost_basis: Cash,
    pub pnl_absolute: Cash,
    pub pnl_pct: Percent,
    pub weight_pct: Percent,
}

/// Everything the dashboard needs, computed in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub portfolio: PortfolioSnapshot,
    pub metrics: PortfolioMetrics,
    pub advanced_metrics: AdvancedMetrics,
    pub allocation: AllocationHealth,
    pub risk: RiskProfile,
    pub opportunity_cost: OpportunityCost,
    pub holdings_detail: Vec<HoldingDetail>,
}

impl DashboardData {
    /// JSON value for template/endpoint serialization
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("dashboard payload serializes")
    }
}

/// Assemble the full dashboard payload from the ledger and current prices
pub fn generate_dashboard_data<P: PriceSource>(
    ledger: &[Transaction],
    current_prices: &P,
    config: &SimulationConfig,
) -> DashboardData {
    let portfolio =
        calculate_portfolio_from_transactions(ledger, current_prices, config.initial_capital);
    let metrics = calculate_portfolio_metrics(&portfolio, config.initial_capital);
    let advanced_metrics =
        calculate_advanced_metrics(&portfolio, &metrics, config.initial_capital, ledger);
    let allocation = calculate_allocation_health(&portfolio, config.initial_capital);
    let risk = calculate_risk_profile(&portfolio, &metrics);
    let opportunity_cost =
        calculate_opportunity_cost(&metrics, config.initial_capital, DEFAULT_BENCHMARK_RETURN_PCT);

    let mut holdings_detail: Vec<HoldingDetail> = portfolio
        .holdings
        .iter()
        .map(|(symbol, holding)| {
            let pnl = metrics.pnl_by_asset.get(symbol);
            HoldingDetail {
                symbol: symbol.clone(),
                quantity: holding.quantity,
                avg_buy_price: holding.avg_buy_price,
                current_price: current_prices.price(symbol).unwrap_or(0.0),
                current_value: holding.current_value,
                cost_basis: holding.cost_basis,
                pnl_absolute: pnl.map_or(0.0, |p| p.absolute),
                pnl_pct: pnl.map_or(0.0, |p| p.percentage),
                weight_pct: metrics.concentration.get(symbol).copied().unwrap_or(0.0),
            }
        })
        .collect();
    // HashMap iteration order is arbitrary; keep rows stable for rendering
    holdings_detail.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    DashboardData {
        portfolio,
        metrics,
        advanced_metrics,
        allocation,
        risk,
        opportunity_cost,
        holdings_detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;
    use approx::assert_relative_eq;
    use chrono::Utc;
    use hashbrown::HashMap;

    fn ledger() -> Vec<Transaction> {
        vec![
            Transaction::new(1, "AAPL", TransactionType::Buy, 10.0, 150.0, 0.75, Utc::now()),
            Transaction::new(1, "TSLA", TransactionType::Buy, 4.0, 250.0, 0.50, Utc::now()),
        ]
    }

    fn prices() -> HashMap<Symbol, f64> {
        let mut map = HashMap::new();
        map.insert("AAPL".to_string(), 155.0);
        map.insert("TSLA".to_string(), 240.0);
        map
    }

    #[test]
    fn test_dashboard_assembly() {
        let config = SimulationConfig::default();
        let data = generate_dashboard_data(&ledger(), &prices(), &config);

        assert_eq!(data.holdings_detail.len(), 2);
        // Sorted by symbol
        assert_eq!(data.holdings_detail[0].symbol, "AAPL");
        assert_eq!(data.holdings_detail[1].symbol, "TSLA");

        let aapl = &data.holdings_detail[0];
        assert_relative_eq!(aapl.current_price, 155.0);
        assert_relative_eq!(aapl.current_value, 1550.0);
        assert_relative_eq!(aapl.cost_basis, 1500.75);
        assert_relative_eq!(aapl.pnl_absolute, 1550.0 - 1500.75);

        assert_eq!(data.metrics.num_holdings, 2);
        assert_eq!(data.risk.num_holdings, 2);
    }

    #[test]
    fn test_dashboard_empty_ledger() {
        let config = SimulationConfig::default();
        let data = generate_dashboard_data(&[], &prices(), &config);

        assert!(data.holdings_detail.is_empty());
        assert_relative_eq!(data.portfolio.cash_available, config.initial_capital);
        assert_relative_eq!(data.metrics.total_return_pct, 0.0);
    }

    #[test]
    fn test_dashboard_serializes() {
        let config = SimulationConfig::default();
        let data = generate_dashboard_data(&ledger(), &prices(), &config);
        let json = data.to_json();

        assert!(json["portfolio"]["cash_available"].is_number());
        assert!(json["holdings_detail"].as_array().unwrap().len() == 2);
        assert!(json["risk"]["risk_level"].is_string());
    }
}
