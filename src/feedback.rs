//! Post-trade educational feedback
//!
//! Structured records composed from the metrics layer. Fields hold
//! display-ready segments joined with " | "; the presentation layer splits,
//! translates, or reformats them as it sees fit. This is the engine's only
//! "decision" output beyond raw numbers.

use crate::metrics::{
    calculate_allocation_health, calculate_opportunity_cost, calculate_risk_profile,
    AllocationScore, BenchmarkAssessment, PortfolioMetrics, DEFAULT_BENCHMARK_RETURN_PCT,
};
use crate::portfolio::PortfolioSnapshot;
use crate::types::{Cash, Price, Quantity};
use serde::{Deserialize, Serialize};

/// Feedback returned after a validated buy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyFeedback {
    pub summary: String,
    pub allocation: String,
    pub risk: String,
    pub suggestion: String,
}

/// Feedback returned after a validated sell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellFeedback {
    pub summary: String,
    pub performance: String,
    pub insight: String,
    pub suggestion: String,
}

/// Compose post-buy feedback from allocation and risk analysis
pub fn generate_extended_buy_feedback(
    symbol: &str,
    quantity: Quantity,
    price_per_unit: Price,
    total_cost: Cash,
    commission_amount: Cash,
    portfolio: &PortfolioSnapshot,
    metrics: &PortfolioMetrics,
    initial_capital: Cash,
) -> BuyFeedback {
    let allocation = calculate_allocation_health(portfolio, initial_capital);
    let risk = calculate_risk_profile(portfolio, metrics);

    let summary = format!(
        "Bought {:.4} {} @ ${:.2} | Invested ${:.2} (incl. ${:.2} commission)",
        quantity, symbol, price_per_unit, total_cost, commission_amount
    );

    let mut allocation_lines = vec![
        format!(
            "Invested: {:.1}% (${:.2})",
            allocation.invested_pct, allocation.invested_value
        ),
        format!("Cash available: {:.1}%", allocation.cash_pct),
    ];
    match allocation.cash_allocation_score {
        AllocationScore::Critical => {
            allocation_lines.push("Warning: your cash reserve is very low.".to_string());
        }
        AllocationScore::Warning => {
            allocation_lines.push("Consider keeping 20-30% in cash.".to_string());
        }
        AllocationScore::Good => {}
    }

    let risk_lines = vec![
        format!(
            "Portfolio risk: {}",
            format!("{:?}", risk.risk_level).to_uppercase()
        ),
        format!("Assets held: {}", risk.num_holdings),
        risk.explanation.clone(),
    ];

    let suggestion = if risk.overall_risk_score > 70.0 {
        "Diversify across more assets to reduce market risk.".to_string()
    } else if allocation.invested_pct > 80.0 {
        "Your portfolio is heavily invested. Keep some cash for opportunities.".to_string()
    } else {
        "Stay the course and learn from the results.".to_string()
    };

    BuyFeedback {
        summary,
        allocation: allocation_lines.join(" | "),
        risk: risk_lines.join(" | "),
        suggestion,
    }
}

/// Compose post-sell feedback from realized P&L and benchmark comparison
pub fn generate_extended_sell_feedback(
    symbol: &str,
    quantity: Quantity,
    price_per_unit: Price,
    net_proceeds: Cash,
    commission_amount: Cash,
    portfolio: &PortfolioSnapshot,
    metrics: &PortfolioMetrics,
    initial_capital: Cash,
) -> SellFeedback {
    let asset_pnl = metrics.pnl_by_asset.get(symbol);
    let asset_gain = asset_pnl.map_or(0.0, |p| p.absolute);
    let asset_gain_pct = asset_pnl.map_or(0.0, |p| p.percentage);

    let summary = format!(
        "Sold {:.4} {} @ ${:.2} | Net proceeds ${:.2} (after ${:.2} commission)",
        quantity, symbol, price_per_unit, net_proceeds, commission_amount
    );

    let performance_lines = if asset_gain > 0.0 {
        vec![
            format!("GAIN: ${:.2} (+{:.2}%)", asset_gain, asset_gain_pct),
            "Good exit.".to_string(),
        ]
    } else {
        vec![
            format!("LOSS: ${:.2} ({:.2}%)", asset_gain, asset_gain_pct),
            "Loss taken.".to_string(),
        ]
    };

    let opportunity =
        calculate_opportunity_cost(metrics, initial_capital, DEFAULT_BENCHMARK_RETURN_PCT);
    let mut insight_lines = vec![format!(
        "Total portfolio return: {:.2}%",
        opportunity.user_return_pct
    )];
    match opportunity.assessment {
        BenchmarkAssessment::Outperforming => insight_lines.push(format!(
            "You are beating the benchmark by {:.2}%",
            opportunity.outperformance
        )),
        BenchmarkAssessment::Underperforming => insight_lines.push(format!(
            "You are {:.2}% below the benchmark",
            opportunity.outperformance.abs()
        )),
        BenchmarkAssessment::AtPar => {}
    }

    let allocation = calculate_allocation_health(portfolio, initial_capital);
    let suggestion = if allocation.cash_pct > 40.0 {
        "You are holding a lot of cash. Reinvest if you find good opportunities.".to_string()
    } else {
        "Keep your strongest positions and learn from this trade.".to_string()
    };

    SellFeedback {
        summary,
        performance: performance_lines.join(" | "),
        insight: insight_lines.join(" | "),
        suggestion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::calculate_portfolio_metrics;
    use crate::portfolio::Holding;
    use hashbrown::HashMap;

    fn one_holding_snapshot() -> PortfolioSnapshot {
        let mut holdings = HashMap::new();
        holdings.insert(
            "AAPL".to_string(),
            Holding {
                quantity: 10.0,
                avg_buy_price: 150.075,
                cost_basis: 1500.75,
                current_value: 1600.0,
            },
        );
        PortfolioSnapshot {
            total_capital: 1500.75 + 8499.25,
            total_invested: 1500.75,
            cash_available: 8499.25,
            holdings,
            total_portfolio_value: 1600.0 + 8499.25,
        }
    }

    #[test]
    fn test_buy_feedback_suggests_diversifying() {
        let portfolio = one_holding_snapshot();
        let metrics = calculate_portfolio_metrics(&portfolio, 10_000.0);

        let feedback = generate_extended_buy_feedback(
            "AAPL", 10.0, 150.0, 1500.75, 0.75, &portfolio, &metrics, 10_000.0,
        );

        assert!(feedback.summary.contains("AAPL"));
        assert!(feedback.summary.contains("1500.75"));
        // Single holding: risk score 100*0.6 + 80*0.4 = 92 > 70
        assert!(feedback.suggestion.contains("Diversify"));
        assert!(feedback.risk.contains("HIGH"));
    }

    #[test]
    fn test_buy_feedback_allocation_warning() {
        let portfolio = one_holding_snapshot();
        let metrics = calculate_portfolio_metrics(&portfolio, 10_000.0);

        let feedback = generate_extended_buy_feedback(
            "AAPL", 10.0, 150.0, 1500.75, 0.75, &portfolio, &metrics, 10_000.0,
        );

        // 85% cash is outside every healthy band
        assert!(feedback.allocation.contains("cash reserve is very low")
            || feedback.allocation.contains("Cash available: 85.0%"));
    }

    #[test]
    fn test_sell_feedback_gain() {
        let portfolio = one_holding_snapshot();
        let metrics = calculate_portfolio_metrics(&portfolio, 10_000.0);

        let feedback = generate_extended_sell_feedback(
            "AAPL", 5.0, 160.0, 799.60, 0.40, &portfolio, &metrics, 10_000.0,
        );

        assert!(feedback.performance.contains("GAIN"));
        assert!(feedback.summary.contains("799.60"));
        // 85% cash triggers the reinvest nudge
        assert!(feedback.suggestion.contains("Reinvest"));
    }

    #[test]
    fn test_sell_feedback_unknown_symbol_reports_loss_of_zero() {
        let portfolio = one_holding_snapshot();
        let metrics = calculate_portfolio_metrics(&portfolio, 10_000.0);

        let feedback = generate_extended_sell_feedback(
            "TSLA", 1.0, 250.0, 249.88, 0.12, &portfolio, &metrics, 10_000.0,
        );

        // No P&L entry for the symbol: neutral zero framed as a loss line
        assert!(feedback.performance.contains("$0.00"));
    }
}
