//! Portfolio metrics and risk analytics
//!
//! Everything here is infallible: denominators are zero-guarded and missing
//! data degrades to neutral values, because these functions run after the
//! fact on whatever ledger state exists and must never block rendering a
//! dashboard.

use crate::portfolio::PortfolioSnapshot;
use crate::transaction::Transaction;
use crate::types::{Cash, Percent, Symbol};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Benchmark annual return used for opportunity-cost comparisons (S&P 500)
pub const DEFAULT_BENCHMARK_RETURN_PCT: f64 = 10.0;

/// Risk-free rate used in Sharpe calculations
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// P&L of a single holding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetPnl {
    pub absolute: Cash,
    /// Relative to cost basis (0 when the basis is 0)
    pub percentage: Percent,
}

/// Core educational metrics over a portfolio snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_return_pct: Percent,
    pub total_pnl: Cash,
    /// Each holding's share of total portfolio value, in percent
    pub concentration: HashMap<Symbol, Percent>,
    /// 1 = evenly spread, 0 = fully concentrated.
    ///
    /// Zero holdings score 1.0 here (nothing to concentrate) while the risk
    /// profile scores the same portfolio as maximally risky; the two
    /// heuristics are independent by design.
    pub diversification_score: f64,
    pub pnl_by_asset: HashMap<Symbol, AssetPnl>,
    pub num_holdings: usize,
}

/// Compute return, concentration, and per-asset P&L for a snapshot
pub fn calculate_portfolio_metrics(
    portfolio: &PortfolioSnapshot,
    initial_capital: Cash,
) -> PortfolioMetrics {
    let total_pnl = portfolio.total_portfolio_value - initial_capital;
    let total_return_pct = if initial_capital > 0.0 {
        total_pnl / initial_capital * 100.0
    } else {
        0.0
    };

    let mut concentration = HashMap::new();
    let mut pnl_by_asset = HashMap::new();

    for (symbol, holding) in &portfolio.holdings {
        let weight = if portfolio.total_portfolio_value > 0.0 {
            holding.current_value / portfolio.total_portfolio_value * 100.0
        } else {
            0.0
        };
        concentration.insert(symbol.clone(), weight);

        let absolute = holding.current_value - holding.cost_basis;
        let percentage = if holding.cost_basis > 0.0 {
            absolute / holding.cost_basis * 100.0
        } else {
            0.0
        };
        pnl_by_asset.insert(symbol.clone(), AssetPnl { absolute, percentage });
    }

    let diversification_score = match concentration.len() {
        0 => 1.0,
        1 => 0.0,
        _ => {
            let weights: Vec<f64> = concentration.values().copied().collect();
            let variance = weights.as_slice().population_variance();
            (1.0 - variance / (100.0 * 100.0)).clamp(0.0, 1.0)
        }
    };

    PortfolioMetrics {
        total_return_pct,
        total_pnl,
        concentration,
        diversification_score,
        pnl_by_asset,
        num_holdings: portfolio.holdings.len(),
    }
}

/// Cash-allocation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationScore {
    Good,
    Warning,
    Critical,
}

/// Health of the cash/invested split against the initial capital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationHealth {
    pub cash_pct: Percent,
    pub invested_pct: Percent,
    pub cash_allocation_score: AllocationScore,
    pub invested_value: Cash,
}

/// Classify the cash-to-capital ratio into fixed bands
///
/// 20-30% cash is considered healthy, 10-20% or 30-50% borderline, anything
/// else critical. A fixed-band heuristic, not a statistical model.
pub fn calculate_allocation_health(
    portfolio: &PortfolioSnapshot,
    initial_capital: Cash,
) -> AllocationHealth {
    if initial_capital <= 0.0 {
        return AllocationHealth {
            cash_pct: 100.0,
            invested_pct: 0.0,
            cash_allocation_score: AllocationScore::Good,
            invested_value: 0.0,
        };
    }

    let cash_pct = portfolio.cash_available / initial_capital * 100.0;
    let invested_value = portfolio.total_invested;
    let invested_pct = invested_value / initial_capital * 100.0;

    let score = if (20.0..=30.0).contains(&cash_pct) {
        AllocationScore::Good
    } else if (10.0..20.0).contains(&cash_pct) || (30.0..=50.0).contains(&cash_pct) {
        AllocationScore::Warning
    } else {
        AllocationScore::Critical
    };

    AllocationHealth {
        cash_pct,
        invested_pct,
        cash_allocation_score: score,
        invested_value,
    }
}

/// Overall risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Simplified portfolio risk profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_level: RiskLevel,
    /// 0-100; zero holdings score 100 (nothing invested is maximally
    /// concentrated), the opposite of the diversification score's treatment
    pub concentration_risk: f64,
    /// 0-100, banded by holding count
    pub diversification_risk: f64,
    /// Weighted 60/40 from the two components
    pub overall_risk_score: f64,
    pub num_holdings: usize,
    pub explanation: String,
}

/// Combine concentration and holding-count heuristics into a risk score
pub fn calculate_risk_profile(
    _portfolio: &PortfolioSnapshot,
    metrics: &PortfolioMetrics,
) -> RiskProfile {
    let concentration = &metrics.concentration;
    let num_holdings = concentration.len();

    let concentration_risk = match num_holdings {
        0 | 1 => 100.0,
        _ => {
            let mut weights: Vec<f64> = concentration.values().copied().collect();
            weights.sort_by(|a, b| b.partial_cmp(a).unwrap());
            let top_3_weight: f64 = weights.iter().take(3).sum();
            // 33% across the top three is treated as diversified; the excess
            // scales 1.5x into the documented 0-100 band
            ((top_3_weight - 33.0) * 1.5).clamp(0.0, 100.0)
        }
    };

    let diversification_risk = if num_holdings < 3 {
        80.0
    } else if num_holdings < 5 {
        50.0
    } else if num_holdings < 10 {
        20.0
    } else {
        0.0
    };

    let overall_risk_score = concentration_risk * 0.6 + diversification_risk * 0.4;

    let risk_level = if overall_risk_score < 30.0 {
        RiskLevel::Low
    } else if overall_risk_score < 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    let mut explanations = Vec::new();
    if concentration_risk > 50.0 {
        if let Some((top_symbol, top_weight)) = concentration
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        {
            explanations.push(format!(
                "Your portfolio depends heavily on {} ({:.1}%)",
                top_symbol, top_weight
            ));
        } else {
            explanations.push("You have no open positions".to_string());
        }
    }
    if diversification_risk > 50.0 {
        explanations.push(format!(
            "You hold only {} asset(s). Spread your capital wider.",
            num_holdings
        ));
    }
    if explanations.is_empty() {
        explanations.push("Your portfolio has a good risk balance.".to_string());
    }

    RiskProfile {
        risk_level,
        concentration_risk,
        diversification_risk,
        overall_risk_score,
        num_holdings,
        explanation: explanations.join(" "),
    }
}

/// Benchmark comparison verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchmarkAssessment {
    Outperforming,
    AtPar,
    Underperforming,
}

/// Return vs. a fixed benchmark rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityCost {
    pub user_return_pct: Percent,
    pub benchmark_return_pct: Percent,
    pub outperformance: Percent,
    /// Dollar difference vs. holding the benchmark instead
    pub opportunity_cost: Cash,
    pub assessment: BenchmarkAssessment,
}

/// Compare realized return against a benchmark rate
///
/// The assessment flips at +/-2 percentage points of outperformance.
pub fn calculate_opportunity_cost(
    metrics: &PortfolioMetrics,
    initial_capital: Cash,
    benchmark_return_pct: Percent,
) -> OpportunityCost {
    let user_return_pct = metrics.total_return_pct;
    let outperformance = user_return_pct - benchmark_return_pct;

    let user_value = initial_capital * (1.0 + user_return_pct / 100.0);
    let benchmark_value = initial_capital * (1.0 + benchmark_return_pct / 100.0);
    let opportunity_cost = user_value - benchmark_value;

    let assessment = if outperformance > 2.0 {
        BenchmarkAssessment::Outperforming
    } else if outperformance < -2.0 {
        BenchmarkAssessment::Underperforming
    } else {
        BenchmarkAssessment::AtPar
    };

    OpportunityCost {
        user_return_pct,
        benchmark_return_pct,
        outperformance,
        opportunity_cost,
        assessment,
    }
}

/// Peak-to-trough decline over a value series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawdown {
    pub max_drawdown_pct: Percent,
    pub max_drawdown_value: Cash,
    pub peak_value: Cash,
    pub trough_value: Cash,
}

/// Maximum drawdown from the highest peak seen so far
///
/// Fewer than two samples yield a zero drawdown with peak = first value and
/// trough = last.
pub fn calculate_drawdown(portfolio_values: &[f64]) -> Drawdown {
    if portfolio_values.len() < 2 {
        return Drawdown {
            max_drawdown_pct: 0.0,
            max_drawdown_value: 0.0,
            peak_value: portfolio_values.first().copied().unwrap_or(0.0),
            trough_value: portfolio_values.last().copied().unwrap_or(0.0),
        };
    }

    let mut peak = portfolio_values[0];
    let mut max_dd = 0.0;
    let mut dd_peak = peak;
    let mut dd_trough = peak;

    for &value in &portfolio_values[1..] {
        if value > peak {
            peak = value;
        }

        let dd = if peak > 0.0 { (peak - value) / peak } else { 0.0 };
        if dd > max_dd {
            max_dd = dd;
            dd_peak = peak;
            dd_trough = value;
        }
    }

    Drawdown {
        max_drawdown_pct: max_dd * 100.0,
        max_drawdown_value: dd_peak - dd_trough,
        peak_value: dd_peak,
        trough_value: dd_trough,
    }
}

/// Population standard deviation of a return series, as a percentage
pub fn calculate_volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    returns.population_std_dev() * 100.0
}

/// Simplified Sharpe ratio: `(mean - risk_free) / volatility`
///
/// Empty input or zero volatility yields 0.
pub fn calculate_sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let mean_return = returns.mean();
    let volatility = calculate_volatility(returns);

    if volatility == 0.0 {
        return 0.0;
    }

    (mean_return - risk_free_rate) / volatility
}

/// Risk block of the advanced metrics payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub max_drawdown_pct: Percent,
    pub volatility_pct: Percent,
    pub sharpe_ratio: f64,
}

/// Performance block of the advanced metrics payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_return_pct: Percent,
    pub monthly_return_pct: Percent,
    pub num_trades: usize,
    pub win_rate_pct: Percent,
}

/// Allocation block of the advanced metrics payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationMetrics {
    pub num_holdings: usize,
    pub largest_position_pct: Percent,
    pub avg_position_size_pct: Percent,
}

/// Combined advanced metrics for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    pub risk: RiskMetrics,
    pub performance: PerformanceSummary,
    pub allocation: AllocationMetrics,
}

/// Assemble the advanced dashboard metrics
///
/// Until real daily history is wired in, the return series is the single
/// current return and the drawdown is measured against an assumed peak 10%
/// above the initial capital, so volatility and Sharpe are degenerate by
/// construction. The win-rate counts every completed sell as a win, pending
/// realized-P&L attribution.
pub fn calculate_advanced_metrics(
    portfolio: &PortfolioSnapshot,
    metrics: &PortfolioMetrics,
    initial_capital: Cash,
    ledger: &[Transaction],
) -> AdvancedMetrics {
    let current_return = metrics.total_return_pct / 100.0;
    let returns = [current_return];

    let peak_value = initial_capital * 1.1;
    let max_drawdown_pct = if peak_value > 0.0 {
        ((peak_value - portfolio.total_portfolio_value) / peak_value * 100.0).max(0.0)
    } else {
        0.0
    };

    let volatility_pct = calculate_volatility(&returns);
    let sharpe_ratio = calculate_sharpe_ratio(&returns, DEFAULT_RISK_FREE_RATE);

    let num_trades = ledger.iter().filter(|t| t.is_completed()).count();
    let total_sells = ledger
        .iter()
        .filter(|t| t.is_completed() && t.is_sell())
        .count();
    let winning = ledger
        .iter()
        .filter(|t| t.is_completed() && t.is_sell() && t.total_cost() > 0.0)
        .count();
    let win_rate_pct = if total_sells == 0 {
        0.0
    } else {
        winning as f64 / total_sells as f64 * 100.0
    };

    let largest_position_pct = metrics
        .concentration
        .values()
        .copied()
        .fold(0.0_f64, f64::max);
    let avg_position_size_pct = if metrics.concentration.is_empty() {
        0.0
    } else {
        metrics.concentration.values().sum::<f64>() / metrics.concentration.len() as f64
    };

    AdvancedMetrics {
        risk: RiskMetrics {
            max_drawdown_pct,
            volatility_pct,
            sharpe_ratio,
        },
        performance: PerformanceSummary {
            total_return_pct: metrics.total_return_pct,
            monthly_return_pct: metrics.total_return_pct / 3.0,
            num_trades,
            win_rate_pct,
        },
        allocation: AllocationMetrics {
            num_holdings: metrics.concentration.len(),
            largest_position_pct,
            avg_position_size_pct,
        },
    }
}
