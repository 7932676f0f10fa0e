//! Validator and replay invariants under randomized inputs

use chrono::{Duration, Utc};
use hashbrown::HashMap;
use proptest::prelude::*;
use simvest::orders::{validate_buy_order, validate_sell_order, BuySizing};
use simvest::portfolio::calculate_portfolio_from_transactions;
use simvest::prelude::*;

proptest! {
    /// Commission is additive on buys: notional never exceeds total cost,
    /// and the difference is exactly the commission.
    #[test]
    fn buy_commission_is_additive(
        quantity in 0.01_f64..1000.0,
        price in 0.01_f64..10_000.0,
        rate in 0.0_f64..0.05,
    ) {
        let capital = quantity * price * 2.0;
        if let Ok((final_quantity, total_cost)) =
            validate_buy_order(BuySizing::Units(quantity), capital, price, rate, 1.0)
        {
            let notional = final_quantity * price;
            prop_assert!(notional <= total_cost + 1e-9);
            prop_assert!((total_cost - notional - notional * rate).abs() < 1e-6);
        }
    }

    /// Commission is subtractive on sells.
    #[test]
    fn sell_commission_is_subtractive(
        quantity in 0.01_f64..1000.0,
        price in 1.0_f64..10_000.0,
        rate in 0.0_f64..0.05,
    ) {
        if let Ok((sold, net)) =
            validate_sell_order(quantity, quantity, price, rate, 1.0)
        {
            let notional = sold * price;
            prop_assert!((net - (notional - notional * rate)).abs() < 1e-6);
        }
    }

    /// Any positive oversell amount is rejected with InsufficientHoldings.
    #[test]
    fn oversell_always_rejected(
        available in 0.0_f64..1000.0,
        excess in 0.001_f64..1000.0,
        price in 1.0_f64..10_000.0,
    ) {
        let result = validate_sell_order(available + excess, available, price, 0.0005, 0.0);
        let is_insufficient_holdings =
            matches!(result, Err(SimulationError::InsufficientHoldings { .. }));
        prop_assert!(is_insufficient_holdings);
    }

    /// Any order costing more than the available capital is rejected.
    #[test]
    fn unaffordable_buy_always_rejected(
        quantity in 0.01_f64..1000.0,
        price in 0.01_f64..10_000.0,
        shortfall in 0.001_f64..0.999,
    ) {
        let total_cost = quantity * price * 1.0005;
        let capital = total_cost * shortfall;
        let result =
            validate_buy_order(BuySizing::Units(quantity), capital, price, 0.0005, 0.0);
        let is_insufficient_capital =
            matches!(result, Err(SimulationError::InsufficientCapital { .. }));
        prop_assert!(is_insufficient_capital);
    }

    /// A ledger that fully closes every position leaves no holdings, at any
    /// prices.
    #[test]
    fn closed_ledger_has_no_holdings(
        quantity in 0.01_f64..1000.0,
        buy_price in 1.0_f64..1000.0,
        sell_price in 1.0_f64..1000.0,
    ) {
        let start = Utc::now();
        let ledger = vec![
            Transaction::new(1, "AAPL", TransactionType::Buy, quantity, buy_price,
                quantity * buy_price * 0.0005, start),
            Transaction::new(1, "AAPL", TransactionType::Sell, quantity, sell_price,
                quantity * sell_price * 0.0005, start + Duration::seconds(60)),
        ];
        let prices: HashMap<String, f64> = HashMap::new();

        let snapshot = calculate_portfolio_from_transactions(&ledger, &prices, 1_000_000.0);
        prop_assert!(snapshot.holdings.is_empty());
    }

    /// Replay is order-insensitive: shuffling ledger storage order never
    /// changes the reconstructed state because replay sorts by timestamp.
    #[test]
    fn replay_is_storage_order_insensitive(
        q1 in 1.0_f64..100.0,
        q2 in 1.0_f64..100.0,
        sell_fraction in 0.1_f64..0.9,
        p1 in 10.0_f64..500.0,
        p2 in 10.0_f64..500.0,
    ) {
        let start = Utc::now();
        let sell_quantity = (q1 + q2) * sell_fraction;
        let forward = vec![
            Transaction::new(1, "AAPL", TransactionType::Buy, q1, p1, 0.0, start),
            Transaction::new(1, "AAPL", TransactionType::Buy, q2, p2, 0.0,
                start + Duration::seconds(60)),
            Transaction::new(1, "AAPL", TransactionType::Sell, sell_quantity, p2, 0.0,
                start + Duration::seconds(120)),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let prices: HashMap<String, f64> =
            [("AAPL".to_string(), p2)].into_iter().collect();

        let a = calculate_portfolio_from_transactions(&forward, &prices, 100_000.0);
        let b = calculate_portfolio_from_transactions(&reversed, &prices, 100_000.0);

        prop_assert!((a.cash_available - b.cash_available).abs() < 1e-9);
        prop_assert_eq!(a.holdings.len(), b.holdings.len());
        for (symbol, holding) in &a.holdings {
            let other = &b.holdings[symbol];
            prop_assert!((holding.quantity - other.quantity).abs() < 1e-9);
            prop_assert!((holding.cost_basis - other.cost_basis).abs() < 1e-9);
        }
    }

    /// Metrics never panic and stay in range for arbitrary ledgers.
    #[test]
    fn metrics_are_total(
        quantity in 0.01_f64..100.0,
        price in 1.0_f64..1000.0,
        current in 0.0_f64..1000.0,
        initial_capital in 0.0_f64..100_000.0,
    ) {
        let ledger = vec![Transaction::new(
            1, "AAPL", TransactionType::Buy, quantity, price,
            quantity * price * 0.0005, Utc::now(),
        )];
        let prices: HashMap<String, f64> =
            [("AAPL".to_string(), current)].into_iter().collect();

        let snapshot =
            calculate_portfolio_from_transactions(&ledger, &prices, initial_capital);
        let metrics = calculate_portfolio_metrics(&snapshot, initial_capital);

        prop_assert!((0.0..=1.0).contains(&metrics.diversification_score));
        let risk = calculate_risk_profile(&snapshot, &metrics);
        prop_assert!((0.0..=100.0).contains(&risk.overall_risk_score));
    }
}
