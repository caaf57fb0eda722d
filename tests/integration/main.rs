//! End-to-end tests for the arbitrage engine public API.
//!
//! Run with: cargo test --test integration

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use surebet::arbitrage::{
    apply_bookmaker_limits, classify_opportunity, estimate_urgency, evaluate_batch,
    evaluate_market, evaluate_market_with_limits, scan_events, EvaluationRequest, LimitBound,
    Quality, RiskLevel, UrgencyLevel,
};
use surebet::bookmaker::{BookmakerCatalog, BookmakerLimits};
use surebet::market::{select_best_odds, BookmakerId, BookmakerOffer, EventOdds, MarketKind, Outcome};
use surebet::EngineError;

fn two_way(o1: Decimal, o2: Decimal) -> Vec<Outcome> {
    vec![
        Outcome::new(o1, "bookmaker1", "Home"),
        Outcome::new(o2, "bookmaker2", "Away"),
    ]
}

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

/// Odds pairs from 1.01 to ~5.0 in 0.07 steps.
fn odds_grid() -> Vec<Decimal> {
    (0..57).map(|i| dec!(1.01) + Decimal::new(7, 2) * Decimal::from(i)).collect()
}

#[test]
fn scenario_a_two_way_arbitrage() {
    let result = evaluate_market(&two_way(dec!(2.10), dec!(2.05)), dec!(100)).unwrap();

    assert!(result.is_arbitrage);
    assert_close(result.implied_probabilities[0] * dec!(100), dec!(47.62), dec!(0.01));
    assert_close(result.implied_probabilities[1] * dec!(100), dec!(48.78), dec!(0.01));
    assert_close(result.total_implied_probability * dec!(100), dec!(96.40), dec!(0.01));
    assert_close(result.stakes[0], dec!(49.39), dec!(0.01));
    assert_close(result.stakes[1], dec!(50.61), dec!(0.01));
    assert_close(result.guaranteed_profit, dec!(3.73), dec!(0.01));
    assert_close(result.profit_percent, dec!(3.73), dec!(0.01));
}

#[test]
fn scenario_b_no_arbitrage() {
    let result = evaluate_market(&two_way(dec!(1.50), dec!(2.00)), dec!(100)).unwrap();

    assert!(!result.is_arbitrage);
    assert_close(result.total_implied_probability * dec!(100), dec!(116.67), dec!(0.01));
    assert!(result.guaranteed_profit <= Decimal::ZERO);
    assert_eq!(result.quality, Quality::NoArbitrage);
    assert_eq!(result.risk_level, RiskLevel::High);
}

#[test]
fn scenario_c_three_way_no_arbitrage() {
    let outcomes = vec![
        Outcome::new(dec!(2.50), "betano", "Home"),
        Outcome::new(dec!(3.20), "betclic", "Away"),
        Outcome::new(dec!(3.10), "placard", "Draw"),
    ];

    let result = evaluate_market(&outcomes, dec!(300)).unwrap();

    assert_eq!(result.kind, MarketKind::ThreeWay);
    assert!(!result.is_arbitrage);
    assert_close(result.total_implied_probability, dec!(1.0351), dec!(0.0001));
}

#[test]
fn scenario_d_max_stake_clamp() {
    let limits = vec![BookmakerLimits::new("bookmaker1", dec!(0.10), dec!(40)).unwrap()];

    let result =
        evaluate_market_with_limits(&two_way(dec!(2.10), dec!(2.05)), dec!(100), &limits).unwrap();

    assert!(result.is_arbitrage);
    assert_eq!(result.stakes[0], dec!(40));
    assert_close(result.stakes[1], dec!(50.61), dec!(0.01));
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("bookmaker1"));
    assert!(result.warnings[0].contains("maximum"));
    // Clamping does not redistribute, so the guaranteed profit turns negative.
    assert!(result.guaranteed_profit < Decimal::ZERO);
}

#[test]
fn arbitrage_pairs_equalize_payouts() {
    let grid = odds_grid();
    let mut checked = 0;

    for o1 in &grid {
        for o2 in &grid {
            if Decimal::ONE / *o1 + Decimal::ONE / *o2 >= Decimal::ONE {
                continue;
            }
            let result = evaluate_market(&two_way(*o1, *o2), dec!(100)).unwrap();
            assert!(result.is_arbitrage, "{o1}/{o2}");
            assert_close(result.stakes[0] * *o1, result.stakes[1] * *o2, dec!(0.0000001));
            assert!(result.guaranteed_profit > Decimal::ZERO);
            checked += 1;
        }
    }

    assert!(checked > 0);
}

#[test]
fn non_arbitrage_pairs_never_profit() {
    let grid = odds_grid();

    for o1 in &grid {
        for o2 in &grid {
            if Decimal::ONE / *o1 + Decimal::ONE / *o2 < Decimal::ONE {
                continue;
            }
            let result = evaluate_market(&two_way(*o1, *o2), dec!(100)).unwrap();
            assert!(!result.is_arbitrage, "{o1}/{o2}");
            assert!(result.guaranteed_profit <= Decimal::ZERO, "{o1}/{o2}");
        }
    }
}

#[test]
fn stakes_never_exceed_budget() {
    let result = evaluate_market(&two_way(dec!(3.40), dec!(1.55)), dec!(250)).unwrap();

    assert!(result.stakes.iter().all(|s| *s >= Decimal::ZERO));
    assert!(result.total_staked() <= dec!(250) + dec!(0.0000001));
}

#[test]
fn identical_inputs_give_identical_results() {
    let outcomes = two_way(dec!(2.10), dec!(2.05));
    let limits = vec![BookmakerLimits::new("bookmaker1", dec!(1), dec!(40)).unwrap()];

    let first = evaluate_market_with_limits(&outcomes, dec!(100), &limits).unwrap();
    let second = evaluate_market_with_limits(&outcomes, dec!(100), &limits).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn minimum_odd_boundary() {
    assert!(evaluate_market(&two_way(dec!(1.01), dec!(120)), dec!(100)).is_ok());
    assert!(matches!(
        evaluate_market(&two_way(dec!(1.00999), dec!(120)), dec!(100)),
        Err(EngineError::InvalidOdds { index: 0, .. })
    ));
}

#[test]
fn validation_errors_are_typed() {
    assert_eq!(
        evaluate_market(&two_way(dec!(2), dec!(2)), dec!(0)).unwrap_err(),
        EngineError::InvalidStake(dec!(0))
    );
    assert_eq!(
        evaluate_market(&two_way(dec!(2), dec!(2))[..1], dec!(10)).unwrap_err(),
        EngineError::InvalidOutcomeCount(1)
    );

    let bad_limits = vec![BookmakerLimits {
        bookmaker_id: BookmakerId::new("bookmaker1"),
        min_stake: dec!(100),
        max_stake: dec!(1),
    }];
    assert!(matches!(
        apply_bookmaker_limits(&two_way(dec!(2), dec!(2)), &[dec!(50), dec!(50)], &bad_limits),
        Err(EngineError::InvalidLimits { .. })
    ));
}

#[test]
fn minimum_clamp_reports_bound() {
    let limits = vec![BookmakerLimits::new("bookmaker2", dec!(75), dec!(500)).unwrap()];

    let clamped =
        apply_bookmaker_limits(&two_way(dec!(2.10), dec!(2.05)), &[dec!(49.40), dec!(50.60)], &limits)
            .unwrap();

    assert_eq!(clamped.adjustments.len(), 1);
    assert_eq!(clamped.adjustments[0].bound, LimitBound::Minimum);
    assert_eq!(clamped.stakes[1], dec!(75));
    // min(49.40 * 2.10, 75 * 2.05) - 124.40
    assert_eq!(clamped.guaranteed_profit, dec!(103.74) - dec!(124.40));
    // Clamping up to a minimum is not redistributed, so the budget can be exceeded.
    assert_eq!(clamped.stakes.iter().copied().sum::<Decimal>(), dec!(124.40));
}

#[test]
fn wide_odds_and_stakes_stay_exact() {
    let odds = [dec!(1.01), dec!(10), dec!(1000), dec!(1000000), dec!(1000000000)];
    let stakes = [dec!(1), dec!(1000000), dec!(1000000000000)];

    for &o1 in &odds {
        for &o2 in &odds {
            for &stake in &stakes {
                let result = evaluate_market(&two_way(o1, o2), stake).unwrap();
                assert_close(result.total_staked(), stake, stake * dec!(0.000000001));
                if result.is_arbitrage {
                    assert_close(
                        result.payouts[0],
                        result.payouts[1],
                        result.payouts[0] * dec!(0.000000001),
                    );
                }
            }
        }
    }
}

#[test]
fn overflowing_markets_return_typed_errors() {
    let huge = dec!(1000000000000000);

    assert!(matches!(
        evaluate_market(&two_way(huge, huge), huge),
        Err(EngineError::Overflow { .. })
    ));

    let results = evaluate_batch(&[
        EvaluationRequest::new(two_way(huge, huge), huge),
        EvaluationRequest::new(two_way(dec!(2.10), dec!(2.05)), dec!(100)),
    ]);
    assert!(matches!(results[0], Err(EngineError::Overflow { .. })));
    assert!(results[1].is_ok());
}

#[test]
fn classification_tables() {
    assert_eq!(classify_opportunity(dec!(-3)), (Quality::Excellent, RiskLevel::Low));
    assert_eq!(classify_opportunity(dec!(-0.2)), (Quality::Acceptable, RiskLevel::Medium));
    assert_eq!(estimate_urgency(dec!(6)).urgency, UrgencyLevel::Critical);
    assert_eq!(estimate_urgency(dec!(0.8)).window_label, "<10min");
}

#[test]
fn scan_uses_best_odds_across_bookmakers() {
    let events = vec![EventOdds {
        event_id: "evt-42".to_string(),
        home: "Benfica".to_string(),
        away: "Porto".to_string(),
        offers: vec![
            BookmakerOffer {
                bookmaker_id: BookmakerId::new("betano"),
                home_odd: dec!(2.10),
                away_odd: dec!(1.80),
                draw_odd: None,
            },
            BookmakerOffer {
                bookmaker_id: BookmakerId::new("betclic"),
                home_odd: dec!(1.85),
                away_odd: dec!(2.05),
                draw_odd: None,
            },
        ],
    }];

    let best = select_best_odds(&events[0]).unwrap();
    assert_eq!(best[0].bookmaker_id.as_str(), "betano");
    assert_eq!(best[1].bookmaker_id.as_str(), "betclic");

    let found = scan_events(&events, dec!(100), dec!(0.5), BookmakerCatalog::builtin());
    assert_eq!(found.len(), 1);
    assert_close(found[0].result.profit_percent, dec!(3.73), dec!(0.01));
}

#[test]
fn batch_evaluation_is_independent() {
    let requests = vec![
        EvaluationRequest::new(two_way(dec!(2.10), dec!(2.05)), dec!(100)),
        EvaluationRequest::new(two_way(dec!(1.50), dec!(2.00)), dec!(100)),
        EvaluationRequest::new(two_way(dec!(2.10), dec!(2.05)), dec!(-1)),
    ];

    let results = evaluate_batch(&requests);

    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().is_arbitrage);
    assert!(!results[1].as_ref().unwrap().is_arbitrage);
    assert_eq!(results[2], Err(EngineError::InvalidStake(dec!(-1))));
}
