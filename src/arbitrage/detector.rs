//! Arbitrage detection over single requests, batches, and event scans.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::calculator::ArbitrageResult;
use super::limits::evaluate_market_with_limits;
use crate::bookmaker::{BookmakerCatalog, BookmakerLimits};
use crate::error::EngineError;
use crate::market::{select_best_odds, EventOdds, Outcome};
use crate::metrics;

/// One market to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Priced outcomes of the market.
    pub outcomes: Vec<Outcome>,
    /// Amount to split across outcomes.
    pub total_stake: Decimal,
    /// Optional per-bookmaker stake limits.
    #[serde(default)]
    pub limits: Vec<BookmakerLimits>,
}

impl EvaluationRequest {
    /// Create an unconstrained request.
    pub fn new(outcomes: Vec<Outcome>, total_stake: Decimal) -> Self {
        Self {
            outcomes,
            total_stake,
            limits: Vec::new(),
        }
    }

    /// Attach bookmaker limits.
    pub fn with_limits(mut self, limits: Vec<BookmakerLimits>) -> Self {
        self.limits = limits;
        self
    }
}

/// An event whose best odds form an arbitrage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Event identifier from the odds source.
    pub event_id: String,
    /// Home side name.
    pub home: String,
    /// Away side name.
    pub away: String,
    /// Best odd per outcome with its bookmaker.
    pub outcomes: Vec<Outcome>,
    /// Evaluation at the best odds.
    pub result: ArbitrageResult,
}

/// Evaluate one request, recording metrics and logging detections.
#[instrument(skip(request), fields(outcomes = request.outcomes.len(), total_stake = %request.total_stake))]
pub fn evaluate(request: &EvaluationRequest) -> Result<ArbitrageResult, EngineError> {
    let _timer = metrics::timer_evaluation();
    metrics::inc_evaluations();

    let result = evaluate_market_with_limits(&request.outcomes, request.total_stake, &request.limits)
        .map_err(|e| {
            metrics::inc_evaluation_errors();
            debug!(error = %e, "Evaluation rejected");
            e
        })?;

    if result.is_arbitrage {
        metrics::inc_opportunities_detected();
        info!(
            total_implied = %result.total_implied_probability,
            profit = %result.guaranteed_profit,
            profit_pct = %result.profit_percent,
            quality = %result.quality,
            "Arbitrage opportunity detected"
        );
    } else {
        debug!(
            total_implied = %result.total_implied_probability,
            margin_pct = %result.margin_percent,
            "No arbitrage opportunity"
        );
    }

    Ok(result)
}

/// Evaluate independent requests, one result per request in order.
pub fn evaluate_batch(requests: &[EvaluationRequest]) -> Vec<Result<ArbitrageResult, EngineError>> {
    requests.iter().map(evaluate).collect()
}

/// Find arbitrage across events using each event's best odds.
///
/// Events that fail validation are skipped. Results are ordered by profit
/// percentage, highest first.
#[instrument(skip(events, catalog), fields(events = events.len()))]
pub fn scan_events(
    events: &[EventOdds],
    total_stake: Decimal,
    min_profit_percent: Decimal,
    catalog: &BookmakerCatalog,
) -> Vec<Opportunity> {
    let limits = catalog.limits();
    let mut opportunities = Vec::new();

    for event in events {
        let outcomes = match select_best_odds(event) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                warn!(event = %event.event_id, error = %e, "Skipping event");
                continue;
            }
        };

        let request = EvaluationRequest::new(outcomes, total_stake).with_limits(limits.clone());
        let result = match evaluate(&request) {
            Ok(result) => result,
            Err(e) => {
                warn!(event = %event.event_id, error = %e, "Skipping event");
                continue;
            }
        };

        if result.is_arbitrage && result.profit_percent >= min_profit_percent {
            opportunities.push(Opportunity {
                event_id: event.event_id.clone(),
                home: event.home.clone(),
                away: event.away.clone(),
                outcomes: request.outcomes,
                result,
            });
        }
    }

    opportunities.sort_by(|a, b| b.result.profit_percent.cmp(&a.result.profit_percent));
    info!(found = opportunities.len(), "Event scan complete");
    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{BookmakerId, BookmakerOffer};
    use rust_decimal_macros::dec;

    fn offer(bookmaker: &str, home: Decimal, away: Decimal, draw: Option<Decimal>) -> BookmakerOffer {
        BookmakerOffer {
            bookmaker_id: BookmakerId::new(bookmaker),
            home_odd: home,
            away_odd: away,
            draw_odd: draw,
        }
    }

    fn event(id: &str, offers: Vec<BookmakerOffer>) -> EventOdds {
        EventOdds {
            event_id: id.to_string(),
            home: "Sporting".to_string(),
            away: "Braga".to_string(),
            offers,
        }
    }

    #[test]
    fn batch_preserves_order_and_errors() {
        let good = EvaluationRequest::new(
            vec![
                Outcome::new(dec!(2.10), "betano", "Home"),
                Outcome::new(dec!(2.05), "betclic", "Away"),
            ],
            dec!(100),
        );
        let bad = EvaluationRequest::new(vec![Outcome::new(dec!(2.10), "betano", "Home")], dec!(100));

        let results = evaluate_batch(&[good.clone(), bad, good]);

        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap().is_arbitrage);
        assert_eq!(results[1], Err(EngineError::InvalidOutcomeCount(1)));
        assert_eq!(results[0], results[2]);
    }

    #[test]
    fn scan_filters_and_sorts_by_profit() {
        let events = vec![
            // ~3.7% profit
            event("small", vec![
                offer("betano", dec!(2.10), dec!(1.90), None),
                offer("betclic", dec!(1.90), dec!(2.05), None),
            ]),
            // no arbitrage
            event("none", vec![offer("betano", dec!(1.50), dec!(2.00), None)]),
            // ~13.7% profit
            event("large", vec![
                offer("placard", dec!(2.30), dec!(1.80), None),
                offer("888starz", dec!(1.80), dec!(2.25), None),
            ]),
            // invalid: no offers
            event("empty", vec![]),
        ];

        let found = scan_events(&events, dec!(100), dec!(0.5), BookmakerCatalog::builtin());

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].event_id, "large");
        assert_eq!(found[1].event_id, "small");
        assert!(found[0].result.profit_percent > found[1].result.profit_percent);
    }

    #[test]
    fn scan_respects_min_profit() {
        let events = vec![event("small", vec![
            offer("betano", dec!(2.10), dec!(1.90), None),
            offer("betclic", dec!(1.90), dec!(2.05), None),
        ])];

        let found = scan_events(&events, dec!(100), dec!(5), BookmakerCatalog::builtin());

        assert!(found.is_empty());
    }

    #[test]
    fn scan_applies_catalog_limits() {
        let events = vec![event("capped", vec![
            offer("placard", dec!(2.30), dec!(1.80), None),
            offer("888starz", dec!(1.80), dec!(2.25), None),
        ])];

        // Placard caps stakes at 5000; the optimal split puts ~5934 there.
        let found = scan_events(&events, dec!(12000), dec!(-100), BookmakerCatalog::builtin());

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].result.stakes[0], dec!(5000));
        assert_eq!(found[0].result.warnings.len(), 1);
    }

    #[test]
    fn scan_skips_events_that_overflow() {
        let events = vec![
            event("huge", vec![
                offer("exchange-a", dec!(1000000000000000), dec!(1.01), None),
                offer("exchange-b", dec!(1.01), dec!(1000000000000000), None),
            ]),
            event("small", vec![
                offer("betano", dec!(2.10), dec!(1.90), None),
                offer("betclic", dec!(1.90), dec!(2.05), None),
            ]),
        ];

        let found = scan_events(&events, dec!(1000000000000000), dec!(-100), BookmakerCatalog::builtin());

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].event_id, "small");
    }
}
