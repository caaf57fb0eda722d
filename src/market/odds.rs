//! Best-price selection across bookmaker offers.

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::types::{BookmakerId, EventOdds, Outcome};
use crate::error::EngineError;

/// Label given to the draw outcome of a three-way market.
pub const DRAW_LABEL: &str = "Draw";

/// Best odd seen so far for one outcome.
#[derive(Debug, Clone)]
struct BestPrice {
    odd: Decimal,
    bookmaker_id: BookmakerId,
}

impl BestPrice {
    fn offer(slot: &mut Option<BestPrice>, odd: Decimal, bookmaker_id: &BookmakerId) {
        // Strictly greater, so ties keep the first offer seen.
        let better = match slot {
            Some(best) => odd > best.odd,
            None => true,
        };
        if better {
            *slot = Some(BestPrice {
                odd,
                bookmaker_id: bookmaker_id.clone(),
            });
        }
    }

    fn into_outcome(self, label: &str) -> Outcome {
        Outcome {
            odd: self.odd,
            bookmaker_id: self.bookmaker_id,
            label: label.to_string(),
        }
    }
}

/// Pick the highest odd for every outcome of an event.
///
/// Returns home, away and, when any bookmaker quotes one, draw. Odds are not
/// validated here; [`crate::arbitrage::evaluate_market`] does that.
#[instrument(skip(event), fields(event = %event.event_id, offers = event.offers.len()))]
pub fn select_best_odds(event: &EventOdds) -> Result<Vec<Outcome>, EngineError> {
    let mut home: Option<BestPrice> = None;
    let mut away: Option<BestPrice> = None;
    let mut draw: Option<BestPrice> = None;

    for offer in &event.offers {
        BestPrice::offer(&mut home, offer.home_odd, &offer.bookmaker_id);
        BestPrice::offer(&mut away, offer.away_odd, &offer.bookmaker_id);
        if let Some(draw_odd) = offer.draw_odd {
            BestPrice::offer(&mut draw, draw_odd, &offer.bookmaker_id);
        }
    }

    let (Some(home), Some(away)) = (home, away) else {
        return Err(EngineError::NoOffers {
            event_id: event.event_id.clone(),
        });
    };

    let mut outcomes = vec![home.into_outcome(&event.home), away.into_outcome(&event.away)];
    if let Some(draw) = draw {
        outcomes.push(draw.into_outcome(DRAW_LABEL));
    }

    debug!(outcomes = outcomes.len(), "Selected best odds");
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::BookmakerOffer;
    use rust_decimal_macros::dec;

    fn offer(bookmaker: &str, home: Decimal, away: Decimal, draw: Option<Decimal>) -> BookmakerOffer {
        BookmakerOffer {
            bookmaker_id: BookmakerId::new(bookmaker),
            home_odd: home,
            away_odd: away,
            draw_odd: draw,
        }
    }

    fn event(offers: Vec<BookmakerOffer>) -> EventOdds {
        EventOdds {
            event_id: "evt-1".to_string(),
            home: "Benfica".to_string(),
            away: "Porto".to_string(),
            offers,
        }
    }

    #[test]
    fn picks_best_price_per_outcome() {
        let event = event(vec![
            offer("betano", dec!(2.10), dec!(1.90), None),
            offer("betclic", dec!(1.95), dec!(2.05), None),
        ]);

        let outcomes = select_best_odds(&event).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].odd, dec!(2.10));
        assert_eq!(outcomes[0].bookmaker_id.as_str(), "betano");
        assert_eq!(outcomes[0].label, "Benfica");
        assert_eq!(outcomes[1].odd, dec!(2.05));
        assert_eq!(outcomes[1].bookmaker_id.as_str(), "betclic");
    }

    #[test]
    fn any_draw_quote_makes_three_way_market() {
        let event = event(vec![
            offer("betano", dec!(2.50), dec!(3.20), None),
            offer("placard", dec!(2.40), dec!(3.00), Some(dec!(3.10))),
        ]);

        let outcomes = select_best_odds(&event).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[2].label, DRAW_LABEL);
        assert_eq!(outcomes[2].bookmaker_id.as_str(), "placard");
    }

    #[test]
    fn ties_keep_first_offer() {
        let event = event(vec![
            offer("betano", dec!(2.00), dec!(2.00), None),
            offer("betclic", dec!(2.00), dec!(2.00), None),
        ]);

        let outcomes = select_best_odds(&event).unwrap();

        assert_eq!(outcomes[0].bookmaker_id.as_str(), "betano");
        assert_eq!(outcomes[1].bookmaker_id.as_str(), "betano");
    }

    #[test]
    fn empty_offers_rejected() {
        let err = select_best_odds(&event(vec![])).unwrap_err();
        assert_eq!(
            err,
            EngineError::NoOffers {
                event_id: "evt-1".to_string()
            }
        );
    }
}
