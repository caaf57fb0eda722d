//! Market-related types for two-way and three-way betting markets.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::Display;

/// Minimum decimal odd accepted by the engine.
pub const MIN_ODD: Decimal = Decimal::from_parts(101, 0, 0, false, 2);

/// Per-outcome sequence. Markets have at most three outcomes.
pub type PerOutcome<T> = SmallVec<[T; 3]>;

/// Bookmaker identifier, matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmakerId(String);

impl BookmakerId {
    /// Create a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookmakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for BookmakerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One mutually exclusive outcome of an event, priced by a bookmaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Decimal odd (at least 1.01).
    pub odd: Decimal,
    /// Bookmaker offering the odd.
    pub bookmaker_id: BookmakerId,
    /// Human-readable outcome label.
    pub label: String,
}

impl Outcome {
    /// Create a new outcome.
    pub fn new(odd: Decimal, bookmaker_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            odd,
            bookmaker_id: BookmakerId::new(bookmaker_id),
            label: label.into(),
        }
    }

    /// Implied probability of this outcome (`1 / odd`).
    pub fn implied_probability(&self) -> Decimal {
        Decimal::ONE / self.odd
    }
}

/// Market shape by number of outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MarketKind {
    /// Win/lose market (tennis, basketball).
    TwoWay,
    /// Win/draw/lose market (football).
    ThreeWay,
}

impl MarketKind {
    /// Classify a market by outcome count.
    pub fn from_outcome_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(MarketKind::TwoWay),
            3 => Some(MarketKind::ThreeWay),
            _ => None,
        }
    }
}

/// Prices one bookmaker quotes for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmakerOffer {
    /// Quoting bookmaker.
    pub bookmaker_id: BookmakerId,
    /// Odd for the home side.
    pub home_odd: Decimal,
    /// Odd for the away side.
    pub away_odd: Decimal,
    /// Odd for a draw, when quoted.
    #[serde(default)]
    pub draw_odd: Option<Decimal>,
}

/// All offers collected for one event by an external odds source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOdds {
    /// Event identifier from the odds source.
    pub event_id: String,
    /// Home side name.
    pub home: String,
    /// Away side name.
    pub away: String,
    /// Offers by bookmaker.
    pub offers: Vec<BookmakerOffer>,
}
