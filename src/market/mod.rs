//! Market module for two-way and three-way betting events.
//!
//! This module handles:
//! - Outcome and bookmaker identifier types
//! - Event odds as delivered by an external odds source
//! - Best-price selection across bookmakers

pub mod odds;
pub mod types;

pub use odds::{select_best_odds, DRAW_LABEL};
pub use types::{
    BookmakerId, BookmakerOffer, EventOdds, MarketKind, Outcome, PerOutcome, MIN_ODD,
};
