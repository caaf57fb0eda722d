//! Unified error types for the arbitrage engine.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::market::BookmakerId;

/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum SurebetError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Bookmaker catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Input validation failures raised by the arbitrage engine.
///
/// Every variant is a synchronous, per-call failure. Nothing here is fatal to
/// the process and no variant is ever coerced into a default value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Decimal odd below the minimum accepted price.
    #[error("invalid odd {odd} for outcome {index}: must be at least 1.01")]
    InvalidOdds {
        /// Position of the offending outcome.
        index: usize,
        /// The rejected odd.
        odd: Decimal,
    },

    /// Total stake is zero or negative.
    #[error("invalid stake {0}: must be greater than zero")]
    InvalidStake(Decimal),

    /// Market does not have two or three outcomes.
    #[error("invalid outcome count {0}: markets must have 2 or 3 outcomes")]
    InvalidOutcomeCount(usize),

    /// Bookmaker limits are inverted or non-positive.
    #[error("invalid limits for {bookmaker}: min {min_stake} / max {max_stake}")]
    InvalidLimits {
        /// Bookmaker the limits belong to.
        bookmaker: BookmakerId,
        /// Minimum stake.
        min_stake: Decimal,
        /// Maximum stake.
        max_stake: Decimal,
    },

    /// Stakes and outcomes are not parallel sequences.
    #[error("stake count {stakes} does not match outcome count {outcomes}")]
    LengthMismatch {
        /// Number of outcomes.
        outcomes: usize,
        /// Number of stakes.
        stakes: usize,
    },

    /// A stake, payout, or profit does not fit in a `Decimal`.
    #[error("arithmetic overflow computing {quantity}")]
    Overflow {
        /// Quantity whose computation overflowed.
        quantity: &'static str,
    },

    /// An event arrived without any bookmaker offers.
    #[error("event {event_id} has no bookmaker offers")]
    NoOffers {
        /// The event identifier.
        event_id: String,
    },
}

/// Bookmaker catalog loading errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read the catalog file.
    #[error("failed to read catalog {path}: {source}")]
    Read {
        /// Path that failed.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Catalog file is not valid JSON.
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        /// Path that failed.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The same bookmaker id appears twice.
    #[error("duplicate bookmaker id {0}")]
    Duplicate(BookmakerId),

    /// A profile carries invalid limits.
    #[error(transparent)]
    InvalidProfile(#[from] EngineError),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, SurebetError>;
