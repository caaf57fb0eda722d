//! Per-bookmaker stake limits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::market::BookmakerId;

/// Stake bounds enforced by one bookmaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmakerLimits {
    /// Bookmaker these limits apply to.
    pub bookmaker_id: BookmakerId,
    /// Smallest accepted stake.
    pub min_stake: Decimal,
    /// Largest accepted stake.
    pub max_stake: Decimal,
}

impl BookmakerLimits {
    /// Create validated limits.
    pub fn new(
        bookmaker_id: impl Into<String>,
        min_stake: Decimal,
        max_stake: Decimal,
    ) -> Result<Self, EngineError> {
        let limits = Self {
            bookmaker_id: BookmakerId::new(bookmaker_id),
            min_stake,
            max_stake,
        };
        limits.validate()?;
        Ok(limits)
    }

    /// Reject non-positive minimums and inverted ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min_stake <= Decimal::ZERO || self.min_stake > self.max_stake {
            return Err(EngineError::InvalidLimits {
                bookmaker: self.bookmaker_id.clone(),
                min_stake: self.min_stake,
                max_stake: self.max_stake,
            });
        }
        Ok(())
    }

    /// Check whether a stake is inside the bounds.
    pub fn contains(&self, stake: Decimal) -> bool {
        stake >= self.min_stake && stake <= self.max_stake
    }
}
