//! Bookmaker stake limit clamping.
//!
//! Each stake is clamped into its bookmaker's `[min_stake, max_stake]`
//! independently. The other stakes are left as computed, so after clamping
//! payouts are no longer equal and the guaranteed profit can drop below the
//! unclamped optimum or turn negative even when `is_arbitrage` is true.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{instrument, warn};

use super::calculator::{checked, evaluate_market, payouts, percent_of, ArbitrageResult};
use super::classify::estimate_urgency;
use crate::bookmaker::BookmakerLimits;
use crate::error::EngineError;
use crate::market::{BookmakerId, Outcome, PerOutcome};
use crate::metrics;

/// Which bound a stake violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LimitBound {
    /// Stake was below the bookmaker minimum.
    Minimum,
    /// Stake was above the bookmaker maximum.
    Maximum,
}

/// A single clamped stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeAdjustment {
    /// Position of the outcome.
    pub index: usize,
    /// Bookmaker whose limit applied.
    pub bookmaker_id: BookmakerId,
    /// Bound that was violated.
    pub bound: LimitBound,
    /// Stake before clamping.
    pub requested: Decimal,
    /// Stake after clamping.
    pub applied: Decimal,
}

impl fmt::Display for StakeAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relation = match self.bound {
            LimitBound::Minimum => "is below the",
            LimitBound::Maximum => "exceeds the",
        };
        write!(
            f,
            "stake {} on {} {} {} stake {}; clamped",
            self.requested.round_dp(2),
            self.bookmaker_id,
            relation,
            self.bound,
            self.applied.round_dp(2),
        )
    }
}

/// Stakes after bookmaker limits were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampedStakes {
    /// Adjusted stake per outcome.
    pub stakes: PerOutcome<Decimal>,
    /// Gross return per outcome for the adjusted stakes.
    pub payouts: PerOutcome<Decimal>,
    /// `min(payouts) - sum(stakes)`.
    pub guaranteed_profit: Decimal,
    /// Guaranteed profit as a percentage of the adjusted total.
    pub profit_percent: Decimal,
    /// One entry per clamped stake.
    pub adjustments: Vec<StakeAdjustment>,
    /// Human-readable form of `adjustments`.
    pub warnings: Vec<String>,
}

/// Clamp each stake into its bookmaker's limits and recompute profit.
///
/// Outcomes whose bookmaker has no entry in `limits` are unconstrained.
#[instrument(skip_all, fields(outcomes = outcomes.len(), limits = limits.len()))]
pub fn apply_bookmaker_limits(
    outcomes: &[Outcome],
    stakes: &[Decimal],
    limits: &[BookmakerLimits],
) -> Result<ClampedStakes, EngineError> {
    if outcomes.len() != stakes.len() {
        return Err(EngineError::LengthMismatch {
            outcomes: outcomes.len(),
            stakes: stakes.len(),
        });
    }
    for limit in limits {
        limit.validate()?;
    }

    let mut adjusted: PerOutcome<Decimal> = PerOutcome::with_capacity(stakes.len());
    let mut adjustments = Vec::new();

    for (index, (outcome, stake)) in outcomes.iter().zip(stakes).enumerate() {
        let limit = limits.iter().find(|l| l.bookmaker_id == outcome.bookmaker_id);

        let clamped = match limit {
            Some(l) if l.contains(*stake) => None,
            Some(l) if *stake < l.min_stake => Some((LimitBound::Minimum, l.min_stake)),
            Some(l) => Some((LimitBound::Maximum, l.max_stake)),
            None => None,
        };

        match clamped {
            Some((bound, applied)) => {
                warn!(
                    bookmaker = %outcome.bookmaker_id,
                    %bound,
                    requested = %stake,
                    applied = %applied,
                    "Stake clamped to bookmaker limit"
                );
                metrics::inc_stakes_clamped();
                adjustments.push(StakeAdjustment {
                    index,
                    bookmaker_id: outcome.bookmaker_id.clone(),
                    bound,
                    requested: *stake,
                    applied,
                });
                adjusted.push(applied);
            }
            None => adjusted.push(*stake),
        }
    }

    let payouts = payouts(outcomes, &adjusted)?;
    let total = checked(
        adjusted
            .iter()
            .try_fold(Decimal::ZERO, |acc, stake| acc.checked_add(*stake)),
        "total stake",
    )?;
    let min_payout = payouts.iter().copied().min().unwrap_or(Decimal::ZERO);
    let guaranteed_profit = checked(min_payout.checked_sub(total), "guaranteed profit")?;
    let profit_percent = if total > Decimal::ZERO {
        percent_of(guaranteed_profit, total)?
    } else {
        Decimal::ZERO
    };

    Ok(ClampedStakes {
        warnings: adjustments.iter().map(ToString::to_string).collect(),
        stakes: adjusted,
        payouts,
        guaranteed_profit,
        profit_percent,
        adjustments,
    })
}

/// Evaluate a market, then clamp the stake split into bookmaker limits.
///
/// Odds-derived fields (`is_arbitrage`, probabilities, margin, quality, risk)
/// come from the unclamped evaluation. Stake-derived fields reflect the
/// clamped stakes. No redistribution happens after clamping.
pub fn evaluate_market_with_limits(
    outcomes: &[Outcome],
    total_stake: Decimal,
    limits: &[BookmakerLimits],
) -> Result<ArbitrageResult, EngineError> {
    let mut result = evaluate_market(outcomes, total_stake)?;
    if limits.is_empty() {
        return Ok(result);
    }

    let clamped = apply_bookmaker_limits(outcomes, &result.stakes, limits)?;
    if clamped.adjustments.is_empty() {
        return Ok(result);
    }

    result.stakes = clamped.stakes;
    result.payouts = clamped.payouts;
    result.guaranteed_profit = clamped.guaranteed_profit;
    result.profit_percent = clamped.profit_percent;
    result.urgency = estimate_urgency(clamped.profit_percent).urgency;
    result.warnings = clamped.warnings;
    Ok(result)
}
