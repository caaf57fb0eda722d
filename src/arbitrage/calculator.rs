//! Implied probability, stake split, and profit calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classify::{classify_opportunity, efficiency_score, estimate_urgency, Quality, RiskLevel, UrgencyLevel};
use crate::error::EngineError;
use crate::market::{MarketKind, Outcome, PerOutcome, MIN_ODD};

/// Odds-only view of a market: probabilities, margin, and quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEfficiency {
    /// Two-way or three-way.
    pub kind: MarketKind,
    /// `1 / odd` per outcome.
    pub implied_probabilities: PerOutcome<Decimal>,
    /// Sum of implied probabilities.
    pub total_implied_probability: Decimal,
    /// Bookmaker overround, `(total - 1) * 100`.
    pub margin_percent: Decimal,
    /// 0-100 efficiency score.
    pub efficiency_score: Decimal,
    /// Opportunity quality.
    pub quality: Quality,
    /// Execution risk.
    pub risk_level: RiskLevel,
    /// Whether the implied probabilities sum below one.
    pub is_arbitrage: bool,
}

/// Outcome of evaluating one market for a total stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageResult {
    /// Two-way or three-way.
    pub kind: MarketKind,
    /// Whether a risk-free profit exists at these odds.
    pub is_arbitrage: bool,
    /// `1 / odd` per outcome.
    pub implied_probabilities: PerOutcome<Decimal>,
    /// Sum of implied probabilities.
    pub total_implied_probability: Decimal,
    /// Bookmaker overround, `(total - 1) * 100`.
    pub margin_percent: Decimal,
    /// Stake per outcome, parallel to the input outcomes.
    pub stakes: PerOutcome<Decimal>,
    /// Gross return per outcome if it wins (`stake * odd`).
    pub payouts: PerOutcome<Decimal>,
    /// Profit whichever outcome wins.
    pub guaranteed_profit: Decimal,
    /// Guaranteed profit as a percentage of the amount staked.
    pub profit_percent: Decimal,
    /// Stake limit violations that forced clamping.
    pub warnings: Vec<String>,
    /// Opportunity quality.
    pub quality: Quality,
    /// Execution risk.
    pub risk_level: RiskLevel,
    /// How quickly the opportunity should be taken.
    pub urgency: UrgencyLevel,
    /// 0-100 efficiency score.
    pub efficiency_score: Decimal,
}

impl ArbitrageResult {
    /// Total amount staked across outcomes.
    pub fn total_staked(&self) -> Decimal {
        self.stakes.iter().copied().sum()
    }
}

/// Validate outcome count and odds, returning the market shape.
pub fn validate_outcomes(outcomes: &[Outcome]) -> Result<MarketKind, EngineError> {
    let kind = MarketKind::from_outcome_count(outcomes.len())
        .ok_or(EngineError::InvalidOutcomeCount(outcomes.len()))?;

    if let Some((index, outcome)) = outcomes.iter().enumerate().find(|(_, o)| o.odd < MIN_ODD) {
        return Err(EngineError::InvalidOdds {
            index,
            odd: outcome.odd,
        });
    }

    Ok(kind)
}

/// Compute implied probabilities, margin, and quality for a set of odds.
pub fn market_efficiency(outcomes: &[Outcome]) -> Result<MarketEfficiency, EngineError> {
    let kind = validate_outcomes(outcomes)?;

    let implied_probabilities: PerOutcome<Decimal> =
        outcomes.iter().map(Outcome::implied_probability).collect();
    let total_implied_probability: Decimal = implied_probabilities.iter().copied().sum();
    let margin_percent = (total_implied_probability - Decimal::ONE) * Decimal::ONE_HUNDRED;
    let (quality, risk_level) = classify_opportunity(margin_percent);

    Ok(MarketEfficiency {
        kind,
        implied_probabilities,
        total_implied_probability,
        margin_percent,
        efficiency_score: efficiency_score(margin_percent),
        quality,
        risk_level,
        is_arbitrage: total_implied_probability < Decimal::ONE,
    })
}

/// Evaluate a market and split `total_stake` so every outcome pays the same.
///
/// `stake[i] = total_stake * p[i] / sum(p)`, which makes `stake[i] * odd[i]`
/// equal to `total_stake / sum(p)` for all outcomes. Without arbitrage the
/// same split is returned for display and the guaranteed profit is not
/// positive.
pub fn evaluate_market(
    outcomes: &[Outcome],
    total_stake: Decimal,
) -> Result<ArbitrageResult, EngineError> {
    let efficiency = market_efficiency(outcomes)?;

    if total_stake <= Decimal::ZERO {
        return Err(EngineError::InvalidStake(total_stake));
    }

    let total = efficiency.total_implied_probability;

    let stakes = efficiency
        .implied_probabilities
        .iter()
        .map(|p| {
            let stake = total_stake.checked_mul(*p).and_then(|s| s.checked_div(total));
            checked(stake, "stake")
        })
        .collect::<Result<PerOutcome<Decimal>, _>>()?;
    let payouts = payouts(outcomes, &stakes)?;

    let guaranteed_profit = checked(
        total_stake
            .checked_mul(Decimal::ONE - total)
            .and_then(|v| v.checked_div(total)),
        "guaranteed profit",
    )?;
    let profit_percent = percent_of(guaranteed_profit, total_stake)?;

    Ok(ArbitrageResult {
        kind: efficiency.kind,
        is_arbitrage: efficiency.is_arbitrage,
        implied_probabilities: efficiency.implied_probabilities,
        total_implied_probability: total,
        margin_percent: efficiency.margin_percent,
        stakes,
        payouts,
        guaranteed_profit,
        profit_percent,
        warnings: Vec::new(),
        quality: efficiency.quality,
        risk_level: efficiency.risk_level,
        urgency: estimate_urgency(profit_percent).urgency,
        efficiency_score: efficiency.efficiency_score,
    })
}

/// Gross return per outcome for the given stakes.
pub(crate) fn payouts(
    outcomes: &[Outcome],
    stakes: &[Decimal],
) -> Result<PerOutcome<Decimal>, EngineError> {
    outcomes
        .iter()
        .zip(stakes)
        .map(|(outcome, stake)| checked(stake.checked_mul(outcome.odd), "payout"))
        .collect()
}

/// `part / whole * 100`.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal, EngineError> {
    checked(
        part.checked_div(whole)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
        "profit percent",
    )
}

pub(crate) fn checked(value: Option<Decimal>, quantity: &'static str) -> Result<Decimal, EngineError> {
    value.ok_or(EngineError::Overflow { quantity })
}
