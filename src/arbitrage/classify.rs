//! Opportunity quality, risk, and urgency classification.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Quality of an opportunity by bookmaker margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Quality {
    /// Margin below -2%.
    Excellent,
    /// Margin in [-2%, -1%).
    VeryGood,
    /// Margin in [-1%, -0.5%).
    Good,
    /// Margin in [-0.5%, 0%).
    Acceptable,
    /// Margin of 0% or more.
    NoArbitrage,
}

/// Execution risk of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    /// Wide margin; odds moving will rarely erase it.
    Low,
    /// Thin margin.
    Medium,
    /// No arbitrage.
    High,
}

/// How quickly an opportunity should be acted on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UrgencyLevel {
    /// Profit up to 1%.
    Low,
    /// Profit in (1%, 3%].
    Medium,
    /// Profit in (3%, 5%].
    High,
    /// Profit above 5%.
    Critical,
}

impl UrgencyLevel {
    /// Estimated time before bookmakers correct the price.
    pub fn estimated_window(&self) -> Duration {
        match self {
            UrgencyLevel::Critical => Duration::from_secs(30),
            UrgencyLevel::High => Duration::from_secs(120),
            UrgencyLevel::Medium => Duration::from_secs(300),
            UrgencyLevel::Low => Duration::from_secs(600),
        }
    }

    /// Short label for the estimated window.
    pub fn window_label(&self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "<30s",
            UrgencyLevel::High => "<2min",
            UrgencyLevel::Medium => "<5min",
            UrgencyLevel::Low => "<10min",
        }
    }
}

/// Urgency of an opportunity and the time it is expected to last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UrgencyEstimate {
    /// Urgency level.
    pub urgency: UrgencyLevel,
    /// Estimated window in seconds.
    pub estimated_window_secs: u64,
    /// Display label for the window.
    pub window_label: &'static str,
    /// Priority on a 0-100 scale (`profit_percent * 20`, capped).
    pub priority_score: Decimal,
}

impl UrgencyEstimate {
    /// Estimated window as a duration.
    pub fn estimated_window(&self) -> Duration {
        Duration::from_secs(self.estimated_window_secs)
    }
}

/// Map a bookmaker margin to quality and risk.
///
/// `margin_percent` is `(total_implied_probability - 1) * 100`, so a negative
/// margin means arbitrage.
pub fn classify_opportunity(margin_percent: Decimal) -> (Quality, RiskLevel) {
    if margin_percent < Decimal::new(-2, 0) {
        (Quality::Excellent, RiskLevel::Low)
    } else if margin_percent < Decimal::NEGATIVE_ONE {
        (Quality::VeryGood, RiskLevel::Low)
    } else if margin_percent < Decimal::new(-5, 1) {
        (Quality::Good, RiskLevel::Medium)
    } else if margin_percent < Decimal::ZERO {
        (Quality::Acceptable, RiskLevel::Medium)
    } else {
        (Quality::NoArbitrage, RiskLevel::High)
    }
}

/// Map a profit percentage to urgency.
pub fn estimate_urgency(profit_percent: Decimal) -> UrgencyEstimate {
    let urgency = if profit_percent > Decimal::new(5, 0) {
        UrgencyLevel::Critical
    } else if profit_percent > Decimal::new(3, 0) {
        UrgencyLevel::High
    } else if profit_percent > Decimal::ONE {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    };

    let priority_score = if profit_percent >= Decimal::new(5, 0) {
        Decimal::ONE_HUNDRED
    } else {
        profit_percent * Decimal::new(20, 0)
    };

    UrgencyEstimate {
        urgency,
        estimated_window_secs: urgency.estimated_window().as_secs(),
        window_label: urgency.window_label(),
        priority_score,
    }
}

/// Market efficiency on a 0-100 scale: 100 at zero margin, 0 at ±10%.
pub fn efficiency_score(margin_percent: Decimal) -> Decimal {
    let score = (Decimal::ONE - (margin_percent / Decimal::TEN).abs()) * Decimal::ONE_HUNDRED;
    score.max(Decimal::ZERO)
}
