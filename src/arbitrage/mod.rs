//! Arbitrage module for evaluating betting markets.
//!
//! This module handles:
//! - Implied probability and stake split calculations
//! - Bookmaker stake limit clamping
//! - Quality, risk, and urgency classification
//! - Batch evaluation and event scanning

pub mod calculator;
pub mod classify;
pub mod detector;
pub mod limits;

pub use calculator::{evaluate_market, market_efficiency, validate_outcomes, ArbitrageResult, MarketEfficiency};
pub use classify::{
    classify_opportunity, efficiency_score, estimate_urgency, Quality, RiskLevel, UrgencyEstimate,
    UrgencyLevel,
};
pub use detector::{evaluate, evaluate_batch, scan_events, EvaluationRequest, Opportunity};
pub use limits::{
    apply_bookmaker_limits, evaluate_market_with_limits, ClampedStakes, LimitBound, StakeAdjustment,
};
