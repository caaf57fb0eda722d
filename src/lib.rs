//! Sports betting arbitrage engine.
//!
//! Given bookmaker odds for the mutually exclusive outcomes of one event,
//! decide whether a risk-free profit exists and compute the stake split that
//! guarantees it.
//!
//! # Strategy
//!
//! Each decimal odd implies a probability of `1 / odd`. When the implied
//! probabilities across bookmakers sum below one, staking in proportion to
//! them pays the same amount whichever outcome wins:
//!
//! ```text
//! Home @ 2.10 (betano):   1/2.10 = 47.62%
//! Away @ 2.05 (betclic):  1/2.05 = 48.78%
//! ─────────────────────────────────────
//! Total:                           96.40% < 100% ✅
//! €100 → €49.40 + €50.60, payout €103.73 either way (3.73% guaranteed)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Outcomes, event odds, and best-price selection
//! - [`bookmaker`]: Stake limits and the bookmaker catalog
//! - [`arbitrage`]: Evaluation, limit clamping, and classification
//! - [`api`]: HTTP API for evaluation, health, and metrics
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod arbitrage;
pub mod bookmaker;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod utils;

pub use arbitrage::{evaluate_market, ArbitrageResult};
pub use config::Config;
pub use error::{EngineError, Result, SurebetError};
