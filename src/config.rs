//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Engine Defaults ===
    /// Stake split across outcomes when a request omits one.
    #[serde(default = "default_total_stake")]
    pub default_total_stake: Decimal,

    /// Minimum profit percentage for an event scan to report an opportunity.
    #[serde(default = "default_min_profit_percent")]
    pub min_profit_percent: Decimal,

    /// Largest batch accepted by the HTTP API.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    // === Bookmaker Metadata ===
    /// JSON file with bookmaker profiles (built-in catalog when unset).
    #[serde(default)]
    pub bookmakers_file: Option<String>,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_total_stake() -> Decimal {
    Decimal::new(100, 0) // €100
}

fn default_min_profit_percent() -> Decimal {
    Decimal::new(5, 1) // 0.5%
}

fn default_max_batch_size() -> usize {
    500
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_total_stake: default_total_stake(),
            min_profit_percent: default_min_profit_percent(),
            max_batch_size: default_max_batch_size(),
            bookmakers_file: None,
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from `(NAME, value)` pairs.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> crate::Result<Self> {
        Ok(envy::from_iter(vars)?)
    }

    /// Tracing filter directive: debug for this crate when verbose, otherwise `rust_log`.
    pub fn log_filter(&self, verbose: bool) -> String {
        if verbose || self.verbose {
            "surebet=debug,info".to_string()
        } else {
            self.rust_log.clone()
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_total_stake <= Decimal::ZERO {
            return Err("DEFAULT_TOTAL_STAKE must be greater than 0".to_string());
        }

        if self.min_profit_percent < Decimal::ZERO {
            return Err("MIN_PROFIT_PERCENT must not be negative".to_string());
        }

        if self.max_batch_size == 0 {
            return Err("MAX_BATCH_SIZE must be at least 1".to_string());
        }

        Ok(())
    }
}
