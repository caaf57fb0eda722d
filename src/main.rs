//! Sports betting arbitrage engine entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use surebet::api::{create_router, AppState};
use surebet::arbitrage::{estimate_urgency, evaluate, ArbitrageResult, EvaluationRequest};
use surebet::bookmaker::BookmakerCatalog;
use surebet::config::Config;
use surebet::market::Outcome;
use surebet::metrics;
use surebet::utils::shutdown_signal;

/// Sports betting arbitrage engine.
#[derive(Parser, Debug)]
#[command(name = "surebet")]
#[command(about = "Arbitrage detection and stake allocation for two-way and three-way betting markets")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one market from the command line.
    Evaluate {
        /// Decimal odd per outcome (2 or 3, in order).
        #[arg(long = "odd", required = true)]
        odds: Vec<Decimal>,

        /// Bookmaker id per outcome, parallel to --odd.
        #[arg(long = "bookmaker")]
        bookmakers: Vec<String>,

        /// Label per outcome, parallel to --odd.
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Total stake to split (configured default when omitted).
        #[arg(short, long)]
        stake: Option<Decimal>,

        /// Clamp stakes to the bookmaker catalog's limits.
        #[arg(long)]
        limits: bool,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the bookmaker catalog.
    Bookmakers,

    /// Check configuration validity.
    CheckConfig,

    /// Serve the HTTP API (default).
    Serve {
        /// HTTP server port (configured port when omitted).
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load errors are reported by each command once logging is up.
    let directive = Config::load()
        .unwrap_or_default()
        .log_filter(args.verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::Evaluate {
            odds,
            bookmakers,
            labels,
            stake,
            limits,
            json,
        }) => cmd_evaluate(odds, bookmakers, labels, stake, limits, json),
        Some(Command::Bookmakers) => cmd_bookmakers(),
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Serve { port }) => cmd_serve(port).await,
        None => cmd_serve(None).await,
    }
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        anyhow::anyhow!("Configuration validation failed: {}", e)
    })?;
    Ok(config)
}

fn build_outcomes(
    odds: Vec<Decimal>,
    bookmakers: Vec<String>,
    labels: Vec<String>,
) -> anyhow::Result<Vec<Outcome>> {
    if !bookmakers.is_empty() && bookmakers.len() != odds.len() {
        anyhow::bail!("--bookmaker given {} times for {} odds", bookmakers.len(), odds.len());
    }
    if !labels.is_empty() && labels.len() != odds.len() {
        anyhow::bail!("--label given {} times for {} odds", labels.len(), odds.len());
    }

    Ok(odds
        .into_iter()
        .enumerate()
        .map(|(i, odd)| {
            let bookmaker = bookmakers
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("bookmaker{}", i + 1));
            let label = labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("Outcome {}", i + 1));
            Outcome::new(odd, bookmaker, label)
        })
        .collect())
}

/// Evaluate a market given on the command line.
fn cmd_evaluate(
    odds: Vec<Decimal>,
    bookmakers: Vec<String>,
    labels: Vec<String>,
    stake: Option<Decimal>,
    use_limits: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let outcomes = build_outcomes(odds, bookmakers, labels)?;
    let total_stake = stake.unwrap_or(config.default_total_stake);

    let limits = if use_limits {
        BookmakerCatalog::load_or_builtin(config.bookmakers_file.as_deref())?.limits()
    } else {
        Vec::new()
    };

    let request = EvaluationRequest::new(outcomes, total_stake).with_limits(limits);
    let result = evaluate(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&request, &result);
    }

    Ok(())
}

fn print_result(request: &EvaluationRequest, result: &ArbitrageResult) {
    println!("======================================================================");
    println!(
        "MARKET EVALUATION ({}) - STAKE {}",
        result.kind,
        request.total_stake.round_dp(2)
    );
    println!("======================================================================");

    for (i, outcome) in request.outcomes.iter().enumerate() {
        println!(
            "  {:<16} @ {:>7} ({:<10}) implied {:>6}%  stake {:>10}  returns {:>10}",
            outcome.label,
            outcome.odd,
            outcome.bookmaker_id,
            (result.implied_probabilities[i] * Decimal::ONE_HUNDRED).round_dp(2),
            result.stakes[i].round_dp(2),
            result.payouts[i].round_dp(2),
        );
    }

    println!("----------------------------------------------------------------------");
    println!(
        "  Total implied:     {}%",
        (result.total_implied_probability * Decimal::ONE_HUNDRED).round_dp(2)
    );
    println!("  Margin:            {}%", result.margin_percent.round_dp(2));
    println!("  Arbitrage:         {}", if result.is_arbitrage { "YES" } else { "NO" });
    println!(
        "  Guaranteed profit: {} ({}%)",
        result.guaranteed_profit.round_dp(2),
        result.profit_percent.round_dp(2)
    );
    println!("  Quality:           {} (risk: {})", result.quality, result.risk_level);

    let urgency = estimate_urgency(result.profit_percent);
    println!(
        "  Urgency:           {} (window {}, priority {})",
        urgency.urgency,
        urgency.window_label,
        urgency.priority_score.round_dp(0)
    );
    println!("  Efficiency:        {}", result.efficiency_score.round_dp(1));

    for warning in &result.warnings {
        println!("  WARNING: {}", warning);
    }
    println!("======================================================================");
}

/// List the bookmaker catalog.
fn cmd_bookmakers() -> anyhow::Result<()> {
    let config = load_config()?;
    let catalog = BookmakerCatalog::load_or_builtin(config.bookmakers_file.as_deref())?;

    println!("{:<12} {:<14} {:>10} {:>10} {:>12}", "ID", "NAME", "MARGIN", "MIN", "MAX");
    for profile in catalog.iter() {
        println!(
            "{:<12} {:<14} {:>9}% {:>10} {:>12}",
            profile.id,
            profile.display_name,
            (profile.commission_rate * Decimal::ONE_HUNDRED).round_dp(1),
            profile.min_stake,
            profile.max_stake,
        );
    }
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SUREBET - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Loading bookmaker catalog... ");
    let catalog = match BookmakerCatalog::load_or_builtin(config.bookmakers_file.as_deref()) {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Bookmaker catalog invalid"));
        }
    };

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Default stake:      {}", config.default_total_stake);
    println!("  Min profit:         {}%", config.min_profit_percent);
    println!("  Max batch size:     {}", config.max_batch_size);
    println!(
        "  Bookmakers:         {} ({})",
        catalog.len(),
        config.bookmakers_file.as_deref().unwrap_or("built-in")
    );
    println!("  Port:               {}", config.port);
    println!("======================================================================");

    Ok(())
}

/// Serve the HTTP API until shutdown.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config()?;
    let port = port_override.unwrap_or(config.port);

    let handle = metrics::install_recorder()?;
    let app_state = AppState::from_config(config)?.with_metrics(handle);
    info!(bookmakers = app_state.catalog.len(), "Bookmaker catalog ready");

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());
    app_state.set_ready(true);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
