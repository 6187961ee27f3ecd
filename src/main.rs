use std::fs;
use std::path::PathBuf;

use analytics::{AnalyticsEngine, ExitClassifier, JournalReport};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::EngineConfig;
use core_types::Trade;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// The main entry point for the tradelog journal analytics CLI.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => handle_report(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Derives performance analytics from a retail trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and print the full analytics report for a journal file.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Path to the journal file (a JSON array of trade records).
    #[arg(long)]
    trades: PathBuf,

    /// Path to a TOML config file. Defaults to ./tradelog.toml when
    /// present, and to the documented defaults otherwise.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let config = configuration::load_config(args.config.as_deref())?;

    let payload = fs::read_to_string(&args.trades)
        .with_context(|| format!("failed to read journal file {}", args.trades.display()))?;
    let trades: Vec<Trade> =
        serde_json::from_str(&payload).context("journal file is not a valid trade array")?;

    // Records the engine cannot meaningfully price are dropped with a
    // warning rather than failing the whole report.
    let trades: Vec<Trade> = trades
        .into_iter()
        .filter(|trade| match trade.validate() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(trade_id = %trade.id, %err, "skipping invalid trade record");
                false
            }
        })
        .collect();

    let engine = AnalyticsEngine::new();
    let report = engine.calculate(&trades, &config)?;

    print_aggregates(&report);
    print_exposure_and_discipline(&report);
    print_daily_pnl(&report);
    print_exits(&trades, &config);

    Ok(())
}

fn print_aggregates(report: &JournalReport) {
    let aggregates = &report.aggregates;
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Closed trades", aggregates.closed_trades.to_string()),
        (
            "Wins / Losses / Breakevens",
            format!(
                "{} / {} / {}",
                aggregates.wins, aggregates.losses, aggregates.breakevens
            ),
        ),
        (
            "Winrate",
            format!("{}%", aggregates.winrate_pct.round_dp(2)),
        ),
        (
            "Net PnL",
            format!("${}", aggregates.net_pnl_usd.round_dp(2)),
        ),
        ("Profit factor", render_ratio(aggregates.profit_factor)),
        (
            "Expectancy / trade",
            format!("${}", aggregates.expectancy.round_dp(2)),
        ),
        (
            "Average R",
            format!(
                "{} ({} trades)",
                render_ratio(aggregates.average_r),
                aggregates.r_sample_size
            ),
        ),
        (
            "Max drawdown",
            format!(
                "${} ({}%)",
                report.drawdown.usd.round_dp(2),
                report.drawdown.percent.round_dp(2)
            ),
        ),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    println!("{table}");
}

fn print_exposure_and_discipline(report: &JournalReport) {
    let exposure = &report.open_exposure;
    let mut table = Table::new();
    table.set_header(vec!["Open positions", "Risk", "Potential", "R:R"]);
    table.add_row(vec![
        exposure.count.to_string(),
        format!(
            "${} ({}%)",
            exposure.total_risk_usd.round_dp(2),
            exposure.total_risk_percent.round_dp(2)
        ),
        format!(
            "${} ({}%)",
            exposure.total_potential_usd.round_dp(2),
            exposure.total_potential_percent.round_dp(2)
        ),
        match exposure.total_rr {
            Some(rr) => rr.round_dp(2).to_string(),
            None => "no risk".to_string(),
        },
    ]);
    println!("{table}");

    println!(
        "Discipline score: {}/100 ({} of {} trades complete)",
        report.discipline.score, report.discipline.complete_trades, report.discipline.total_trades
    );
}

fn print_daily_pnl(report: &JournalReport) {
    if report.daily_pnl.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Day", "PnL", "PnL %", "Trades"]);
    for (day, bucket) in &report.daily_pnl {
        table.add_row(vec![
            day.to_string(),
            format!("${}", bucket.pnl_usd.round_dp(2)),
            format!("{}%", bucket.pnl_percent.round_dp(3)),
            bucket.trade_ids.join(", "),
        ]);
    }
    println!("{table}");
}

fn print_exits(trades: &[Trade], config: &EngineConfig) {
    let mut table = Table::new();
    table.set_header(vec!["Trade", "Coin", "Exit"]);
    for trade in trades {
        let reason = ExitClassifier::classify(trade, config);
        table.add_row(vec![
            trade.id.clone(),
            trade.coin.clone(),
            format!("{reason:?}"),
        ]);
    }
    println!("{table}");
}

/// Renders an undefined ratio as "N/A", never as 0.
fn render_ratio(value: Option<Decimal>) -> String {
    match value {
        Some(ratio) => ratio.round_dp(2).to_string(),
        None => "N/A".to_string(),
    }
}
