use configuration::EngineConfig;
use core_types::Trade;
use rust_decimal::Decimal;

use crate::metrics::{is_breakeven, TradeMetricsCalculator};
use crate::report::AggregateMetrics;

/// Derives the portfolio statistics of a journal over its closed trades.
#[derive(Debug, Default)]
pub struct AggregateMetricsCalculator;

impl AggregateMetricsCalculator {
    /// Open trades are ignored entirely. An empty (or fully open) journal
    /// yields the zeroed `AggregateMetrics`, never an error.
    pub fn aggregate(trades: &[Trade], config: &EngineConfig) -> AggregateMetrics {
        let mut report = AggregateMetrics::new();
        let mut r_sum = Decimal::ZERO;

        for trade in trades.iter().filter(|trade| trade.is_closed()) {
            report.closed_trades += 1;

            let metrics = TradeMetricsCalculator::compute(trade);
            let pnl = metrics.net_pnl_usd;
            report.net_pnl_usd += pnl;

            // Breakeven is checked before the win/loss split so that a
            // near-zero winner inflates neither side.
            let balance = trade.balance_or(config.starting_balance);
            if is_breakeven(pnl, balance, config) {
                report.breakevens += 1;
            } else if pnl > Decimal::ZERO {
                report.wins += 1;
                report.gross_profit += pnl;
            } else {
                report.losses += 1;
                report.gross_loss += pnl.abs();
            }

            // Trades without a usable R are excluded from both the numerator
            // and the denominator of the average.
            if let Some(r_multiple) = metrics.r_multiple {
                r_sum += r_multiple;
                report.r_sample_size += 1;
            }
        }

        // Winrate over decisive trades only: breakevens dilute neither side.
        let decisive = report.wins + report.losses;
        if decisive > 0 {
            report.winrate_pct =
                Decimal::from(report.wins) / Decimal::from(decisive) * Decimal::ONE_HUNDRED;
        }

        // Profit factor stays None when there are no losses (the "N/A"
        // case, including the zero/zero journal); a journal with losses and
        // no profit yields Some(0).
        if report.gross_loss > Decimal::ZERO {
            report.profit_factor = Some(report.gross_profit / report.gross_loss);
        }

        if report.wins > 0 {
            report.average_win = report.gross_profit / Decimal::from(report.wins);
        }
        if report.losses > 0 {
            report.average_loss = report.gross_loss / Decimal::from(report.losses);
        }

        let win_probability = report.winrate_pct / Decimal::ONE_HUNDRED;
        report.expectancy = win_probability * report.average_win
            - (Decimal::ONE - win_probability) * report.average_loss;

        if report.r_sample_size > 0 {
            report.average_r = Some(r_sum / Decimal::from(report.r_sample_size));
        }

        report
    }
}
