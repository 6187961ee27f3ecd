use rust_decimal::Decimal;

use crate::report::{DrawdownResult, EquityPoint};

/// The accumulator of the drawdown fold over an equity curve.
#[derive(Debug, Clone, Copy)]
struct DrawdownState {
    /// Highest equity seen so far. Only ever increases.
    peak: Decimal,
    worst_usd: Decimal,
    worst_percent: Decimal,
}

/// Finds the worst peak-to-trough decline of an equity curve.
#[derive(Debug, Default)]
pub struct DrawdownAnalyzer;

impl DrawdownAnalyzer {
    /// The peak starts at the starting balance and never resets. Both
    /// magnitudes are tracked against the peak in force at the trough and
    /// reported as non-negative values; a monotonically non-decreasing
    /// curve yields zero.
    pub fn analyze(equity_curve: &[EquityPoint], starting_balance: Decimal) -> DrawdownResult {
        let initial = DrawdownState {
            peak: starting_balance,
            worst_usd: Decimal::ZERO,
            worst_percent: Decimal::ZERO,
        };

        let state = equity_curve.iter().fold(initial, |mut state, point| {
            if point.balance > state.peak {
                state.peak = point.balance;
            }
            if state.peak > Decimal::ZERO {
                let decline_usd = state.peak - point.balance;
                if decline_usd > state.worst_usd {
                    state.worst_usd = decline_usd;
                }
                let decline_percent = decline_usd / state.peak * Decimal::ONE_HUNDRED;
                if decline_percent > state.worst_percent {
                    state.worst_percent = decline_percent;
                }
            }
            state
        });

        DrawdownResult {
            percent: state.worst_percent,
            usd: state.worst_usd,
        }
    }
}
