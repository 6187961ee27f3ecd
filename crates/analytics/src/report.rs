use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-trade derived fields.
///
/// `risk_usd` and `r_multiple` are `None` when the trade has no usable
/// stop-loss; consumers must render that as "no data", never as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    /// Realized (or mark-to-close) PnL in USD, gross of fees.
    pub net_pnl_usd: Decimal,
    /// Size-weighted average entry across the original entry and all adds.
    pub effective_entry_price: Decimal,
    /// The dollar amount at risk, when a stop-loss defines one.
    pub risk_usd: Option<Decimal>,
    /// Net PnL as a multiple of `risk_usd`. Defined only for positive risk.
    pub r_multiple: Option<Decimal>,
    pub has_defined_stop_loss: bool,
}

/// Portfolio statistics over the closed trades of a journal.
///
/// `wins + losses + breakevens == closed_trades` always holds; breakevens
/// are excluded from the win-rate denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub closed_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,

    /// `wins / (wins + losses) * 100`; zero when no trade was decisive.
    pub winrate_pct: Decimal,
    pub net_pnl_usd: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    /// `None` whenever gross loss is zero (the "N/A" case, including the
    /// zero/zero journal). `Some(0)` for an all-losing journal.
    pub profit_factor: Option<Decimal>,
    pub average_win: Decimal,
    pub average_loss: Decimal,
    /// `winrate * avg_win - (1 - winrate) * avg_loss`, in USD per trade.
    pub expectancy: Decimal,
    /// Mean R-multiple over the trades where R is defined; `None` when no
    /// closed trade carries a usable risk figure.
    pub average_r: Option<Decimal>,
    /// How many closed trades contributed to `average_r`.
    pub r_sample_size: usize,
}

impl AggregateMetrics {
    /// Creates a zeroed result, the well-defined outcome for an empty
    /// (or fully open) journal.
    pub fn new() -> Self {
        Self {
            closed_trades: 0,
            wins: 0,
            losses: 0,
            breakevens: 0,
            winrate_pct: Decimal::ZERO,
            net_pnl_usd: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            profit_factor: None,
            average_win: Decimal::ZERO,
            average_loss: Decimal::ZERO,
            expectancy: Decimal::ZERO,
            average_r: None,
            r_sample_size: 0,
        }
    }
}

impl Default for AggregateMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// One point of the chronological balance series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// The coin of the contributing trade, or "Start" for the synthetic
    /// opening point.
    pub label: String,
    /// `None` only on the synthetic opening point of an empty curve.
    pub timestamp: Option<DateTime<Utc>>,
    /// Account balance after this event was applied.
    pub balance: Decimal,
    /// The realized PnL this event contributed.
    pub pnl_usd: Decimal,
}

/// Worst peak-to-trough decline of an equity curve, as positive magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownResult {
    pub percent: Decimal,
    pub usd: Decimal,
}

impl DrawdownResult {
    pub const ZERO: Self = Self {
        percent: Decimal::ZERO,
        usd: Decimal::ZERO,
    };
}

/// Aggregate stop/take exposure of the currently open positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenExposure {
    pub count: usize,
    pub total_risk_usd: Decimal,
    pub total_risk_percent: Decimal,
    pub total_potential_usd: Decimal,
    pub total_potential_percent: Decimal,
    /// Potential over risk. `None` is the NO_RISK sentinel: total risk is
    /// below one cent and the ratio would be meaningless.
    pub total_rr: Option<Decimal>,
}

impl OpenExposure {
    pub fn new() -> Self {
        Self {
            count: 0,
            total_risk_usd: Decimal::ZERO,
            total_risk_percent: Decimal::ZERO,
            total_potential_usd: Decimal::ZERO,
            total_potential_percent: Decimal::ZERO,
            total_rr: None,
        }
    }
}

impl Default for OpenExposure {
    fn default() -> Self {
        Self::new()
    }
}

/// Journal completeness, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineScore {
    pub score: u32,
    pub complete_trades: usize,
    pub total_trades: usize,
}

/// Accumulated PnL of one local calendar day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyBucket {
    pub pnl_usd: Decimal,
    /// Sum of per-event PnL as percent of the contributing trade's balance.
    pub pnl_percent: Decimal,
    /// Number of distinct trades that touched this day.
    pub count: usize,
    /// The contributing trades, each listed exactly once even when it
    /// produced several partial-close events on the same day.
    pub trade_ids: Vec<String>,
}

/// Everything the engine derives from one journal, in a single call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalReport {
    pub aggregates: AggregateMetrics,
    pub equity_curve: Vec<EquityPoint>,
    pub drawdown: DrawdownResult,
    pub open_exposure: OpenExposure,
    pub discipline: DisciplineScore,
    pub daily_pnl: BTreeMap<NaiveDate, DailyBucket>,
}
