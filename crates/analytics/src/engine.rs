use configuration::EngineConfig;
use core_types::Trade;
use rust_decimal::Decimal;

use crate::aggregate::AggregateMetricsCalculator;
use crate::calendar::DailyPnlAggregator;
use crate::discipline::DisciplineScorer;
use crate::drawdown::DrawdownAnalyzer;
use crate::equity::EquityCurveBuilder;
use crate::error::AnalyticsError;
use crate::exposure::OpenPositionRiskAggregator;
use crate::report::JournalReport;

/// A stateless calculator deriving every journal metric in one pass.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for deriving a full `JournalReport`.
    ///
    /// # Arguments
    ///
    /// * `trades` - Every journal record, open and closed alike; each
    ///   component picks the subset it operates on.
    /// * `config` - Starting balance, timezone and breakeven epsilons.
    ///
    /// No journal content can fail this call: empty journals produce
    /// zeroed reports and malformed nested payloads are skipped. The only
    /// error is a config whose starting balance cannot anchor the equity
    /// and percentage math.
    pub fn calculate(
        &self,
        trades: &[Trade],
        config: &EngineConfig,
    ) -> Result<JournalReport, AnalyticsError> {
        if config.starting_balance <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidConfig(
                "starting_balance must be positive".to_string(),
            ));
        }

        tracing::debug!(trades = trades.len(), "calculating journal report");

        let aggregates = AggregateMetricsCalculator::aggregate(trades, config);
        let equity_curve = EquityCurveBuilder::build(trades, config.starting_balance);
        let drawdown = DrawdownAnalyzer::analyze(&equity_curve, config.starting_balance);

        // Open exposure is judged against the balance after all realized
        // PnL, i.e. the last point of the equity curve.
        let current_balance = equity_curve
            .last()
            .map(|point| point.balance)
            .unwrap_or(config.starting_balance);
        let open_exposure = OpenPositionRiskAggregator::aggregate(trades, current_balance);

        let discipline = DisciplineScorer::score(trades);
        let daily_pnl = DailyPnlAggregator::bucket(trades, config);

        Ok(JournalReport {
            aggregates,
            equity_curve,
            drawdown,
            open_exposure,
            discipline,
            daily_pnl,
        })
    }
}
