use core_types::Trade;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::report::DisciplineScore;

/// Scores how completely the trader fills in the journal, 0..=100.
#[derive(Debug, Default)]
pub struct DisciplineScorer;

impl DisciplineScorer {
    /// An open trade is complete when the whole plan is on record:
    /// strategy tag, timeframe, a confidence level above zero, an entry
    /// reason, and both stop and take levels. A closed trade is complete
    /// when it was reviewed: a non-empty post-trade analysis plus the
    /// violation-tags field being present at all (an empty tag list still
    /// counts; the field records that violations were considered).
    pub fn score(trades: &[Trade]) -> DisciplineScore {
        let total_trades = trades.len();
        let complete_trades = trades
            .iter()
            .filter(|trade| {
                if trade.is_open() {
                    Self::open_trade_complete(trade)
                } else {
                    Self::closed_trade_complete(trade)
                }
            })
            .count();

        let score = if total_trades == 0 {
            0
        } else {
            (Decimal::from(complete_trades) / Decimal::from(total_trades)
                * Decimal::ONE_HUNDRED)
                .round()
                .to_u32()
                .unwrap_or(0)
        };

        DisciplineScore {
            score,
            complete_trades,
            total_trades,
        }
    }

    fn open_trade_complete(trade: &Trade) -> bool {
        non_empty(&trade.strategy_tag)
            && non_empty(&trade.timeframe)
            && trade.confidence_level.is_some_and(|level| level > 0)
            && non_empty(&trade.entry_reason)
            && trade.stop_price.is_some()
            && trade.take_price.is_some()
    }

    fn closed_trade_complete(trade: &Trade) -> bool {
        non_empty(&trade.trade_analysis) && trade.violation_tags.is_some()
    }
}

fn non_empty(field: &Option<String>) -> bool {
    field
        .as_deref()
        .is_some_and(|value| !value.trim().is_empty())
}
