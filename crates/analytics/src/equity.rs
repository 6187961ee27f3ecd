use chrono::{DateTime, Utc};
use core_types::Trade;
use rust_decimal::Decimal;

use crate::metrics::TradeMetricsCalculator;
use crate::report::EquityPoint;

/// One realized-PnL event, either a closed trade or a partial close of a
/// still-open trade. The shared input of the equity curve and the daily
/// PnL calendar.
#[derive(Debug, Clone)]
pub(crate) struct PnlEvent {
    pub trade_id: String,
    pub coin: String,
    pub timestamp: DateTime<Utc>,
    pub pnl_usd: Decimal,
    /// The contributing trade's account balance, for percent figures.
    pub balance: Decimal,
}

/// Builds the chronological balance series of a journal.
#[derive(Debug, Default)]
pub struct EquityCurveBuilder;

impl EquityCurveBuilder {
    /// The curve starts with a synthetic "Start" point at the starting
    /// balance, then applies every realized-PnL event in ascending
    /// timestamp order. Ties keep their journal insertion order.
    pub fn build(trades: &[Trade], starting_balance: Decimal) -> Vec<EquityPoint> {
        let events = Self::collect_events(trades, starting_balance);

        let mut curve = Vec::with_capacity(events.len() + 1);
        curve.push(EquityPoint {
            label: "Start".to_string(),
            timestamp: events.first().map(|event| event.timestamp),
            balance: starting_balance,
            pnl_usd: Decimal::ZERO,
        });

        // Explicit fold: (running balance, event) -> next balance.
        let mut balance = starting_balance;
        for event in events {
            balance += event.pnl_usd;
            curve.push(EquityPoint {
                label: event.coin,
                timestamp: Some(event.timestamp),
                balance,
                pnl_usd: event.pnl_usd,
            });
        }
        curve
    }

    /// Collects the realized-PnL events of a journal, sorted ascending by
    /// timestamp (stable, so same-instant events keep insertion order):
    ///
    /// - one event per closed trade, booked at `date_close` (falling back
    ///   to the open date);
    /// - one event per partial close of each still-open trade. A malformed
    ///   partial-close payload is skipped, never fatal.
    pub(crate) fn collect_events(trades: &[Trade], default_balance: Decimal) -> Vec<PnlEvent> {
        let mut events = Vec::new();
        for trade in trades {
            let balance = trade.balance_or(default_balance);
            if trade.is_closed() {
                events.push(PnlEvent {
                    trade_id: trade.id.clone(),
                    coin: trade.coin.clone(),
                    timestamp: trade.close_timestamp(),
                    pnl_usd: TradeMetricsCalculator::net_pnl_usd(trade),
                    balance,
                });
                continue;
            }
            if trade.partial_closes.is_malformed() {
                tracing::debug!(trade_id = %trade.id, "skipping malformed partial_closes");
            }
            for partial in trade.partial_closes.items() {
                events.push(PnlEvent {
                    trade_id: trade.id.clone(),
                    coin: trade.coin.clone(),
                    timestamp: partial.timestamp,
                    pnl_usd: partial.pnl_usd,
                    balance,
                });
            }
        }
        events.sort_by_key(|event| event.timestamp);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{base_trade, closed_trade, ts};
    use rust_decimal_macros::dec;

    #[test]
    fn empty_journal_yields_only_the_start_point() {
        let curve = EquityCurveBuilder::build(&[], dec!(100_000));
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].label, "Start");
        assert_eq!(curve[0].timestamp, None);
        assert_eq!(curve[0].balance, dec!(100_000));
    }

    #[test]
    fn events_apply_in_chronological_order_regardless_of_input_order() {
        // Journal lists the later trade first.
        let trades = vec![
            closed_trade("late", dec!(-2000), ts(2024, 3, 5, 10, 0)),
            closed_trade("early", dec!(5000), ts(2024, 3, 2, 10, 0)),
        ];
        let curve = EquityCurveBuilder::build(&trades, dec!(100_000));
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[1].pnl_usd, dec!(5000));
        assert_eq!(curve[1].balance, dec!(105_000));
        assert_eq!(curve[2].pnl_usd, dec!(-2000));
        assert_eq!(curve[2].balance, dec!(103_000));
        // The start point carries the first event's timestamp.
        assert_eq!(curve[0].timestamp, Some(ts(2024, 3, 2, 10, 0)));
    }

    #[test]
    fn partial_closes_of_open_trades_contribute_events() {
        let mut open = base_trade("o");
        open.partial_closes = serde_json::from_str(
            r#"[
                {"pnl_usd": "300", "timestamp": "2024-03-03T08:00:00Z"},
                {"pnl_usd": "-100", "timestamp": "2024-03-04T08:00:00Z"}
            ]"#,
        )
        .unwrap();
        let trades = vec![open, closed_trade("c", dec!(1000), ts(2024, 3, 2, 10, 0))];

        let curve = EquityCurveBuilder::build(&trades, dec!(100_000));
        assert_eq!(curve.len(), 4);
        assert_eq!(curve[1].balance, dec!(101_000)); // closed trade first
        assert_eq!(curve[2].balance, dec!(101_300));
        assert_eq!(curve[3].balance, dec!(101_200));
    }

    #[test]
    fn partial_closes_of_closed_trades_are_ignored() {
        let mut closed = closed_trade("c", dec!(1000), ts(2024, 3, 2, 10, 0));
        closed.partial_closes = serde_json::from_str(
            r#"[{"pnl_usd": "300", "timestamp": "2024-03-01T08:00:00Z"}]"#,
        )
        .unwrap();
        let curve = EquityCurveBuilder::build(&[closed], dec!(100_000));
        // Only the close event itself; the stale partials do not double-count.
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[1].balance, dec!(101_000));
    }

    #[test]
    fn malformed_partial_closes_are_skipped_silently() {
        let mut open = base_trade("o");
        open.partial_closes = serde_json::from_str(r#""[{oops""#).unwrap();
        let curve = EquityCurveBuilder::build(&[open], dec!(100_000));
        assert_eq!(curve.len(), 1);
    }

    #[test]
    fn tied_timestamps_keep_insertion_order() {
        let when = ts(2024, 3, 2, 10, 0);
        let trades = vec![
            closed_trade("first", dec!(10), when),
            closed_trade("second", dec!(20), when),
        ];
        let events = EquityCurveBuilder::collect_events(&trades, dec!(100_000));
        assert_eq!(events[0].trade_id, "first");
        assert_eq!(events[1].trade_id, "second");
    }
}
