use std::collections::BTreeMap;

use chrono::NaiveDate;
use configuration::EngineConfig;
use core_types::Trade;
use rust_decimal::Decimal;

use crate::equity::EquityCurveBuilder;
use crate::report::DailyBucket;

/// Buckets realized PnL into local calendar days for calendars and
/// heatmaps.
#[derive(Debug, Default)]
pub struct DailyPnlAggregator;

impl DailyPnlAggregator {
    /// Consumes the same event stream as the equity curve (closed trades
    /// plus partial closes of open trades) and keys each event by the
    /// calendar date of its timestamp in the configured IANA timezone,
    /// since a trade closed at 23:30 UTC may belong to the next local day.
    ///
    /// PnL accumulates per bucket both in dollars and as percent of the
    /// contributing trade's own balance. A trade appears in a bucket's
    /// trade list exactly once, however many partial closes it booked
    /// that day.
    pub fn bucket(trades: &[Trade], config: &EngineConfig) -> BTreeMap<NaiveDate, DailyBucket> {
        let mut buckets: BTreeMap<NaiveDate, DailyBucket> = BTreeMap::new();

        for event in EquityCurveBuilder::collect_events(trades, config.starting_balance) {
            let local_day = event
                .timestamp
                .with_timezone(&config.timezone)
                .date_naive();
            let bucket = buckets.entry(local_day).or_default();

            bucket.pnl_usd += event.pnl_usd;
            if event.balance > Decimal::ZERO {
                bucket.pnl_percent += event.pnl_usd / event.balance * Decimal::ONE_HUNDRED;
            }
            if !bucket.trade_ids.contains(&event.trade_id) {
                bucket.trade_ids.push(event.trade_id);
                bucket.count += 1;
            }
        }

        buckets
    }
}
