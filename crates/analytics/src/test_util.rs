//! Shared fixtures for the unit tests of this crate.

use chrono::{DateTime, TimeZone, Utc};
use core_types::{Direction, SeriesField, Trade};
use rust_decimal_macros::dec;

/// A minimal open long: BTC, entry 100, size 1000 USD, opened 2024-03-01.
pub(crate) fn base_trade(id: &str) -> Trade {
    Trade {
        id: id.to_string(),
        coin: "BTC".to_string(),
        direction: Direction::Long,
        entry_price: dec!(100),
        close_price: None,
        stop_price: None,
        take_price: None,
        position_size: dec!(1000),
        account_balance_at_entry: None,
        pnl_usd: None,
        original_risk_usd: None,
        max_risk_usd: None,
        risk_usd: None,
        original_entry_price: None,
        adds_history: SeriesField::Empty,
        partial_closes: SeriesField::Empty,
        rule_compliance: None,
        entry_reason: None,
        trade_analysis: None,
        violation_tags: None,
        strategy_tag: None,
        timeframe: None,
        confidence_level: None,
        emotional_state: None,
        date: ts(2024, 3, 1, 12, 0),
        date_close: None,
    }
}

/// A closed trade with a stored PnL, booked at the given close time.
pub(crate) fn closed_trade(id: &str, pnl_usd: rust_decimal::Decimal, close: DateTime<Utc>) -> Trade {
    let mut trade = base_trade(id);
    trade.close_price = Some(dec!(100)); // price is irrelevant once pnl_usd is stored
    trade.pnl_usd = Some(pnl_usd);
    trade.date_close = Some(close);
    trade
}

pub(crate) fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}
