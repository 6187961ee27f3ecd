use configuration::EngineConfig;
use core_types::Trade;
use rust_decimal::Decimal;

use crate::report::TradeMetrics;

/// Computes the per-trade derived fields every other component builds on.
///
/// A pure function of one trade plus the engine config; never fails and
/// never mutates its input.
#[derive(Debug, Default)]
pub struct TradeMetricsCalculator;

impl TradeMetricsCalculator {
    pub fn compute(trade: &Trade) -> TradeMetrics {
        let effective_entry_price = Self::effective_entry_price(trade);
        let net_pnl_usd = Self::net_pnl_usd(trade);

        let has_defined_stop_loss = trade
            .stop_price
            .is_some_and(|stop| stop > Decimal::ZERO);

        // Risk is only meaningful when a stop-loss defines it. Without one,
        // risk and R-multiple stay None: "no data", not zero.
        let risk_usd = if has_defined_stop_loss {
            Self::resolve_risk_usd(trade, effective_entry_price)
        } else {
            None
        };

        let r_multiple = match risk_usd {
            Some(risk) if risk > Decimal::ZERO => Some(net_pnl_usd / risk),
            _ => None,
        };

        TradeMetrics {
            net_pnl_usd,
            effective_entry_price,
            risk_usd,
            r_multiple,
            has_defined_stop_loss,
        }
    }

    /// The trade's realized PnL in USD.
    ///
    /// A stored `pnl_usd` is authoritative. Otherwise the PnL is the
    /// direction-adjusted mark-to-close move times the position quantity,
    /// gross of fees. An open trade without a stored PnL contributes 0.
    pub fn net_pnl_usd(trade: &Trade) -> Decimal {
        if let Some(pnl) = trade.pnl_usd {
            return pnl;
        }
        let Some(close_price) = trade.close_price else {
            return Decimal::ZERO;
        };
        if trade.entry_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let quantity = trade.position_size / trade.entry_price;
        (close_price - trade.entry_price) * quantity * trade.direction.signum()
    }

    /// The size-weighted average entry price across the original entry and
    /// all DCA adds. A missing or malformed add history falls back to the
    /// plain entry price.
    pub fn effective_entry_price(trade: &Trade) -> Decimal {
        if trade.adds_history.is_malformed() {
            tracing::debug!(trade_id = %trade.id, "ignoring malformed adds_history");
        }
        let adds = trade.adds_history.items();
        if adds.is_empty() {
            return trade.entry_price;
        }

        let base_price = trade
            .original_entry_price
            .filter(|price| *price > Decimal::ZERO)
            .unwrap_or(trade.entry_price);

        let mut weighted_sum = base_price * trade.position_size;
        let mut total_size = trade.position_size;
        for add in adds {
            if add.size_usd <= Decimal::ZERO || add.price <= Decimal::ZERO {
                continue;
            }
            weighted_sum += add.price * add.size_usd;
            total_size += add.size_usd;
        }

        if total_size > Decimal::ZERO {
            weighted_sum / total_size
        } else {
            trade.entry_price
        }
    }

    /// Resolves the dollar risk of a trade that has a defined stop-loss.
    ///
    /// Provenance order: `original_risk_usd`, then `max_risk_usd`, then
    /// `risk_usd`; the first present-and-positive value wins. When all
    /// three are absent or zero, the risk is derived from the stop distance
    /// against the effective entry price.
    fn resolve_risk_usd(trade: &Trade, effective_entry_price: Decimal) -> Option<Decimal> {
        for recorded in [trade.original_risk_usd, trade.max_risk_usd, trade.risk_usd] {
            if let Some(risk) = recorded {
                if risk > Decimal::ZERO {
                    return Some(risk);
                }
            }
        }

        let stop_price = trade.stop_price?;
        if effective_entry_price <= Decimal::ZERO {
            return None;
        }
        let derived = (effective_entry_price - stop_price).abs() / effective_entry_price
            * trade.position_size;
        (derived > Decimal::ZERO).then_some(derived)
    }
}

/// The breakeven rule shared by exit classification and aggregation: a
/// closed trade is a breakeven when its PnL is within the absolute dollar
/// epsilon, or within the relative epsilon of the trade's account balance.
pub fn is_breakeven(net_pnl_usd: Decimal, balance: Decimal, config: &EngineConfig) -> bool {
    if net_pnl_usd.abs() <= config.breakeven_epsilon_usd {
        return true;
    }
    if balance > Decimal::ZERO {
        let pnl_percent = net_pnl_usd.abs() / balance * Decimal::ONE_HUNDRED;
        return pnl_percent <= config.breakeven_epsilon_percent;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::base_trade;
    use core_types::Direction;
    use rust_decimal_macros::dec;

    #[test]
    fn stop_out_scenario_yields_minus_one_r() {
        // entry 100, stop 95, close 95, size 1000 => pnl -50, risk 50, R -1.
        let mut trade = base_trade("t1");
        trade.stop_price = Some(dec!(95));
        trade.take_price = Some(dec!(115));
        trade.close_price = Some(dec!(95));

        let metrics = TradeMetricsCalculator::compute(&trade);
        assert_eq!(metrics.net_pnl_usd, dec!(-50));
        assert_eq!(metrics.risk_usd, Some(dec!(50)));
        assert_eq!(metrics.r_multiple, Some(dec!(-1)));
        assert!(metrics.has_defined_stop_loss);
    }

    #[test]
    fn stored_pnl_is_authoritative() {
        let mut trade = base_trade("t1");
        trade.close_price = Some(dec!(95));
        trade.pnl_usd = Some(dec!(-42));
        let metrics = TradeMetricsCalculator::compute(&trade);
        assert_eq!(metrics.net_pnl_usd, dec!(-42));
    }

    #[test]
    fn short_pnl_is_direction_adjusted() {
        let mut trade = base_trade("t1");
        trade.direction = Direction::Short;
        trade.close_price = Some(dec!(95));
        // Short from 100 to 95 with quantity 10 => +50.
        assert_eq!(TradeMetricsCalculator::net_pnl_usd(&trade), dec!(50));
    }

    #[test]
    fn effective_entry_weights_original_entry_and_adds() {
        // (100 * 500 + 110 * 500) / 1000 = 105.
        let mut trade = base_trade("t1");
        trade.entry_price = dec!(105);
        trade.original_entry_price = Some(dec!(100));
        trade.position_size = dec!(500);
        trade.adds_history = serde_json::from_str(
            r#"[{"price": "110", "size_usd": "500"}]"#,
        )
        .unwrap();
        assert_eq!(
            TradeMetricsCalculator::effective_entry_price(&trade),
            dec!(105)
        );
    }

    #[test]
    fn malformed_adds_history_falls_back_to_entry_price() {
        let mut trade = base_trade("t1");
        trade.adds_history = serde_json::from_str(r#""{broken json""#).unwrap();
        assert!(trade.adds_history.is_malformed());
        assert_eq!(
            TradeMetricsCalculator::effective_entry_price(&trade),
            dec!(100)
        );
    }

    #[test]
    fn risk_provenance_prefers_original_over_max_over_stored() {
        let mut trade = base_trade("t1");
        trade.stop_price = Some(dec!(95));
        trade.close_price = Some(dec!(98));
        trade.original_risk_usd = Some(Decimal::ZERO); // zero does not win
        trade.max_risk_usd = Some(dec!(75));
        trade.risk_usd = Some(dec!(60));

        let metrics = TradeMetricsCalculator::compute(&trade);
        assert_eq!(metrics.risk_usd, Some(dec!(75)));
    }

    #[test]
    fn no_stop_means_no_risk_and_no_r() {
        let mut trade = base_trade("t1");
        trade.close_price = Some(dec!(110));
        let metrics = TradeMetricsCalculator::compute(&trade);
        assert!(!metrics.has_defined_stop_loss);
        assert_eq!(metrics.risk_usd, None);
        assert_eq!(metrics.r_multiple, None);
    }

    #[test]
    fn breakeven_rule_absolute_and_relative() {
        let config = EngineConfig::default();
        assert!(is_breakeven(dec!(0.2), dec!(100_000), &config));
        assert!(is_breakeven(dec!(-0.5), dec!(100_000), &config));
        // 9 USD on a 100k balance is 0.009%, inside the relative epsilon.
        assert!(is_breakeven(dec!(9), dec!(100_000), &config));
        assert!(!is_breakeven(dec!(11), dec!(100_000), &config));
    }

    #[test]
    fn compute_is_idempotent() {
        let mut trade = base_trade("t1");
        trade.stop_price = Some(dec!(95));
        trade.close_price = Some(dec!(103));
        let first = TradeMetricsCalculator::compute(&trade);
        let second = TradeMetricsCalculator::compute(&trade);
        assert_eq!(first, second);
    }
}
