use core_types::Trade;
use rust_decimal::Decimal;

use crate::report::OpenExposure;

/// Aggregates the stop/take exposure of the currently open positions.
#[derive(Debug, Default)]
pub struct OpenPositionRiskAggregator;

impl OpenPositionRiskAggregator {
    /// Closed trades in the input are ignored. Per open trade the dollar
    /// exposure of a level is `|entry - level| / entry * position_size`,
    /// contributing 0 when the level is missing or degenerately close to
    /// the entry (relative distance below 1e-4).
    pub fn aggregate(trades: &[Trade], current_balance: Decimal) -> OpenExposure {
        let mut exposure = OpenExposure::new();

        for trade in trades.iter().filter(|trade| trade.is_open()) {
            exposure.count += 1;
            exposure.total_risk_usd += Self::level_exposure(trade, trade.stop_price);
            exposure.total_potential_usd += Self::level_exposure(trade, trade.take_price);
        }

        if current_balance > Decimal::ZERO {
            exposure.total_risk_percent =
                exposure.total_risk_usd / current_balance * Decimal::ONE_HUNDRED;
            exposure.total_potential_percent =
                exposure.total_potential_usd / current_balance * Decimal::ONE_HUNDRED;
        }

        // Below one cent of aggregate risk the reward/risk ratio would be a
        // division by near-zero; report the NO_RISK sentinel (None) instead.
        exposure.total_rr = if exposure.total_risk_usd >= Decimal::new(1, 2) {
            Some(exposure.total_potential_usd / exposure.total_risk_usd)
        } else {
            None
        };

        exposure
    }

    fn level_exposure(trade: &Trade, level: Option<Decimal>) -> Decimal {
        let Some(level) = level else {
            return Decimal::ZERO;
        };
        if level <= Decimal::ZERO || trade.entry_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let relative_distance = (trade.entry_price - level).abs() / trade.entry_price;
        // A level sitting on top of the entry is a placeholder, not a plan.
        if relative_distance < Decimal::new(1, 4) {
            return Decimal::ZERO;
        }
        relative_distance * trade.position_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{base_trade, closed_trade, ts};
    use rust_decimal_macros::dec;

    #[test]
    fn aggregates_risk_and_potential_over_open_trades() {
        let mut first = base_trade("a");
        first.stop_price = Some(dec!(95));
        first.take_price = Some(dec!(115));

        let mut second = base_trade("b");
        second.entry_price = dec!(50);
        second.position_size = dec!(500);
        second.stop_price = Some(dec!(49));
        second.take_price = Some(dec!(53));

        let exposure =
            OpenPositionRiskAggregator::aggregate(&[first, second], dec!(100_000));
        assert_eq!(exposure.count, 2);
        // 5% of 1000 + 2% of 500.
        assert_eq!(exposure.total_risk_usd, dec!(60));
        // 15% of 1000 + 6% of 500.
        assert_eq!(exposure.total_potential_usd, dec!(180));
        assert_eq!(exposure.total_rr, Some(dec!(3)));
        assert_eq!(exposure.total_risk_percent, dec!(0.06));
    }

    #[test]
    fn closed_trades_are_excluded() {
        let closed = closed_trade("c", dec!(100), ts(2024, 3, 2, 10, 0));
        let exposure = OpenPositionRiskAggregator::aggregate(&[closed], dec!(100_000));
        assert_eq!(exposure.count, 0);
        assert_eq!(exposure.total_risk_usd, Decimal::ZERO);
    }

    #[test]
    fn missing_levels_contribute_zero() {
        let open = base_trade("o");
        let exposure = OpenPositionRiskAggregator::aggregate(&[open], dec!(100_000));
        assert_eq!(exposure.count, 1);
        assert_eq!(exposure.total_risk_usd, Decimal::ZERO);
        assert_eq!(exposure.total_rr, None); // NO_RISK sentinel
    }

    #[test]
    fn degenerate_stop_distance_counts_as_no_risk() {
        let mut open = base_trade("o");
        open.stop_price = Some(dec!(100.005)); // 5e-5 relative distance
        open.take_price = Some(dec!(110));
        let exposure = OpenPositionRiskAggregator::aggregate(&[open], dec!(100_000));
        assert_eq!(exposure.total_risk_usd, Decimal::ZERO);
        assert_eq!(exposure.total_potential_usd, dec!(100));
        assert_eq!(exposure.total_rr, None);
    }
}
