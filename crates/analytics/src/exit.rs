use configuration::EngineConfig;
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::{is_breakeven, TradeMetricsCalculator};

/// What ended (or has not yet ended) a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Open,
    Breakeven,
    Stop,
    Take,
    Manual,
}

/// Labels a trade's exit cause from its close price relative to the
/// planned stop and take levels.
#[derive(Debug, Default)]
pub struct ExitClassifier;

impl ExitClassifier {
    /// The checks below run strictly top to bottom; the order is policy,
    /// not an implementation detail:
    ///
    /// 1. no close price: the trade is still `Open`;
    /// 2. PnL within the breakeven tolerance: `Breakeven`, even when the
    ///    close landed exactly on the stop or take level;
    /// 3. close within 0.1% of entry of the stop level: `Stop`;
    /// 4. close within 0.1% of entry of the take level: `Take`;
    /// 5. otherwise `Manual`.
    pub fn classify(trade: &Trade, config: &EngineConfig) -> ExitReason {
        let Some(close_price) = trade.close_price else {
            return ExitReason::Open;
        };

        let net_pnl_usd = TradeMetricsCalculator::net_pnl_usd(trade);
        let balance = trade.balance_or(config.starting_balance);
        if is_breakeven(net_pnl_usd, balance, config) {
            return ExitReason::Breakeven;
        }

        // Proximity threshold: 0.1% of the entry price.
        let threshold = trade.entry_price * Decimal::new(1, 3);
        if let Some(stop_price) = trade.stop_price {
            if (close_price - stop_price).abs() < threshold {
                return ExitReason::Stop;
            }
        }
        if let Some(take_price) = trade.take_price {
            if (close_price - take_price).abs() < threshold {
                return ExitReason::Take;
            }
        }
        ExitReason::Manual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::base_trade;
    use rust_decimal_macros::dec;

    fn planned_trade() -> core_types::Trade {
        let mut trade = base_trade("t1");
        trade.stop_price = Some(dec!(95));
        trade.take_price = Some(dec!(115));
        trade
    }

    #[test]
    fn open_trade_classifies_as_open() {
        let config = EngineConfig::default();
        assert_eq!(
            ExitClassifier::classify(&planned_trade(), &config),
            ExitReason::Open
        );
    }

    #[test]
    fn close_at_stop_classifies_as_stop() {
        let config = EngineConfig::default();
        let mut trade = planned_trade();
        trade.close_price = Some(dec!(95.05)); // within 0.1% of entry (0.1)
        assert_eq!(ExitClassifier::classify(&trade, &config), ExitReason::Stop);
    }

    #[test]
    fn close_at_take_classifies_as_take() {
        let config = EngineConfig::default();
        let mut trade = planned_trade();
        trade.close_price = Some(dec!(115));
        assert_eq!(ExitClassifier::classify(&trade, &config), ExitReason::Take);
    }

    #[test]
    fn close_away_from_levels_is_manual() {
        let config = EngineConfig::default();
        let mut trade = planned_trade();
        trade.close_price = Some(dec!(104));
        assert_eq!(ExitClassifier::classify(&trade, &config), ExitReason::Manual);
    }

    #[test]
    fn breakeven_takes_precedence_over_stop() {
        // Closed exactly on the stop, but the stored PnL is inside the
        // breakeven tolerance: must classify as Breakeven, not Stop.
        let config = EngineConfig::default();
        let mut trade = planned_trade();
        trade.close_price = Some(dec!(95));
        trade.pnl_usd = Some(dec!(0.3));
        assert_eq!(
            ExitClassifier::classify(&trade, &config),
            ExitReason::Breakeven
        );
    }

    #[test]
    fn missing_levels_fall_through_to_manual() {
        let config = EngineConfig::default();
        let mut trade = base_trade("t1");
        trade.close_price = Some(dec!(110));
        assert_eq!(ExitClassifier::classify(&trade, &config), ExitReason::Manual);
    }
}
