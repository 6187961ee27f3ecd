use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::ConfigError;

/// The caller-supplied knobs of the analytics engine.
///
/// Every field has a documented default, so an absent config file (or a
/// file that only overrides some keys) always produces a usable config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The account balance assumed before the first journaled trade, and
    /// the fallback for trades without `account_balance_at_entry`.
    pub starting_balance: Decimal,

    /// The IANA timezone used to bucket PnL events into local calendar
    /// days (e.g. "Europe/Berlin"). A trade closed at 23:30 UTC may belong
    /// to the next local day.
    pub timezone: Tz,

    /// A closed trade whose absolute PnL is at or below this dollar amount
    /// counts as a breakeven, not a win or a loss.
    pub breakeven_epsilon_usd: Decimal,

    /// The relative breakeven tolerance, in percent points of the trade's
    /// account balance (0.01 means 0.01% of the balance).
    pub breakeven_epsilon_percent: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_balance: dec!(100_000),
            timezone: Tz::UTC,
            breakeven_epsilon_usd: dec!(0.5),
            breakeven_epsilon_percent: dec!(0.01),
        }
    }
}

impl EngineConfig {
    /// Validates that the parameters are usable for percentage math.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_balance <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "starting_balance must be greater than 0".to_string(),
            ));
        }
        if self.breakeven_epsilon_usd < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "breakeven_epsilon_usd must not be negative".to_string(),
            ));
        }
        if self.breakeven_epsilon_percent < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "breakeven_epsilon_percent must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
