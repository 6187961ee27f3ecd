use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enums::Direction;
use crate::error::CoreError;

/// A single DCA add against an already-open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddEvent {
    /// The fill price of the add.
    pub price: Decimal,
    /// The notional size of the add, in USD.
    pub size_usd: Decimal,
    /// When the add was executed. Optional: legacy records omit it.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A partial exit taken while the trade remains open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialClose {
    /// The realized PnL of this partial exit, in USD.
    pub pnl_usd: Decimal,
    /// When the partial exit was executed.
    pub timestamp: DateTime<Utc>,
}

/// The decode result of a nested collection that the persistence layer may
/// store either as a native JSON array or as a JSON-encoded string.
///
/// `Malformed` records that the payload existed but could not be parsed.
/// Downstream consumers must treat `Malformed` exactly like `Empty`: a
/// broken add history degrades the trade to its plain entry price, it never
/// fails the computation.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesField<T> {
    Parsed(Vec<T>),
    Empty,
    Malformed,
}

impl<T> Default for SeriesField<T> {
    fn default() -> Self {
        SeriesField::Empty
    }
}

impl<T> SeriesField<T> {
    /// Returns the decoded items, with `Empty` and `Malformed` both
    /// degrading to an empty slice.
    pub fn items(&self) -> &[T] {
        match self {
            SeriesField::Parsed(items) => items,
            SeriesField::Empty | SeriesField::Malformed => &[],
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, SeriesField::Malformed)
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl<T> SeriesField<T>
where
    T: DeserializeOwned,
{
    /// Decodes a raw JSON value into a series. Accepts a native array, a
    /// JSON-encoded string, `null`, or an empty string; anything else (or an
    /// unparseable payload) becomes `Malformed`.
    fn from_raw(raw: Option<serde_json::Value>) -> Self {
        let value = match raw {
            None | Some(serde_json::Value::Null) => return SeriesField::Empty,
            Some(serde_json::Value::String(text)) => {
                if text.trim().is_empty() {
                    return SeriesField::Empty;
                }
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(inner) => inner,
                    Err(err) => {
                        tracing::warn!(%err, "discarding unparseable serialized series field");
                        return SeriesField::Malformed;
                    }
                }
            }
            Some(value) => value,
        };

        match serde_json::from_value::<Vec<T>>(value) {
            Ok(items) if items.is_empty() => SeriesField::Empty,
            Ok(items) => SeriesField::Parsed(items),
            Err(err) => {
                tracing::warn!(%err, "discarding malformed series field");
                SeriesField::Malformed
            }
        }
    }
}

impl<'de, T> Deserialize<'de> for SeriesField<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(SeriesField::from_raw(raw))
    }
}

impl<T> Serialize for SeriesField<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.items())
    }
}

/// A single journal entry: one position from entry to (eventual) exit,
/// together with the planning and review fields the trader filled in.
///
/// This record is externally owned: the persistence layer creates, mutates
/// and deletes it. The analytics engine only ever reads it. Every optional
/// field defaults when absent so that partial records never fail to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub coin: String,
    pub direction: Direction,

    // --- Pricing ---
    pub entry_price: Decimal,
    /// Present iff the trade is closed.
    #[serde(default)]
    pub close_price: Option<Decimal>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub take_price: Option<Decimal>,

    // --- Sizing ---
    /// Notional position size in USD.
    pub position_size: Decimal,
    /// Account balance when the position was opened. Falls back to the
    /// configured starting balance when absent.
    #[serde(default)]
    pub account_balance_at_entry: Option<Decimal>,

    /// Realized PnL as recorded by the journal. When present it is
    /// authoritative and the engine never recomputes it from prices.
    #[serde(default)]
    pub pnl_usd: Option<Decimal>,

    // --- Risk provenance (first present-and-positive wins) ---
    #[serde(default)]
    pub original_risk_usd: Option<Decimal>,
    #[serde(default)]
    pub max_risk_usd: Option<Decimal>,
    #[serde(default)]
    pub risk_usd: Option<Decimal>,

    // --- DCA history ---
    /// The entry price before any adds were averaged in.
    #[serde(default)]
    pub original_entry_price: Option<Decimal>,
    #[serde(default)]
    pub adds_history: SeriesField<AddEvent>,

    /// Partial exits taken while the trade is still open. Ignored once the
    /// trade has a close price.
    #[serde(default)]
    pub partial_closes: SeriesField<PartialClose>,

    // --- Compliance / psychology (consumed, never computed) ---
    #[serde(default)]
    pub rule_compliance: Option<bool>,
    #[serde(default)]
    pub entry_reason: Option<String>,
    #[serde(default)]
    pub trade_analysis: Option<String>,
    #[serde(default)]
    pub violation_tags: Option<Vec<String>>,
    #[serde(default)]
    pub strategy_tag: Option<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub confidence_level: Option<u32>,
    #[serde(default)]
    pub emotional_state: Option<String>,

    // --- Timestamps ---
    /// When the position was opened.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub date_close: Option<DateTime<Utc>>,
}

impl Trade {
    /// A trade is closed iff it has a close price.
    pub fn is_closed(&self) -> bool {
        self.close_price.is_some()
    }

    pub fn is_open(&self) -> bool {
        !self.is_closed()
    }

    /// The account balance this trade's percentage figures are computed
    /// against, falling back to the supplied default.
    pub fn balance_or(&self, default: Decimal) -> Decimal {
        self.account_balance_at_entry
            .filter(|balance| *balance > Decimal::ZERO)
            .unwrap_or(default)
    }

    /// The timestamp a closed trade's realized PnL is booked at.
    pub fn close_timestamp(&self) -> DateTime<Utc> {
        self.date_close.unwrap_or(self.date)
    }

    /// Checks the fields the engine cannot meaningfully compute without.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.entry_price <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "entry_price".to_string(),
                format!("must be positive, got {}", self.entry_price),
            ));
        }
        if self.position_size <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "position_size".to_string(),
                format!("must be positive, got {}", self.position_size),
            ));
        }
        Ok(())
    }
}
