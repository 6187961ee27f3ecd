//! # Trade Analytics Calculation Engine
//!
//! This crate turns a collection of raw journal `Trade` records (plus an
//! `EngineConfig`) into derived per-trade metrics and portfolio-level
//! aggregates: PnL, R-multiples, win rates, equity curve, drawdown, exit
//! classification, open-position exposure, a discipline score and a
//! per-local-day PnL calendar.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` and `configuration`
//!   (Layer 0).
//! - **Stateless Calculation:** Every component is a pure function of its
//!   inputs. Nothing here mutates a trade, performs I/O, or retains state
//!   between calls, which makes the engine trivially reproducible and easy
//!   to test.
//! - **Degrade, never fail:** malformed nested payloads are skipped, empty
//!   inputs produce zeroed reports, and undefined ratios are `None`; no
//!   computation in this crate panics or returns `NaN`.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the facade that composes all components into a
//!   single `JournalReport`.
//! - The individual calculators (`TradeMetricsCalculator`, `ExitClassifier`,
//!   `AggregateMetricsCalculator`, `EquityCurveBuilder`, `DrawdownAnalyzer`,
//!   `OpenPositionRiskAggregator`, `DisciplineScorer`, `DailyPnlAggregator`)
//!   for callers that only need one derived view.
//! - The value objects in `report`.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod calendar;
pub mod discipline;
pub mod drawdown;
pub mod engine;
pub mod equity;
pub mod error;
pub mod exit;
pub mod exposure;
pub mod metrics;
pub mod report;

#[cfg(test)]
mod test_util;

// Re-export the key components to create a clean, public-facing API.
pub use aggregate::AggregateMetricsCalculator;
pub use calendar::DailyPnlAggregator;
pub use discipline::DisciplineScorer;
pub use drawdown::DrawdownAnalyzer;
pub use engine::AnalyticsEngine;
pub use equity::EquityCurveBuilder;
pub use error::AnalyticsError;
pub use exit::{ExitClassifier, ExitReason};
pub use exposure::OpenPositionRiskAggregator;
pub use metrics::TradeMetricsCalculator;
pub use report::{
    AggregateMetrics, DailyBucket, DisciplineScore, DrawdownResult, EquityPoint, JournalReport,
    OpenExposure, TradeMetrics,
};
