//! RiskGate
//!
//! Per-day risk governor for an automated trading bot. Tracks realized PnL
//! across the trading day and refuses new orders once the configured daily
//! stop loss is breached; counters reset at the first operation observed
//! after a calendar-day boundary.
//!
//! Two guards are consulted at the same call site before every order:
//! the [`risk::RiskManager`] (daily stop loss) and the [`news::NewsFilter`]
//! (economic-event blackout windows, currently a stub feed).
//!
//! # Example
//!
//! ```ignore
//! use riskgate::clock::SystemClock;
//! use riskgate::config::GuardConfig;
//! use riskgate::risk::RiskManager;
//! use rust_decimal_macros::dec;
//!
//! let config = GuardConfig {
//!     daily_stop_loss: dec!(15),
//!     ..GuardConfig::default()
//! };
//! let mut risk = RiskManager::new(Box::new(SystemClock));
//!
//! // After each closed trade
//! risk.record_trade_result(dec!(-20));
//!
//! // Before placing new orders
//! let verdict = risk.can_trade(&config);
//! if !verdict.is_allowed() {
//!     tracing::warn!(reason = %verdict, "trading halted for the day");
//! }
//! ```

pub mod clock;
pub mod config;
pub mod news;
pub mod risk;
pub mod types;
