//! Risk Governor Module
//!
//! Daily stop-loss enforcement plus the caller-facing admission gate.

mod gate;
mod manager;

pub use gate::{ExecError, Executor, OrderId, RiskGatedExecutor};
pub use manager::{RiskError, RiskManager, TradeVerdict};
