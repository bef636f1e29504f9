//! Daily risk manager.
//!
//! Tracks cumulative realized PnL for the current trading day and decides
//! whether new trades may be opened. Once `daily_pnl <= -limit` the day is
//! stopped; the only way back to active is the next calendar-day rollover.
//!
//! # Architecture
//!
//! - Day-scoped accumulator: PnL plus win/loss counters
//! - Rollover check runs at the start of every public operation
//! - Admission rule: inclusive threshold, `limit == 0` disables the check
//!
//! State lives for the process lifetime and is not persisted; counters reset
//! on restart as well as on rollover.

use crate::clock::Clock;
use crate::config::GuardConfig;
use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

/// Errors raised at the risk manager boundary.
#[derive(Debug, Error)]
pub enum RiskError {
    /// NaN or infinite PnL from the caller. The accumulator is left
    /// untouched; silently absorbing a non-finite value would corrupt
    /// every later admission decision.
    #[error("non-finite pnl rejected: {0}")]
    NonFinitePnl(f64),
}

/// Admission decision returned by [`RiskManager::can_trade`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeVerdict {
    /// Trading allowed.
    Allowed,
    /// Daily stop loss breached; blocked for the rest of the day.
    StopLossHit { daily_pnl: Decimal, limit: Decimal },
}

impl TradeVerdict {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Human-readable reason, `"OK"` when allowed.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for TradeVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allowed => write!(f, "OK"),
            Self::StopLossHit { daily_pnl, limit } => {
                write!(f, "daily stop loss hit: {} vs limit -{}", daily_pnl, limit)
            }
        }
    }
}

/// Day-scoped risk accumulator.
///
/// Constructed explicitly and injected into the trading engine's decision
/// loop; tests get a fresh instance with a mock clock. Not internally
/// synchronized: callers sharing one instance across tasks must wrap it in
/// a single lock so a rollover and the read/write that follows it are
/// observed together.
pub struct RiskManager {
    daily_pnl: Decimal,
    daily_wins: u32,
    daily_losses: u32,
    last_reset_date: NaiveDate,
    clock: Box<dyn Clock>,
}

impl RiskManager {
    /// Create a manager with zeroed counters dated to today.
    pub fn new(clock: Box<dyn Clock>) -> Self {
        let today = clock.today();
        info!(date = %today, "RiskManager initialized");
        Self {
            daily_pnl: Decimal::ZERO,
            daily_wins: 0,
            daily_losses: 0,
            last_reset_date: today,
            clock,
        }
    }

    /// Reset counters if a new calendar day has started.
    ///
    /// Idempotent within a day. A clock skipped forward by several days
    /// resets exactly once, to the latest date; there is no per-day
    /// catch-up.
    fn check_day_rollover(&mut self) {
        let today = self.clock.today();
        if today > self.last_reset_date {
            info!(
                previous_day_pnl = %self.daily_pnl,
                date = %today,
                "New day detected, resetting daily counters"
            );
            self.daily_pnl = Decimal::ZERO;
            self.daily_wins = 0;
            self.daily_losses = 0;
            self.last_reset_date = today;
        }
    }

    /// Record the realized result of one closed trade.
    ///
    /// Exact decimal addition; a PnL of exactly zero counts as a loss.
    pub fn record_trade_result(&mut self, pnl: Decimal) {
        self.check_day_rollover();
        self.daily_pnl += pnl;
        if pnl > Decimal::ZERO {
            self.daily_wins += 1;
        } else {
            self.daily_losses += 1;
        }
        info!(
            daily_pnl = %self.daily_pnl,
            wins = self.daily_wins,
            losses = self.daily_losses,
            "Daily PnL updated"
        );
    }

    /// Boundary adapter for callers holding float PnL.
    ///
    /// # Errors
    /// Returns [`RiskError::NonFinitePnl`] for NaN or infinite input,
    /// leaving the accumulator unchanged.
    pub fn record_trade_result_f64(&mut self, pnl: f64) -> Result<(), RiskError> {
        let pnl = Decimal::from_f64(pnl).ok_or(RiskError::NonFinitePnl(pnl))?;
        self.record_trade_result(pnl);
        Ok(())
    }

    /// Whether a new trade may be opened under the daily stop loss.
    ///
    /// The threshold is inclusive: hitting the limit exactly blocks trading.
    pub fn can_trade(&mut self, config: &GuardConfig) -> TradeVerdict {
        self.check_day_rollover();
        let limit = config.effective_stop_loss();
        if self.stopped(limit) {
            TradeVerdict::StopLossHit {
                daily_pnl: self.daily_pnl,
                limit,
            }
        } else {
            TradeVerdict::Allowed
        }
    }

    /// One-line status report: daily PnL, configured limit, active/stopped.
    pub fn status(&mut self, config: &GuardConfig) -> String {
        self.check_day_rollover();
        let limit = config.effective_stop_loss();
        let label = if self.stopped(limit) { "stopped" } else { "active" };
        format!(
            "daily pnl: {} | stop loss: -{} | status: {}",
            self.daily_pnl, limit, label
        )
    }

    // Single threshold predicate shared by can_trade and status.
    fn stopped(&self, limit: Decimal) -> bool {
        limit > Decimal::ZERO && self.daily_pnl <= -limit
    }

    /// Cumulative realized PnL for the current day.
    #[must_use]
    pub fn daily_pnl(&self) -> Decimal {
        self.daily_pnl
    }

    /// Trades closed with positive PnL since the last reset.
    #[must_use]
    pub fn daily_wins(&self) -> u32 {
        self.daily_wins
    }

    /// Trades closed with PnL <= 0 since the last reset.
    #[must_use]
    pub fn daily_losses(&self) -> u32 {
        self.daily_losses
    }

    /// Date as of the most recent reset.
    #[must_use]
    pub fn last_reset_date(&self) -> NaiveDate {
        self.last_reset_date
    }
}
