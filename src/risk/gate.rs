//! Order admission gate.
//!
//! Executor wrapper that consults both guards before every order: the daily
//! stop loss and the news blackout filter. This is the seam the trading
//! engine plugs into; the wrapper owns no execution logic of its own.

use crate::config::GuardConfig;
use crate::news::NewsFilter;
use crate::risk::RiskManager;
use crate::types::OrderSide;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::warn;

/// Opaque exchange order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors surfaced by the execution seam.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A guard refused admission; no order was sent.
    #[error("order blocked: {0}")]
    Blocked(String),

    /// Failure from the underlying exchange client.
    #[error("exchange error: {0}")]
    Exchange(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Order submission capability provided by the trading engine's exchange
/// client.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Result<OrderId, ExecError>;
}

/// Executor wrapper that enforces the daily stop loss and the news blackout.
///
/// Guard state is shared behind a single lock per component so a day
/// rollover and the read that follows it are always observed together; a
/// race between rollover and accumulation could otherwise attribute a trade
/// result to the wrong day.
pub struct RiskGatedExecutor<E> {
    inner: Arc<E>,
    risk: Arc<Mutex<RiskManager>>,
    news: Arc<Mutex<NewsFilter>>,
    config: Arc<Mutex<GuardConfig>>,
}

// Guard state must stay reachable even if a panicking holder poisoned the
// lock; the counters themselves are always left consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E: Executor> RiskGatedExecutor<E> {
    pub fn new(
        inner: Arc<E>,
        risk: Arc<Mutex<RiskManager>>,
        news: Arc<Mutex<NewsFilter>>,
        config: Arc<Mutex<GuardConfig>>,
    ) -> Self {
        Self {
            inner,
            risk,
            news,
            config,
        }
    }

    /// Report the realized PnL of one closed trade.
    ///
    /// Caller contract: exactly once per closed trade, after the final
    /// realized PnL is known.
    pub fn record_trade_result(&self, pnl: Decimal) {
        lock(&self.risk).record_trade_result(pnl);
    }

    /// Status lines for both guards, for operator display.
    pub fn status(&self) -> String {
        let config = lock(&self.config).clone();
        let risk_line = lock(&self.risk).status(&config);
        let news_line = lock(&self.news).status(&config);
        format!("{risk_line}\n{news_line}")
    }
}

#[async_trait]
impl<E: Executor> Executor for RiskGatedExecutor<E> {
    async fn execute_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Result<OrderId, ExecError> {
        let config = lock(&self.config).clone();

        let verdict = lock(&self.risk).can_trade(&config);
        if !verdict.is_allowed() {
            warn!(
                symbol,
                side = %side,
                quantity = %quantity,
                reason = %verdict,
                "Order blocked by daily stop loss"
            );
            return Err(ExecError::Blocked(verdict.reason()));
        }

        let (blackout, reason) = lock(&self.news).is_blackout(symbol, &config);
        if blackout {
            warn!(symbol, reason = %reason, "Order blocked by news filter");
            return Err(ExecError::Blocked(reason));
        }

        self.inner.execute_order(symbol, side, quantity, price).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone)]
    struct MockClock {
        today: Arc<Mutex<NaiveDate>>,
    }

    impl MockClock {
        fn new(date: NaiveDate) -> Self {
            Self {
                today: Arc::new(Mutex::new(date)),
            }
        }

        fn advance_days(&self, days: i64) {
            let mut today = self.today.lock().unwrap();
            *today += Duration::days(days);
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            let date = *self.today.lock().unwrap();
            DateTime::from_naive_utc_and_offset(date.and_hms_opt(9, 30, 0).unwrap(), Utc)
        }
    }

    struct MockExecutor;

    #[async_trait]
    impl Executor for MockExecutor {
        async fn execute_order(
            &self,
            _symbol: &str,
            _side: OrderSide,
            _quantity: Decimal,
            _price: Option<Decimal>,
        ) -> Result<OrderId, ExecError> {
            Ok(OrderId::new("mock-order"))
        }
    }

    fn build_gate(clock: MockClock, limit: Decimal) -> RiskGatedExecutor<MockExecutor> {
        let config = GuardConfig {
            daily_stop_loss: limit,
            ..GuardConfig::default()
        };
        RiskGatedExecutor::new(
            Arc::new(MockExecutor),
            Arc::new(Mutex::new(RiskManager::new(Box::new(clock.clone())))),
            Arc::new(Mutex::new(NewsFilter::new(Box::new(clock)))),
            Arc::new(Mutex::new(config)),
        )
    }

    #[tokio::test]
    async fn test_orders_pass_while_under_limit() {
        let clock = MockClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let gate = build_gate(clock, dec!(100));

        gate.record_trade_result(dec!(-99.99));
        let result = gate
            .execute_order("EUR-USD", OrderSide::Buy, dec!(1), None)
            .await;
        assert_eq!(result.unwrap(), OrderId::new("mock-order"));
    }

    #[tokio::test]
    async fn test_orders_blocked_after_breach() {
        let clock = MockClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let gate = build_gate(clock, dec!(100));

        gate.record_trade_result(dec!(-150));
        let result = gate
            .execute_order("EUR-USD", OrderSide::Sell, dec!(1), None)
            .await;

        match result {
            Err(ExecError::Blocked(reason)) => {
                assert!(reason.contains("daily stop loss hit"));
            }
            other => panic!("expected Blocked, got {:?}", other.map(|id| id.to_string())),
        }
    }

    #[tokio::test]
    async fn test_rollover_unblocks_orders() {
        let clock = MockClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let gate = build_gate(clock.clone(), dec!(100));

        gate.record_trade_result(dec!(-150));
        assert!(gate
            .execute_order("EUR-USD", OrderSide::Buy, dec!(1), None)
            .await
            .is_err());

        clock.advance_days(1);
        assert!(gate
            .execute_order("EUR-USD", OrderSide::Buy, dec!(1), None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_status_reports_both_guards() {
        let clock = MockClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let gate = build_gate(clock, dec!(100));

        let status = gate.status();
        assert!(status.contains("daily pnl"));
        assert!(status.contains("news filter"));
    }
}
