//! Economic-news blackout filter.
//!
//! Guards against opening positions around high-impact economic events.
//! The calendar feed is a stub today: a refresh installs an empty event
//! list, so the filter only ever reports "no event". The event shape and
//! the staleness plumbing are the seam a real feed plugs into.

use crate::clock::Clock;
use crate::config::GuardConfig;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// Impact rating as reported by the calendar feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventImpact {
    Low,
    Medium,
    High,
}

/// One scheduled economic calendar entry.
#[derive(Debug, Clone)]
pub struct NewsEvent {
    /// Currency the event concerns (e.g. "USD").
    pub currency: String,
    pub impact: EventImpact,
    pub scheduled_at: DateTime<Utc>,
}

/// Calendar refresh interval.
const FETCH_INTERVAL_HOURS: i64 = 6;

/// Blackout-window guard over an economic calendar.
pub struct NewsFilter {
    events: Vec<NewsEvent>,
    last_fetch: Option<DateTime<Utc>>,
    watched_currencies: Vec<String>,
    clock: Box<dyn Clock>,
}

impl NewsFilter {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            events: Vec::new(),
            last_fetch: None,
            watched_currencies: ["USD", "EUR", "GBP"].map(String::from).to_vec(),
            clock,
        }
    }

    /// Refresh the economic calendar.
    ///
    /// Stub: no reliable free feed is wired up yet, so this installs an
    /// empty event list and records the fetch time.
    pub fn fetch_calendar(&mut self) {
        self.events.clear();
        self.last_fetch = Some(self.clock.now());
        info!("News calendar fetch simulated, no events installed");
    }

    fn calendar_stale(&self) -> bool {
        match self.last_fetch {
            None => true,
            Some(fetched_at) => {
                self.clock.now() - fetched_at > Duration::hours(FETCH_INTERVAL_HOURS)
            }
        }
    }

    /// Whether `asset` is inside a news blackout window right now.
    ///
    /// Returns the decision and a reason string for the caller's logs.
    /// With the filter disabled the calendar is not consulted at all.
    pub fn is_blackout(&mut self, asset: &str, config: &GuardConfig) -> (bool, String) {
        if !config.news_filter_on {
            return (false, "filter off".to_string());
        }

        if self.calendar_stale() {
            self.fetch_calendar();
        }

        // Event matching lands with a real feed: an asset is blacked out
        // while a watched-currency event's window covers the current time.
        let _ = asset;

        (false, "no event".to_string())
    }

    /// Toggle the filter in the shared configuration.
    pub fn set_enabled(&self, config: &mut GuardConfig, enabled: bool) {
        config.news_filter_on = enabled;
        info!(enabled, "News filter toggled");
    }

    /// Currencies checked against traded assets once a real feed lands.
    #[must_use]
    pub fn watched_currencies(&self) -> &[String] {
        &self.watched_currencies
    }

    /// Events currently loaded from the calendar.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// One-line on/off status report.
    pub fn status(&self, config: &GuardConfig) -> String {
        let state = if config.news_filter_on { "on" } else { "off" };
        format!("news filter: {state}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;

    #[test]
    fn test_disabled_filter_short_circuits() {
        let mut filter = NewsFilter::new(Box::new(SystemClock));
        let config = GuardConfig::default();

        let (blackout, reason) = filter.is_blackout("EURUSD", &config);
        assert!(!blackout);
        assert_eq!(reason, "filter off");
        // Calendar untouched when disabled
        assert!(filter.calendar_stale());
    }

    #[test]
    fn test_enabled_filter_fetches_and_reports_no_event() {
        let mut filter = NewsFilter::new(Box::new(SystemClock));
        let config = GuardConfig {
            news_filter_on: true,
            ..GuardConfig::default()
        };

        let (blackout, reason) = filter.is_blackout("EURUSD", &config);
        assert!(!blackout);
        assert_eq!(reason, "no event");
        assert!(!filter.calendar_stale());
        assert_eq!(filter.event_count(), 0);
    }

    #[test]
    fn test_toggle_updates_config() {
        let filter = NewsFilter::new(Box::new(SystemClock));
        let mut config = GuardConfig::default();

        filter.set_enabled(&mut config, true);
        assert!(config.news_filter_on);
        assert_eq!(filter.status(&config), "news filter: on");

        filter.set_enabled(&mut config, false);
        assert!(!config.news_filter_on);
        assert_eq!(filter.status(&config), "news filter: off");
    }

    #[test]
    fn test_watched_currencies_default() {
        let filter = NewsFilter::new(Box::new(SystemClock));
        assert_eq!(filter.watched_currencies(), &["USD", "EUR", "GBP"]);
    }
}
