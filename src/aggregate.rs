//! Build statistics from a flat event sequence
//!
//! Adjacent `Start` → `Stop` events form one build. Everything else is an
//! anomalous attempt: it still counts toward the total but carries no
//! duration. Successful builds are also bucketed by the UTC calendar date of
//! their start time over a trailing window of days.
//!
//! # Algorithm
//!
//! ```text
//! for i in 1..n:
//!     if events[i-1] is Start and events[i] is Stop  -> build
//!     elif events[i] is Start and events[i+1] is Stop -> skip (next step pairs it)
//!     else                                            -> anomalous attempt
//! ```
//!
//! The event at index 0 is only ever looked at as the first half of a pair,
//! so a lone leading event is never counted.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BuildTimerError, Result};
use crate::event::Event;

/// Number of days covered by the per-day statistics
pub const DEFAULT_WINDOW_DAYS: usize = 120;

/// Successful build durations for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// `D.M.YYYY`, UTC, no zero padding
    pub date: String,
    /// Successful builds started on this date
    pub success_count: u64,
    pub total_duration_ms: u64,
    /// `total_duration_ms / success_count`, 0 for a day without builds
    pub avg_duration_ms: u64,
}

impl DayBucket {
    fn empty(date: String) -> Self {
        Self {
            date,
            success_count: 0,
            total_duration_ms: 0,
            avg_duration_ms: 0,
        }
    }
}

/// Aggregated build statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Paired builds plus anomalous unpaired events
    pub total_build_count: u64,
    pub successful_build_count: u64,
    /// Pairs whose stop precedes their start; counted as attempts only
    pub skewed_build_count: u64,
    /// Events that could not be paired
    pub unmatched_event_count: u64,
    pub total_duration_ms: u64,
    /// `None` until at least one build succeeded
    pub avg_duration_ms: Option<u64>,
    pub last_successful_duration_ms: u64,
    /// Index 0 is today, the last entry is the oldest day in the window
    pub days: Vec<DayBucket>,
}

impl Stats {
    /// Overall average, or an error when nothing has succeeded yet
    pub fn average_duration_ms(&self) -> Result<u64> {
        self.avg_duration_ms
            .ok_or(BuildTimerError::NoSuccessfulBuilds)
    }

    /// Per-day averages, newest first
    pub fn average_series(&self) -> Vec<(String, u64)> {
        self.days
            .iter()
            .map(|d| (d.date.clone(), d.avg_duration_ms))
            .collect()
    }

    /// Per-day totals, newest first
    pub fn total_series(&self) -> Vec<(String, u64)> {
        self.days
            .iter()
            .map(|d| (d.date.clone(), d.total_duration_ms))
            .collect()
    }

    /// Oldest date covered by the window
    pub fn first_day(&self) -> Option<&str> {
        self.days.last().map(|d| d.date.as_str())
    }

    /// Newest date covered by the window (today)
    pub fn last_day(&self) -> Option<&str> {
        self.days.first().map(|d| d.date.as_str())
    }
}

/// Format an instant as the `D.M.YYYY` bucket key
pub fn day_key(at: DateTime<Utc>) -> String {
    format!("{}.{}.{}", at.day(), at.month(), at.year())
}

/// Day key for an epoch-millisecond timestamp, if it is representable
pub fn day_key_for_millis(timestamp_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map(day_key)
}

/// Pairs events into builds and computes overall and per-day statistics
#[derive(Debug, Clone)]
pub struct BuildAggregator {
    now: DateTime<Utc>,
    window_days: usize,
}

impl BuildAggregator {
    /// Aggregator whose day window ends on the date of `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, window_days: usize) -> Self {
        self.window_days = window_days;
        self
    }

    /// Empty buckets for today back through `window_days - 1` days ago
    fn day_window(&self) -> Vec<DayBucket> {
        (0..self.window_days)
            .map(|d| DayBucket::empty(day_key(self.now - Duration::days(d as i64))))
            .collect()
    }

    pub fn aggregate(&self, events: &[Event]) -> Stats {
        let mut days = self.day_window();
        let slots: HashMap<String, usize> = days
            .iter()
            .enumerate()
            .map(|(i, d)| (d.date.clone(), i))
            .collect();

        let mut stats = Stats {
            total_build_count: 0,
            successful_build_count: 0,
            skewed_build_count: 0,
            unmatched_event_count: 0,
            total_duration_ms: 0,
            avg_duration_ms: None,
            last_successful_duration_ms: 0,
            days: Vec::new(),
        };

        for i in 1..events.len() {
            let current = &events[i];
            match (&events[i - 1], current) {
                (
                    Event::Start {
                        timestamp_ms: started,
                        ..
                    },
                    Event::Stop {
                        timestamp_ms: stopped,
                        ..
                    },
                ) => {
                    stats.total_build_count += 1;

                    let duration = stopped.saturating_sub(*started);
                    if duration < 0 {
                        warn!(
                            index = i,
                            started = *started,
                            stopped = *stopped,
                            "Stop recorded before its start, skipping duration"
                        );
                        stats.skewed_build_count += 1;
                        continue;
                    }
                    if !current.is_success() {
                        continue;
                    }

                    let duration = duration as u64;
                    stats.successful_build_count += 1;
                    stats.total_duration_ms = stats.total_duration_ms.saturating_add(duration);
                    stats.last_successful_duration_ms = duration;

                    if let Some(&slot) = day_key_for_millis(*started)
                        .as_ref()
                        .and_then(|key| slots.get(key))
                    {
                        let bucket = &mut days[slot];
                        bucket.success_count += 1;
                        bucket.total_duration_ms =
                            bucket.total_duration_ms.saturating_add(duration);
                    }
                }
                _ => {
                    let pairs_next = current.is_start()
                        && events.get(i + 1).is_some_and(Event::is_stop);
                    if !pairs_next {
                        stats.total_build_count += 1;
                        stats.unmatched_event_count += 1;
                    }
                }
            }
        }

        stats.avg_duration_ms = stats
            .total_duration_ms
            .checked_div(stats.successful_build_count);

        for bucket in &mut days {
            bucket.avg_duration_ms = bucket
                .total_duration_ms
                .checked_div(bucket.success_count)
                .unwrap_or(0);
        }
        stats.days = days;

        debug!(
            events = events.len(),
            total = stats.total_build_count,
            successful = stats.successful_build_count,
            unmatched = stats.unmatched_event_count,
            skewed = stats.skewed_build_count,
            "Aggregated build log"
        );
        stats
    }
}
