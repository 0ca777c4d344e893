//! Immutable run configuration
//!
//! Built once from the command line and handed by reference to every
//! operation.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::aggregate::DEFAULT_WINDOW_DAYS;
use crate::chart::DEFAULT_CHART_HEIGHT;
use crate::cli::OutputFormat;

/// Source of "now" for timestamps and the statistics window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Settings shared by all build timer operations
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Build log file
    pub log_path: PathBuf,
    pub output_format: OutputFormat,
    /// Use the records before a corrupt one instead of failing
    pub salvage: bool,
    pub window_days: usize,
    pub chart_height: usize,
    pub clock: Clock,
}

impl TimerConfig {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            output_format: OutputFormat::Text,
            salvage: false,
            window_days: DEFAULT_WINDOW_DAYS,
            chart_height: DEFAULT_CHART_HEIGHT,
            clock: Clock::System,
        }
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_salvage(mut self, salvage: bool) -> Self {
        self.salvage = salvage;
        self
    }

    /// Pin "now" to a fixed instant
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}
