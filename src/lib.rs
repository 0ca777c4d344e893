//! buildtimer - track the time spent waiting for builds
//!
//! Build start/stop events are appended to a compact binary log. Statistics
//! (counts, total/average/last duration and a 120-day per-day history) are
//! rebuilt from the full log on every read and drawn as ASCII charts.

pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod event;
pub mod event_log;
pub mod report;

pub use error::{BuildTimerError, Result};
pub use event::Event;
