//! Build timer events
//!
//! A log is a flat sequence of `Start`/`Stop` records. An event's identity is
//! its position in the log; nothing is ever rewritten in place.

use serde::{Deserialize, Serialize};

/// Exit code text that marks a build as successful
pub const SUCCESS_EXIT_CODE: &str = "0";

/// On-disk tag byte for each event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum EventTag {
    Start = 0,
    Stop = 1,
}

impl EventTag {
    /// Map a raw tag byte back to a kind
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(EventTag::Start),
            1 => Some(EventTag::Stop),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A single persisted build event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Event {
    /// A build was started, optionally annotated with a free-form note
    Start { timestamp_ms: i64, note: String },
    /// A build finished with the given exit code text (e.g. "0", "32")
    Stop { timestamp_ms: i64, exit_code: String },
}

impl Event {
    pub fn start(timestamp_ms: i64, note: impl Into<String>) -> Self {
        Event::Start {
            timestamp_ms,
            note: note.into(),
        }
    }

    pub fn stop(timestamp_ms: i64, exit_code: impl Into<String>) -> Self {
        Event::Stop {
            timestamp_ms,
            exit_code: exit_code.into(),
        }
    }

    pub fn tag(&self) -> EventTag {
        match self {
            Event::Start { .. } => EventTag::Start,
            Event::Stop { .. } => EventTag::Stop,
        }
    }

    /// Epoch milliseconds at which the event was recorded
    pub fn timestamp_ms(&self) -> i64 {
        match self {
            Event::Start { timestamp_ms, .. } | Event::Stop { timestamp_ms, .. } => *timestamp_ms,
        }
    }

    /// The note of a start event or the exit code of a stop event
    pub fn detail(&self) -> &str {
        match self {
            Event::Start { note, .. } => note,
            Event::Stop { exit_code, .. } => exit_code,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Event::Start { .. })
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Event::Stop { .. })
    }

    /// True for a stop event whose exit code is exactly "0"
    pub fn is_success(&self) -> bool {
        matches!(self, Event::Stop { exit_code, .. } if exit_code == SUCCESS_EXIT_CODE)
    }
}
