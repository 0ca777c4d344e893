//! Append-only build event log backed by a single file
//!
//! Each call opens the file, does its work and closes it again; nothing is
//! held open between operations and no locking is attempted. Writers must
//! not run concurrently against the same file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codec::{self, CodecError, Decoder};
use crate::error::{BuildTimerError, Result};
use crate::event::Event;

/// Position and cause of the first undecodable record in a log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corruption {
    /// Index the corrupt record would have had
    pub index: usize,
    /// Byte offset where the corrupt record starts
    pub offset: usize,
    pub cause: CodecError,
}

impl From<Corruption> for BuildTimerError {
    fn from(c: Corruption) -> Self {
        BuildTimerError::CorruptRecord {
            index: c.index,
            offset: c.offset,
            source: c.cause,
        }
    }
}

/// Result of scanning a log: every record decoded before the first bad one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogScan {
    pub events: Vec<Event>,
    pub corruption: Option<Corruption>,
}

impl LogScan {
    /// Fail on corruption, otherwise hand back the events
    pub fn into_events(self) -> Result<Vec<Event>> {
        match self.corruption {
            Some(c) => Err(c.into()),
            None => Ok(self.events),
        }
    }
}

/// Handle on a build log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one encoded record, creating the file on first use
    pub fn append(&self, event: &Event) -> Result<()> {
        let record = codec::encode(event);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error("open", source))?;
        file.write_all(&record)
            .map_err(|source| self.io_error("append to", source))?;

        debug!(
            path = %self.path.display(),
            tag = ?event.tag(),
            bytes = record.len(),
            "Appended build event"
        );
        Ok(())
    }

    /// Read every event, failing if any record is corrupt
    pub fn read_all(&self) -> Result<Vec<Event>> {
        self.scan()?.into_events()
    }

    /// Decode records in order, stopping at the first corrupt one
    ///
    /// Records before the corrupt position are returned intact, so a write
    /// that was cut short only costs the last record.
    pub fn scan(&self) -> Result<LogScan> {
        let bytes = fs::read(&self.path).map_err(|source| self.io_error("read", source))?;
        let scan = scan_bytes(&bytes);

        match &scan.corruption {
            Some(c) => warn!(
                path = %self.path.display(),
                index = c.index,
                offset = c.offset,
                error = %c.cause,
                "Corrupt build log record, stopping read"
            ),
            None => debug!(
                path = %self.path.display(),
                events = scan.events.len(),
                bytes = bytes.len(),
                "Read build log"
            ),
        }
        Ok(scan)
    }

    fn io_error(&self, action: &'static str, source: std::io::Error) -> BuildTimerError {
        BuildTimerError::Io {
            action,
            path: self.path.clone(),
            source,
        }
    }
}

/// Decode a whole in-memory log
pub fn scan_bytes(bytes: &[u8]) -> LogScan {
    let mut decoder = Decoder::new(bytes);
    let mut scan = LogScan::default();
    loop {
        let offset = decoder.offset();
        match decoder.next_event() {
            Ok(Some(event)) => scan.events.push(event),
            Ok(None) => break,
            Err(cause) => {
                scan.corruption = Some(Corruption {
                    index: scan.events.len(),
                    offset,
                    cause,
                });
                break;
            }
        }
    }
    scan
}
