//! Text and JSON views of the build log and its statistics

use std::fmt::Write;

use serde::Serialize;

use crate::aggregate::Stats;
use crate::chart::ChartRenderer;
use crate::error::{BuildTimerError, Result};
use crate::event::{Event, EventTag};

/// Header line of the text dump
pub const DUMP_HEADER: &str = "INDEX|OPERATION TYPE|TIMESTAMP|[Note/Exit Code]";

/// Day/hour/minute/second/millisecond breakdown of a duration
pub fn format_duration(ms: u64) -> String {
    format!(
        "{} days, {} hours, {} minutes, {} seconds, {} milliseconds. ({} ms total)",
        ms / 86_400_000,
        (ms / 3_600_000) % 24,
        (ms / 60_000) % 60,
        (ms / 1000) % 60,
        ms % 1000,
        ms
    )
}

/// The `Build stats:` block
pub fn render_summary(stats: &Stats) -> String {
    let average = match stats.average_duration_ms() {
        Ok(ms) => format_duration(ms),
        Err(err) => err.to_string(),
    };

    let mut out = String::new();
    out.push_str("Build stats:\n");
    let _ = writeln!(out, "    Total build time: {}", format_duration(stats.total_duration_ms));
    let _ = writeln!(out, "    Avg build time: {}", average);
    let _ = writeln!(
        out,
        "    Last build time: {}",
        format_duration(stats.last_successful_duration_ms)
    );
    let _ = writeln!(out, "    Total build count: {}", stats.total_build_count);
    let _ = writeln!(out, "    Successful build count: {}", stats.successful_build_count);
    if stats.skewed_build_count > 0 {
        let _ = writeln!(out, "    Skewed build count: {}", stats.skewed_build_count);
    }
    out
}

/// Summary followed by the average and total per-day charts
pub fn render_stats_text(stats: &Stats, renderer: &ChartRenderer) -> Result<String> {
    let mut out = render_summary(stats);
    let charts = [
        ("Average", stats.average_series()),
        ("Total", stats.total_series()),
    ];
    for (label, series) in charts {
        let chart = match renderer.render(&series) {
            Ok(chart) => chart,
            Err(BuildTimerError::NoData) => continue,
            Err(err) => return Err(err),
        };
        let _ = writeln!(
            out,
            "\n{} build times for the last {} days ({} - {}):",
            label,
            series.len(),
            stats.first_day().unwrap_or_default(),
            stats.last_day().unwrap_or_default()
        );
        out.push_str(&chart);
    }
    Ok(out)
}

pub fn render_stats_json(stats: &Stats) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}

/// One `dump` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry<'a> {
    pub index: usize,
    pub tag: EventTag,
    pub timestamp_ms: i64,
    pub detail: &'a str,
}

impl<'a> DumpEntry<'a> {
    pub fn new(index: usize, event: &'a Event) -> Self {
        Self {
            index,
            tag: event.tag(),
            timestamp_ms: event.timestamp_ms(),
            detail: event.detail(),
        }
    }
}

/// `index|tag|timestamp|note-or-exit-code`, one line per event
pub fn render_dump_text(events: &[Event]) -> String {
    let mut out = String::new();
    out.push_str(DUMP_HEADER);
    out.push('\n');
    for (index, event) in events.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}|{}|{}|{}",
            index,
            event.tag().as_byte(),
            event.timestamp_ms(),
            event.detail()
        );
    }
    out
}

pub fn render_dump_json(events: &[Event]) -> Result<String> {
    let entries: Vec<DumpEntry<'_>> = events
        .iter()
        .enumerate()
        .map(|(i, e)| DumpEntry::new(i, e))
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
