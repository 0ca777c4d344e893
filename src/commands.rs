//! Operation dispatch: `start`, `stop`, `stat` and `dump`
//!
//! Every operation is a single open/operate/close pass over the log and
//! returns the text to print (empty for the recording operations).

use tracing::{info, warn};

use crate::aggregate::{BuildAggregator, Stats};
use crate::chart::ChartRenderer;
use crate::cli::{trim_text, Command, OutputFormat};
use crate::config::TimerConfig;
use crate::error::Result;
use crate::event::Event;
use crate::event_log::EventLog;
use crate::report;

/// Run one operation against the configured log
pub fn execute(command: &Command, config: &TimerConfig) -> Result<String> {
    match command {
        Command::Start { note } => {
            start(config, &note.join(" "))?;
            Ok(String::new())
        }
        Command::Stop { exit_code } => {
            stop(config, exit_code)?;
            Ok(String::new())
        }
        Command::Stat => stat(config),
        Command::Dump => dump(config),
    }
}

/// Append a start event stamped with the current time
pub fn start(config: &TimerConfig, note: &str) -> Result<Event> {
    let event = Event::start(config.clock.now_millis(), trim_text(note));
    EventLog::new(&config.log_path).append(&event)?;
    info!(timestamp_ms = event.timestamp_ms(), note = event.detail(), "Build started");
    Ok(event)
}

/// Append a stop event stamped with the current time
pub fn stop(config: &TimerConfig, exit_code: &str) -> Result<Event> {
    let event = Event::stop(config.clock.now_millis(), trim_text(exit_code));
    EventLog::new(&config.log_path).append(&event)?;
    info!(
        timestamp_ms = event.timestamp_ms(),
        exit_code = event.detail(),
        "Build stopped"
    );
    Ok(event)
}

/// Read the whole log, honouring the salvage setting
pub fn load_events(config: &TimerConfig) -> Result<Vec<Event>> {
    let scan = EventLog::new(&config.log_path).scan()?;
    if config.salvage {
        if let Some(corruption) = &scan.corruption {
            warn!(
                kept = scan.events.len(),
                offset = corruption.offset,
                "Ignoring corrupt tail of build log"
            );
        }
        return Ok(scan.events);
    }
    scan.into_events()
}

/// Aggregate the log as of the configured clock
pub fn compute_stats(config: &TimerConfig) -> Result<Stats> {
    let events = load_events(config)?;
    Ok(BuildAggregator::new(config.clock.now())
        .with_window_days(config.window_days)
        .aggregate(&events))
}

pub fn stat(config: &TimerConfig) -> Result<String> {
    let stats = compute_stats(config)?;
    match config.output_format {
        OutputFormat::Text => {
            report::render_stats_text(&stats, &ChartRenderer::with_height(config.chart_height))
        }
        OutputFormat::Json => report::render_stats_json(&stats),
    }
}

pub fn dump(config: &TimerConfig) -> Result<String> {
    let events = load_events(config)?;
    match config.output_format {
        OutputFormat::Text => Ok(report::render_dump_text(&events)),
        OutputFormat::Json => report::render_dump_json(&events),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Clock;
    use crate::error::BuildTimerError;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn config_at(dir: &TempDir, at: DateTime<Utc>) -> TimerConfig {
        TimerConfig::new(dir.path().join("t.db")).with_clock(Clock::Fixed(at))
    }

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_start_trims_note() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, nine_am());
        let event = start(&config, "  \tfirst build after xyz\t ").unwrap();
        assert_eq!(event, Event::start(nine_am().timestamp_millis(), "first build after xyz"));
        assert_eq!(load_events(&config).unwrap(), vec![event]);
    }

    #[test]
    fn test_start_stop_stat_round() {
        let dir = TempDir::new().unwrap();
        start(&config_at(&dir, nine_am()), "").unwrap();
        stop(&config_at(&dir, nine_am() + Duration::seconds(42)), "0").unwrap();

        let stats = compute_stats(&config_at(&dir, nine_am() + Duration::hours(1))).unwrap();
        assert_eq!(stats.total_build_count, 1);
        assert_eq!(stats.successful_build_count, 1);
        assert_eq!(stats.avg_duration_ms, Some(42_000));
        assert_eq!(stats.days[0].avg_duration_ms, 42_000);
    }

    #[test]
    fn test_execute_start_joins_words() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, nine_am());
        let out = execute(
            &Command::Start {
                note: vec!["two".into(), "words".into()],
            },
            &config,
        )
        .unwrap();
        assert!(out.is_empty());
        assert_eq!(load_events(&config).unwrap()[0].detail(), "two words");
    }

    #[test]
    fn test_stat_missing_log_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = stat(&config_at(&dir, nine_am())).unwrap_err();
        assert!(matches!(err, BuildTimerError::Io { .. }));
    }

    #[test]
    fn test_dump_after_corruption_fails_without_salvage() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, nine_am());
        start(&config, "").unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&config.log_path)
            .and_then(|mut f| std::io::Write::write_all(&mut f, &[1, 2, 3]))
            .unwrap();

        assert!(matches!(
            dump(&config).unwrap_err(),
            BuildTimerError::CorruptRecord { index: 1, .. }
        ));

        let salvaged = dump(&config.clone().with_salvage(true)).unwrap();
        assert_eq!(salvaged.lines().count(), 2);
    }

    #[test]
    fn test_stat_json_format() {
        let dir = TempDir::new().unwrap();
        let config = config_at(&dir, nine_am()).with_output_format(OutputFormat::Json);
        start(&config, "").unwrap();
        let out = stat(&config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total_build_count"], 0);
    }
}
