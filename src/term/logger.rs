//! A [`log`] backend that keeps the latest messages in memory, so they can be
//! shown inside of the raw mode terminal.
use std::collections::VecDeque;

use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// The amount of lines that are kept.
const CAPACITY: usize = 256;

static LINES: Lazy<Mutex<VecDeque<String>>> =
    Lazy::new(|| Mutex::new(VecDeque::with_capacity(CAPACITY)));

static LOGGER: PaneLogger = PaneLogger;

struct PaneLogger;

impl Log for PaneLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        push(format!("{:<5} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

fn push(line: String) {
    let mut lines = LINES.lock();
    if lines.len() == CAPACITY {
        lines.pop_front();
    }
    lines.push_back(line);
}

/// Will install the logger with the given level.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

/// Maps the amount of `-v` flags to a level.
pub fn level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// The latest `count` lines, the oldest first.
pub fn latest(count: usize) -> Vec<String> {
    let lines = LINES.lock();
    let skip = lines.len().saturating_sub(count);
    lines.iter().skip(skip).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level() {
        assert_eq!(LevelFilter::Warn, level(0));
        assert_eq!(LevelFilter::Info, level(1));
        assert_eq!(LevelFilter::Debug, level(2));
        assert_eq!(LevelFilter::Trace, level(3));
        assert_eq!(LevelFilter::Trace, level(u8::MAX));
    }

    #[test]
    fn test_bounded_lines() {
        for i in 0..(CAPACITY + 10) {
            push(format!("line {}", i));
        }
        assert_eq!(CAPACITY, LINES.lock().len());

        let last = latest(2);
        assert_eq!(
            vec![
                format!("line {}", CAPACITY + 8),
                format!("line {}", CAPACITY + 9)
            ],
            last
        );
    }
}
