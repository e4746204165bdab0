//! Log tail filter
//!
//! The packet tunnel extension redirects stderr into `Library/Caches/stderr.log`
//! and rotates the previous run to `stderr.log.old`. Only lines mentioning a
//! keyword are kept, and only the last few of those.

use std::collections::VecDeque;
use std::path::Path;

use crate::config::LogFilterConfig;

/// Outcome of scanning one log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogScan {
    Missing,
    Unreadable(String),
    /// Last matching lines, oldest first
    Matched(Vec<String>),
}

/// Last `filter.tail_lines()` lines of `text` that match a keyword, in order
///
/// A bare `\r` ends a line too, so carriage-return progress output is split
/// into its individual updates.
pub fn interesting_tail<'a>(text: &'a str, filter: &LogFilterConfig) -> Vec<&'a str> {
    let limit = filter.tail_lines();
    if limit == 0 {
        return Vec::new();
    }
    let mut tail = VecDeque::new();
    let lines = text
        .split(['\n', '\r'])
        .filter(|line| !line.is_empty() && filter.matches(line));
    for line in lines {
        if tail.len() == limit {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    tail.into_iter().collect()
}

/// Read `path` and filter it; invalid UTF-8 is replaced, not rejected
pub fn scan_log(path: &Path, filter: &LogFilterConfig) -> LogScan {
    if !path.exists() {
        return LogScan::Missing;
    }
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let lines = interesting_tail(&text, filter)
                .into_iter()
                .map(str::to_string)
                .collect();
            LogScan::Matched(lines)
        }
        Err(e) => {
            tracing::debug!("Failed to read log {:?}: {}", path, e);
            LogScan::Unreadable(e.to_string())
        }
    }
}
