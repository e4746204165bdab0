//! Log filter settings

use crate::error::ConfigError;

/// Keywords that mark a log line as worth showing
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "startTunnel",
    "failed",
    "completionHandler",
    "rule-set",
    "initialize rule-set",
    "using profile-driven config",
];

/// Matching lines kept per log file
pub const DEFAULT_TAIL_LINES: usize = 80;

/// Which log lines to keep and how many of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilterConfig {
    keywords: Vec<String>,
    tail_lines: usize,
}

impl LogFilterConfig {
    /// Build a filter. An empty keyword list falls back to [`DEFAULT_KEYWORDS`].
    pub fn new(keywords: Vec<String>, tail_lines: usize) -> Result<Self, ConfigError> {
        if keywords.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::EmptyKeyword);
        }
        let keywords = if keywords.is_empty() {
            DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
        } else {
            keywords
        };
        Ok(Self {
            keywords,
            tail_lines,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn tail_lines(&self) -> usize {
        self.tail_lines
    }

    /// Case-sensitive substring match against any keyword
    pub fn matches(&self, line: &str) -> bool {
        self.keywords.iter().any(|k| line.contains(k.as_str()))
    }
}

impl Default for LogFilterConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }
}
