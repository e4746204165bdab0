//! Inspection settings
//!
//! Where the shared container lives and which log lines are interesting.

mod filter;
mod layout;

pub use filter::{LogFilterConfig, DEFAULT_KEYWORDS, DEFAULT_TAIL_LINES};
pub use layout::{default_base_dir, ContainerLayout, APP_GROUP_ID};

/// Complete settings for one inspection run
#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub layout: ContainerLayout,
    pub log_filter: LogFilterConfig,
}

impl InspectConfig {
    pub fn new(layout: ContainerLayout, log_filter: LogFilterConfig) -> Self {
        Self { layout, log_filter }
    }
}
