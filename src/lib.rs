//! MeshFlux Inspect - on-disk state inspector for the MeshFlux VPN client
//!
//! Reads the app group container the MeshFlux app shares with its packet
//! tunnel extension and prints what a developer needs when a tunnel will
//! not start: the selected profile, the provider installed for it, the
//! provider's files and rule-sets, and the interesting tail of the
//! extension's stderr logs.
//!
//! Nothing is ever written back to the container.
//!
//! # Usage
//!
//! ```no_run
//! use meshflux_inspect::config::{default_base_dir, ContainerLayout, LogFilterConfig};
//! use meshflux_inspect::{report, InspectConfig};
//!
//! fn main() -> meshflux_inspect::error::Result<()> {
//!     let layout = ContainerLayout::new(default_base_dir()?);
//!     let config = InspectConfig::new(layout, LogFilterConfig::default());
//!     report::run(&config, &mut std::io::stdout().lock())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logs;
pub mod provider;
pub mod report;
pub mod store;

pub use config::InspectConfig;
pub use error::InspectError;
pub use store::SettingsStore;
