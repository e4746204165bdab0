//! Shared container layout
//!
//! Every path the inspector touches is derived from one base directory, the
//! app group container the MeshFlux app and its packet tunnel extension share.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// App group identifier of the shared container
pub const APP_GROUP_ID: &str = "group.com.meshnetprotocol.OpenMesh";

/// Settings store file name inside the container
const SETTINGS_DB: &str = "settings.db";

/// Rule-set subdirectory inside a provider directory
const RULE_SET_DIR: &str = "rule-set";

/// Default base directory: `~/Library/Group Containers/<APP_GROUP_ID>`
pub fn default_base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home.join("Library").join("Group Containers").join(APP_GROUP_ID))
}

/// Paths derived from the container base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLayout {
    base: PathBuf,
}

impl ContainerLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn settings_db(&self) -> PathBuf {
        self.base.join(SETTINGS_DB)
    }

    /// Root holding one directory per installed provider
    pub fn providers_dir(&self) -> PathBuf {
        self.base.join("MeshFlux").join("providers")
    }

    pub fn provider_dir(&self, provider_id: &str) -> PathBuf {
        self.providers_dir().join(provider_id)
    }

    pub fn rule_set_dir(&self, provider_id: &str) -> PathBuf {
        self.provider_dir(provider_id).join(RULE_SET_DIR)
    }

    /// Extension log files, rotated backup first
    pub fn log_files(&self) -> [PathBuf; 2] {
        let caches = self.base.join("Library").join("Caches");
        [caches.join("stderr.log.old"), caches.join("stderr.log")]
    }

    /// `path` relative to the base directory, or unchanged if outside it
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.base).unwrap_or(path)
    }
}
