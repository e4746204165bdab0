//! Installed provider lookup and file listing
//!
//! Providers are identified by opaque ids. Two preferences tie them to
//! profiles: `installed_provider_id_by_profile` maps a profile id (as a
//! string) to a provider id, and `installed_provider_package_hash` records
//! the package hash each provider was installed from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

/// Preference key: profile id -> provider id
pub const PROVIDER_BY_PROFILE_KEY: &str = "installed_provider_id_by_profile";

/// Preference key: provider id -> package hash
pub const PACKAGE_HASH_KEY: &str = "installed_provider_package_hash";

/// Compiled rule-set file extension
const RULE_SET_EXTENSION: &str = "srs";

/// Provider lookups decoded from preferences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMapping {
    provider_by_profile: BTreeMap<String, String>,
    package_hash: BTreeMap<String, String>,
}

/// String entries of a JSON object; anything else is an empty map
fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|object| {
            object
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

impl ProviderMapping {
    pub fn from_preferences(
        provider_by_profile: Option<&Value>,
        package_hash: Option<&Value>,
    ) -> Self {
        Self {
            provider_by_profile: string_map(provider_by_profile),
            package_hash: string_map(package_hash),
        }
    }

    /// Provider installed for `profile_id`, if any
    pub fn provider_for(&self, profile_id: i64) -> Option<&str> {
        self.provider_by_profile
            .get(&profile_id.to_string())
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn package_hash(&self, provider_id: &str) -> Option<&str> {
        self.package_hash.get(provider_id).map(String::as_str)
    }
}

/// Regular files under `dir`, recursively, relative to `root`
///
/// Siblings are visited in byte order of their names, which yields a
/// component-wise lexicographic listing. Symlinks to files are listed;
/// symlinked directories are not descended into. Unreadable entries are
/// skipped.
pub fn list_files(root: &Path, dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {:?}: {}", dir, e);
                None
            }
        })
        .filter(|entry| entry.path().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf()
        })
        .collect()
}

/// A compiled rule-set file and its size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSetFile {
    pub name: String,
    pub size: u64,
}

/// `*.srs` files directly inside `dir`, sorted by name
pub fn list_rule_sets(dir: &Path) -> Vec<RuleSetFile> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {:?}: {}", dir, e);
                None
            }
        })
        .filter(|entry| {
            entry.path().extension().and_then(|e| e.to_str()) == Some(RULE_SET_EXTENSION)
        })
        .filter_map(|entry| match entry.metadata() {
            Ok(meta) => Some(RuleSetFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
            }),
            Err(e) => {
                tracing::debug!("Cannot stat {:?}: {}", entry.path(), e);
                None
            }
        })
        .collect()
}
