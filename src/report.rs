//! Inspection report
//!
//! One linear pass over the container: settings store first, then the
//! selected profile's provider files, then the extension logs. Missing
//! files and keys are reported and skipped; only the store itself can
//! abort the run.

use std::io::Write;

use serde_json::Value;

use crate::config::{ContainerLayout, InspectConfig, LogFilterConfig};
use crate::error::Result;
use crate::logs::{scan_log, LogScan};
use crate::provider::{
    list_files, list_rule_sets, ProviderMapping, PACKAGE_HASH_KEY, PROVIDER_BY_PROFILE_KEY,
};
use crate::store::{find_selected, SettingsStore};

/// Preference key: id of the profile the tunnel starts with
pub const SELECTED_PROFILE_KEY: &str = "selected_profile_id";

/// Render an optional preference value
fn show(value: Option<&Value>) -> String {
    value.map_or_else(|| "none".to_string(), Value::to_string)
}

/// Render an optional map preference; absent maps read as empty
fn show_map(value: Option<&Value>) -> String {
    value.map_or_else(|| "{}".to_string(), Value::to_string)
}

/// Write the full report for `config` to `out`
///
/// Stops after the first section when `settings.db` does not exist.
pub fn run<W: Write>(config: &InspectConfig, out: &mut W) -> Result<()> {
    let layout = &config.layout;
    writeln!(out, "base: {}", layout.base().display())?;

    let db_path = layout.settings_db();
    if !db_path.exists() {
        writeln!(out, "missing settings.db: {}", db_path.display())?;
        return Ok(());
    }

    let store = SettingsStore::open(&db_path)?;
    let outcome = report_store(&store, layout, out);
    let closed = store.close();
    outcome?;
    closed?;

    report_logs(layout, &config.log_filter, out)
}

/// Preferences, profiles and the selected profile's provider
fn report_store<W: Write>(
    store: &SettingsStore,
    layout: &ContainerLayout,
    out: &mut W,
) -> Result<()> {
    let selected = store.preference(SELECTED_PROFILE_KEY)?;
    writeln!(out)?;
    writeln!(out, "{}: {}", SELECTED_PROFILE_KEY, show(selected.as_ref()))?;

    let provider_by_profile = store.preference(PROVIDER_BY_PROFILE_KEY)?;
    let package_hash = store.preference(PACKAGE_HASH_KEY)?;
    writeln!(out)?;
    writeln!(
        out,
        "{}: {}",
        PROVIDER_BY_PROFILE_KEY,
        show_map(provider_by_profile.as_ref())
    )?;
    writeln!(out, "{}: {}", PACKAGE_HASH_KEY, show_map(package_hash.as_ref()))?;
    let mapping =
        ProviderMapping::from_preferences(provider_by_profile.as_ref(), package_hash.as_ref());

    let profiles = store.profiles()?;
    writeln!(out)?;
    writeln!(out, "profiles:")?;
    for profile in &profiles {
        writeln!(out, "  {}", profile)?;
    }

    writeln!(out)?;
    let Some(profile) = find_selected(&profiles, selected.as_ref()) else {
        writeln!(out, "selected_profile: none")?;
        return Ok(());
    };
    writeln!(out, "selected_profile: {}", profile)?;
    writeln!(
        out,
        "selected_profile exists on disk: {}",
        profile.path.exists()
    )?;

    let Some(provider_id) = mapping.provider_for(profile.id) else {
        writeln!(out, "mapped provider_id: none")?;
        return Ok(());
    };
    writeln!(out, "mapped provider_id: {}", provider_id)?;
    if let Some(hash) = mapping.package_hash(provider_id) {
        writeln!(out, "package hash: {}", hash)?;
    }

    report_provider(layout, provider_id, out)
}

fn report_provider<W: Write>(layout: &ContainerLayout, provider_id: &str, out: &mut W) -> Result<()> {
    let provider_dir = layout.provider_dir(provider_id);
    writeln!(out)?;
    writeln!(out, "provider_dir: {}", provider_dir.display())?;
    if provider_dir.is_dir() {
        for file in list_files(layout.base(), &provider_dir) {
            writeln!(out, "  {}", file.display())?;
        }
    } else {
        writeln!(out, "provider_dir missing")?;
    }

    let rule_set_dir = layout.rule_set_dir(provider_id);
    if rule_set_dir.is_dir() {
        writeln!(out)?;
        writeln!(out, "rule-set files:")?;
        for rule_set in list_rule_sets(&rule_set_dir) {
            writeln!(out, "  {} {} bytes", rule_set.name, rule_set.size)?;
        }
    }
    Ok(())
}

fn report_logs<W: Write>(
    layout: &ContainerLayout,
    filter: &LogFilterConfig,
    out: &mut W,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "logs:")?;
    for path in layout.log_files() {
        let shown = layout.relative(&path).display();
        match scan_log(&path, filter) {
            LogScan::Missing => writeln!(out, "  {} (missing)", shown)?,
            LogScan::Unreadable(reason) => writeln!(out, "  {} (unreadable: {})", shown, reason)?,
            LogScan::Matched(lines) => {
                writeln!(out, "  {} interesting_tail_lines={}", shown, lines.len())?;
                for line in lines {
                    writeln!(out, "    {}", line)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InspectError, StoreError};
    use crate::store::fixtures;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn render(base: &Path) -> (Result<()>, String) {
        let config = InspectConfig::new(ContainerLayout::new(base), LogFilterConfig::default());
        let mut out = Vec::new();
        let result = run(&config, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn populated_container() -> TempDir {
        let base = TempDir::new().unwrap();
        let profile_path = base.path().join("configs").join("2.json");
        fs::create_dir_all(profile_path.parent().unwrap()).unwrap();
        fs::write(&profile_path, "{}").unwrap();

        fixtures::settings_db(
            base.path(),
            &[
                ("selected_profile_id", Some(b"2".as_slice())),
                (
                    "installed_provider_id_by_profile",
                    Some(br#"{"2":"provider-a"}"#.as_slice()),
                ),
                (
                    "installed_provider_package_hash",
                    Some(br#"{"provider-a":"abc123"}"#.as_slice()),
                ),
            ],
            &[
                (1, "A", "t", "/nonexistent/1.json"),
                (2, "B", "t", profile_path.to_str().unwrap()),
            ],
        );

        let provider = base.path().join("MeshFlux").join("providers").join("provider-a");
        fs::create_dir_all(provider.join("rule-set")).unwrap();
        fs::write(provider.join("config.json"), "{}").unwrap();
        fs::write(provider.join("rule-set").join("geoip-cn.srs"), vec![0u8; 7]).unwrap();

        let caches = base.path().join("Library").join("Caches");
        fs::create_dir_all(&caches).unwrap();
        fs::write(
            caches.join("stderr.log"),
            "boot\nstartTunnel options\nidle\ninitialize rule-set: geoip-cn\n",
        )
        .unwrap();
        base
    }

    #[test]
    fn test_missing_store_stops_after_first_section() {
        let base = TempDir::new().unwrap();
        let (result, output) = render(base.path());

        assert!(result.is_ok());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("base: "));
        assert!(lines[1].starts_with("missing settings.db: "));
        assert!(!output.contains("logs:"));
    }

    #[test]
    fn test_full_report() {
        let base = populated_container();
        let (result, output) = render(base.path());
        assert!(result.is_ok(), "{:?}", result);

        assert!(output.contains("selected_profile_id: 2\n"));
        assert!(output.contains(r#"installed_provider_id_by_profile: {"2":"provider-a"}"#));
        assert!(output.contains(r#"installed_provider_package_hash: {"provider-a":"abc123"}"#));
        assert!(output.contains("  (1, \"A\", t, /nonexistent/1.json)\n"));
        assert!(output.contains("selected_profile: (2, \"B\", t, "));
        assert!(output.contains("selected_profile exists on disk: true\n"));
        assert!(output.contains("mapped provider_id: provider-a\n"));
        assert!(output.contains("package hash: abc123\n"));
        assert!(output.contains("  MeshFlux/providers/provider-a/config.json\n"));
        assert!(output.contains("  MeshFlux/providers/provider-a/rule-set/geoip-cn.srs\n"));
        assert!(output.contains("rule-set files:\n  geoip-cn.srs 7 bytes\n"));
        assert!(output.contains("  Library/Caches/stderr.log.old (missing)\n"));
        assert!(output.contains(
            "  Library/Caches/stderr.log interesting_tail_lines=2\n    startTunnel options\n    initialize rule-set: geoip-cn\n"
        ));

        let old = output.find("stderr.log.old").unwrap();
        let current = output.find("stderr.log interesting").unwrap();
        assert!(old < current);
    }

    #[test]
    fn test_unmatched_selection_still_reports_logs() {
        let base = TempDir::new().unwrap();
        fixtures::settings_db(
            base.path(),
            &[("selected_profile_id", Some(b"99".as_slice()))],
            &[(1, "A", "t", "/x")],
        );

        let (result, output) = render(base.path());
        assert!(result.is_ok());
        assert!(output.contains("selected_profile_id: 99\n"));
        assert!(output.contains("installed_provider_id_by_profile: {}\n"));
        assert!(output.contains("selected_profile: none\n"));
        assert!(!output.contains("provider_dir"));
        assert!(output.contains("  Library/Caches/stderr.log (missing)\n"));
    }

    #[test]
    fn test_missing_provider_dir_reported() {
        let base = TempDir::new().unwrap();
        fixtures::settings_db(
            base.path(),
            &[
                ("selected_profile_id", Some(br#""1""#.as_slice())),
                (
                    "installed_provider_id_by_profile",
                    Some(br#"{"1":"gone"}"#.as_slice()),
                ),
            ],
            &[(1, "A", "t", "/x")],
        );

        let (result, output) = render(base.path());
        assert!(result.is_ok());
        assert!(output.contains("selected_profile exists on disk: false\n"));
        assert!(output.contains("mapped provider_id: gone\n"));
        assert!(output.contains("provider_dir missing\n"));
        assert!(!output.contains("rule-set files:"));
        assert!(!output.contains("package hash"));
    }

    #[test]
    fn test_unreadable_log_reported_and_run_continues() {
        let base = TempDir::new().unwrap();
        fixtures::settings_db(base.path(), &[], &[]);
        let caches = base.path().join("Library").join("Caches");
        fs::create_dir_all(caches.join("stderr.log.old")).unwrap();
        fs::write(caches.join("stderr.log"), "startTunnel\nidle\n").unwrap();

        let (result, output) = render(base.path());
        assert!(result.is_ok(), "{:?}", result);
        let unreadable = output
            .find("  Library/Caches/stderr.log.old (unreadable: ")
            .unwrap();
        let current = output
            .find("  Library/Caches/stderr.log interesting_tail_lines=1\n    startTunnel\n")
            .unwrap();
        assert!(unreadable < current);
    }

    #[test]
    fn test_corrupt_store_is_terminal() {
        let base = TempDir::new().unwrap();
        fs::write(base.path().join("settings.db"), vec![b'x'; 4096]).unwrap();

        let (result, output) = render(base.path());
        assert!(matches!(
            result,
            Err(InspectError::Store(StoreError::Open { .. }))
        ));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_query_failure_is_terminal() {
        let base = TempDir::new().unwrap();
        rusqlite::Connection::open(base.path().join("settings.db"))
            .unwrap()
            .execute_batch("CREATE TABLE preferences (name TEXT, data BLOB);")
            .unwrap();

        let (result, output) = render(base.path());
        assert!(matches!(
            result,
            Err(InspectError::Store(StoreError::Query {
                table: "profiles",
                ..
            }))
        ));
        assert!(!output.contains("logs:"));
    }
}
