//! Profile resolver

use std::fmt;
use std::path::PathBuf;

use rusqlite::types::ValueRef;
use serde_json::Value;

use super::SettingsStore;
use crate::error::StoreError;

/// One row of the `profiles` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    /// Profile type as stored (the app writes an integer code)
    pub kind: String,
    /// Path of the profile's configuration file
    pub path: PathBuf,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {:?}, {}, {})",
            self.id,
            self.name,
            self.kind,
            self.path.display()
        )
    }
}

/// Render a column of any storage class as text
fn column_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

impl SettingsStore {
    /// All profiles, ascending by id
    pub fn profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let query_err = |source: rusqlite::Error| StoreError::Query {
            table: "profiles",
            source,
        };

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, type, path FROM profiles ORDER BY id ASC")
            .map_err(query_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Profile {
                    id: row.get(0)?,
                    name: column_text(row.get_ref(1)?),
                    kind: column_text(row.get_ref(2)?),
                    path: PathBuf::from(column_text(row.get_ref(3)?)),
                })
            })
            .map_err(query_err)?;

        let profiles = rows.collect::<Result<Vec<_>, _>>().map_err(query_err)?;
        Ok(profiles)
    }
}

/// Interpret the `selected_profile_id` preference as a profile id
///
/// Accepts integers, floats with no fractional part, and numeric strings.
/// Anything else selects nothing: fractional numbers are not truncated and
/// booleans are not read as 0/1.
pub fn selected_profile_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First profile whose id equals the selected id
pub fn find_selected<'a>(profiles: &'a [Profile], selected: Option<&Value>) -> Option<&'a Profile> {
    let id = selected.and_then(selected_profile_id)?;
    profiles.iter().find(|p| p.id == id)
}
