//! Preference reader
//!
//! Values are JSON blobs written by the app. Anything that does not decode is
//! treated as "no value": the inspector reports what it can and moves on.

use rusqlite::types::ValueRef;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::SettingsStore;
use crate::error::StoreError;

/// Decode a stored preference payload
pub fn decode_preference(data: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(data)
}

impl SettingsStore {
    /// Read and decode the preference `name`
    ///
    /// Returns `Ok(None)` when the row is missing, the column is NULL, or the
    /// payload is not valid JSON. Only a failing query is an error.
    pub fn preference(&self, name: &str) -> Result<Option<Value>, StoreError> {
        let data = self
            .conn
            .query_row(
                "SELECT data FROM preferences WHERE name = ?1",
                params![name],
                |row| {
                    Ok(match row.get_ref(0)? {
                        ValueRef::Blob(bytes) | ValueRef::Text(bytes) => Some(bytes.to_vec()),
                        ValueRef::Null | ValueRef::Integer(_) | ValueRef::Real(_) => None,
                    })
                },
            )
            .optional()
            .map_err(|source| StoreError::Query {
                table: "preferences",
                source,
            })?
            .flatten();

        let Some(data) = data else {
            tracing::debug!("Preference {} has no stored payload", name);
            return Ok(None);
        };

        match decode_preference(&data) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::debug!("Ignoring undecodable preference {}: {}", name, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with(preferences: &[(&str, Option<&[u8]>)]) -> (TempDir, SettingsStore) {
        let dir = TempDir::new().unwrap();
        let path = fixtures::settings_db(dir.path(), preferences, &[]);
        let store = SettingsStore::open(&path).unwrap();
        (dir, store)
    }

    #[test]
    fn test_reads_json_values() {
        let (_dir, store) = store_with(&[
            ("selected_profile_id", Some(b"2".as_slice())),
            (
                "installed_provider_id_by_profile",
                Some(br#"{"2":"provider-a"}"#.as_slice()),
            ),
            ("language", Some(br#""en""#.as_slice())),
        ]);

        assert_eq!(store.preference("selected_profile_id").unwrap(), Some(json!(2)));
        assert_eq!(
            store.preference("installed_provider_id_by_profile").unwrap(),
            Some(json!({"2": "provider-a"}))
        );
        assert_eq!(store.preference("language").unwrap(), Some(json!("en")));
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_dir, store) = store_with(&[("language", Some(br#""en""#.as_slice()))]);
        assert_eq!(store.preference("selected_profile_id").unwrap(), None);
        assert_eq!(store.preference("").unwrap(), None);
    }

    #[test]
    fn test_null_column_is_none() {
        let (_dir, store) = store_with(&[("selected_profile_id", None)]);
        assert_eq!(store.preference("selected_profile_id").unwrap(), None);
    }

    #[test]
    fn test_malformed_payloads_are_none() {
        let (_dir, store) = store_with(&[
            ("truncated", Some(br#"{"2":"provider-a""#.as_slice())),
            ("empty", Some(b"".as_slice())),
            ("binary", Some([0xff, 0xfe, 0x00, 0x01].as_slice())),
            ("plist", Some(b"bplist00".as_slice())),
        ]);

        for name in ["truncated", "empty", "binary", "plist"] {
            assert_eq!(store.preference(name).unwrap(), None, "{}", name);
        }
    }

    #[test]
    fn test_missing_table_is_query_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.db");
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE profiles (id INTEGER PRIMARY KEY);")
            .unwrap();

        let store = SettingsStore::open(&path).unwrap();
        let result = store.preference("selected_profile_id");
        assert!(matches!(
            result,
            Err(StoreError::Query {
                table: "preferences",
                ..
            })
        ));
    }

    #[test]
    fn test_decode_preference() {
        assert_eq!(decode_preference(b"[1, true, null]").unwrap(), json!([1, true, null]));
        assert!(decode_preference(b"not json").is_err());
    }
}
