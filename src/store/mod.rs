//! Read-only access to the app's settings store
//!
//! `settings.db` is a SQLite file owned by the app. Two tables matter here:
//! - `preferences(name, data)` holding JSON-encoded values
//! - `profiles(id, name, type, path)` holding one row per VPN profile
//!
//! The connection is opened read-only and released when the handle is
//! closed or dropped, so an early `?` return never leaks it.

mod preferences;
mod profiles;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::StoreError;

pub use preferences::decode_preference;
pub use profiles::{find_selected, selected_profile_id, Profile};

/// Open handle on `settings.db`
pub struct SettingsStore {
    conn: Connection,
    path: PathBuf,
}

impl SettingsStore {
    /// Open the store read-only and check that it is a readable database
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let open_err = |source: rusqlite::Error| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_err)?;

        conn.execute_batch("PRAGMA query_only=ON;").map_err(open_err)?;

        // SQLite opens lazily; touch the schema so a corrupt file fails here
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(open_err)?;

        tracing::debug!("Opened settings store {:?}", path);
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Close the connection, surfacing any error SQLite reports
    pub fn close(self) -> Result<(), StoreError> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, e)| StoreError::Close(e))?;
        tracing::debug!("Closed settings store {:?}", path);
        Ok(())
    }
}
