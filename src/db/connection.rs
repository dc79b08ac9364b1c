//! SQLite connection management for chat.db.
//!
//! CHANGELOG:
//! - 02/13/2026 - Busy timeout, env override for the database path
//! - 02/12/2026 - Initial implementation

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::error::{ImsgError, Result};

/// Overrides the chat.db location (tests, copies of the database).
pub const ENV_CHAT_DB_PATH: &str = "IMSG_CHAT_DB_PATH";

/// How long a reader waits while Messages.app holds a write lock.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default chat.db path.
///
/// 1. IMSG_CHAT_DB_PATH env var
/// 2. ~/Library/Messages/chat.db
pub fn default_db_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(ENV_CHAT_DB_PATH).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    dirs::home_dir()
        .map(|home| home.join("Library").join("Messages").join("chat.db"))
        .ok_or(ImsgError::HomeDirUnavailable)
}

/// Open a read-only connection with a busy timeout.
pub fn open_chat_db(path: &Path) -> Result<Connection> {
    std::fs::metadata(path).map_err(|source| ImsgError::ChatStoreUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(ImsgError::db("open chat database"))?;

    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(ImsgError::db("set busy timeout"))?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_database_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = open_chat_db(&dir.path().join("chat.db")).unwrap_err();
        assert!(matches!(err, ImsgError::ChatStoreUnavailable { .. }));
    }

    #[test]
    fn test_opens_read_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE t (x INTEGER);")
            .unwrap();

        let conn = open_chat_db(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(conn.execute("INSERT INTO t (x) VALUES (1)", []).is_err());
    }
}
