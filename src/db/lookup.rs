//! Resolve a chat display name to chat GUIDs for [`crate::Client::send_chat_id`].
//!
//! CHANGELOG:
//! - 02/13/2026 - Initial implementation

use rusqlite::Connection;

use super::queries;
use crate::error::{ImsgError, Result};

/// Chat GUIDs whose display name contains `name` (case-insensitive, literal),
/// most recently active first.
pub fn query_chat_ids(conn: &Connection, name: &str) -> Result<Vec<String>> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ImsgError::MissingChatName);
    }

    let mut stmt = conn
        .prepare(queries::CHAT_IDS_BY_DISPLAY_NAME)
        .map_err(ImsgError::db("query chat database"))?;
    let rows = stmt
        .query_map([queries::contains_pattern(trimmed)], |row| {
            row.get::<_, Option<String>>(0)
        })
        .map_err(ImsgError::db("query chat database"))?;

    let mut chat_ids = Vec::new();
    for row in rows {
        if let Some(guid) = row.map_err(ImsgError::db("read chat rows"))? {
            if !guid.is_empty() {
                chat_ids.push(guid);
            }
        }
    }

    Ok(chat_ids)
}

/// Look up chat GUIDs in the default chat.db.
///
/// Only available on macOS, where Messages.app keeps its database.
#[cfg(target_os = "macos")]
pub fn lookup_chat_ids_by_name(name: &str) -> Result<Vec<String>> {
    use super::connection::{default_db_path, open_chat_db};

    if name.trim().is_empty() {
        return Err(ImsgError::MissingChatName);
    }

    let path = default_db_path()?;
    let conn = open_chat_db(&path)?;
    let chat_ids = query_chat_ids(&conn, name)?;
    tracing::debug!(name, path = %path.display(), matches = chat_ids.len(), "imsg: chat lookup");
    Ok(chat_ids)
}

/// Look up chat GUIDs in the default chat.db.
///
/// Only available on macOS, where Messages.app keeps its database.
#[cfg(not(target_os = "macos"))]
pub fn lookup_chat_ids_by_name(_name: &str) -> Result<Vec<String>> {
    Err(ImsgError::UnsupportedPlatform)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
CREATE TABLE chat (ROWID INTEGER PRIMARY KEY AUTOINCREMENT, guid TEXT, display_name TEXT);
CREATE TABLE message (ROWID INTEGER PRIMARY KEY AUTOINCREMENT, text TEXT, date INTEGER);
CREATE TABLE chat_message_join (chat_id INTEGER, message_id INTEGER);
"#;

    struct Fixture {
        conn: Connection,
    }

    impl Fixture {
        fn new() -> Self {
            let conn = Connection::open_in_memory().unwrap();
            conn.execute_batch(SCHEMA).unwrap();
            Self { conn }
        }

        fn chat(&self, guid: Option<&str>, name: &str, message_dates: &[i64]) -> &Self {
            self.conn
                .execute(
                    "INSERT INTO chat (guid, display_name) VALUES (?1, ?2)",
                    rusqlite::params![guid, name],
                )
                .unwrap();
            let chat_id = self.conn.last_insert_rowid();
            for date in message_dates {
                self.conn
                    .execute(
                        "INSERT INTO message (text, date) VALUES ('x', ?1)",
                        [date],
                    )
                    .unwrap();
                let message_id = self.conn.last_insert_rowid();
                self.conn
                    .execute(
                        "INSERT INTO chat_message_join (chat_id, message_id) VALUES (?1, ?2)",
                        [chat_id, message_id],
                    )
                    .unwrap();
            }
            self
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        let fx = Fixture::new();
        assert!(matches!(
            query_chat_ids(&fx.conn, "  "),
            Err(ImsgError::MissingChatName)
        ));
    }

    #[test]
    fn test_orders_by_most_recent_message() {
        let fx = Fixture::new();
        fx.chat(Some("chat-old"), "Family", &[100, 200])
            .chat(Some("chat-new"), "Family Trip", &[50, 900])
            .chat(Some("chat-mid"), "Extended family", &[500])
            .chat(Some("chat-other"), "Work", &[1000]);

        let ids = query_chat_ids(&fx.conn, "family").unwrap();
        assert_eq!(ids, vec!["chat-new", "chat-mid", "chat-old"]);
    }

    #[test]
    fn test_chats_without_messages_sort_last() {
        let fx = Fixture::new();
        fx.chat(Some("chat-empty"), "Book Club", &[])
            .chat(Some("chat-active"), "Book Club 2", &[10]);

        let ids = query_chat_ids(&fx.conn, "Book Club").unwrap();
        assert_eq!(ids, vec!["chat-active", "chat-empty"]);
    }

    #[test]
    fn test_percent_is_literal() {
        let fx = Fixture::new();
        fx.chat(Some("chat-plain"), "Team Alpha", &[900])
            .chat(Some("chat-pct-old"), "Team% Ops", &[100])
            .chat(Some("chat-pct-new"), "Q3 Team% Review", &[300]);

        let ids = query_chat_ids(&fx.conn, "Team%").unwrap();
        assert_eq!(ids, vec!["chat-pct-new", "chat-pct-old"]);
    }

    #[test]
    fn test_underscore_and_backslash_are_literal() {
        let fx = Fixture::new();
        fx.chat(Some("chat-us"), "a_b", &[1])
            .chat(Some("chat-ax"), "axb", &[2])
            .chat(Some("chat-bs"), r"c\d", &[3]);

        assert_eq!(query_chat_ids(&fx.conn, "a_b").unwrap(), vec!["chat-us"]);
        assert_eq!(query_chat_ids(&fx.conn, r"c\d").unwrap(), vec!["chat-bs"]);
    }

    #[test]
    fn test_skips_missing_guids_and_trims_name() {
        let fx = Fixture::new();
        fx.chat(None, "Ghost chat", &[5])
            .chat(Some(""), "Ghost chat 2", &[6])
            .chat(Some("chat-real"), "Ghost chat 3", &[1]);

        let ids = query_chat_ids(&fx.conn, "  ghost ").unwrap();
        assert_eq!(ids, vec!["chat-real"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let fx = Fixture::new();
        fx.chat(Some("chat-1"), "Family", &[1]);
        assert!(query_chat_ids(&fx.conn, "Nobody").unwrap().is_empty());
    }

    #[test]
    fn test_missing_tables_is_database_error() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            query_chat_ids(&conn, "x"),
            Err(ImsgError::Database { .. })
        ));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_lookup_unsupported_off_macos() {
        assert!(matches!(
            lookup_chat_ids_by_name("Family"),
            Err(ImsgError::UnsupportedPlatform)
        ));
    }
}
