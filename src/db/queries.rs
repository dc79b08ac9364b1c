//! SQL queries for chat.db.
//!
//! CHANGELOG:
//! - 02/13/2026 - Chat ids by display name

/// Chat GUIDs whose display name matches `?1` (a LIKE pattern using `\` as
/// the escape character), most recently active first.
///
/// Chats with no linked messages have a NULL last date and sort last.
pub const CHAT_IDS_BY_DISPLAY_NAME: &str = r#"
SELECT chat.guid
FROM chat
WHERE chat.display_name LIKE ?1 ESCAPE '\'
ORDER BY (
    SELECT MAX(message.date)
    FROM chat_message_join cmj
    INNER JOIN message ON message.ROWID = cmj.message_id
    WHERE cmj.chat_id = chat.ROWID
) DESC
"#;

/// Escape LIKE metacharacters so `value` only matches itself.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%value%` with `value` escaped.
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}
