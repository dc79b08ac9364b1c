//! AppleScript generation for sending iMessages.
//!
//! Builds the script handed to osascript; see [`crate::executor`] for running it.
//!
//! CHANGELOG:
//! - 02/13/2026 - Chat id targets, attachments with upload delays
//! - 02/12/2026 - Single-pass escaper covering newlines and tabs

use std::fmt::Write as _;

use crate::attachments::AttachmentInfo;

/// Who the script sends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// Phone number or email of an individual buddy.
    Handle(&'a str),
    /// Chat GUID, e.g. from [`crate::db::lookup::lookup_chat_ids_by_name`].
    Chat(&'a str),
}

impl Target<'_> {
    fn selector(&self) -> String {
        match self {
            Target::Handle(handle) => {
                format!("buddy \"{}\" of targetService", escape_applescript_string(handle))
            }
            Target::Chat(chat_id) => {
                format!("chat id \"{}\"", escape_applescript_string(chat_id))
            }
        }
    }
}

/// Escape a string for safe inclusion in an AppleScript string literal.
///
/// Single left-to-right pass, so a backslash produced for one character is
/// never escaped again.
pub fn escape_applescript_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the send script: text first (when non-empty), then each attachment
/// in order, each followed by its upload delay.
pub fn build_send_script(target: Target<'_>, text: &str, attachments: &[AttachmentInfo]) -> String {
    let mut script = String::new();
    script.push_str("tell application \"Messages\"\n");
    script.push_str(
        "    set targetService to 1st service whose service type is iMessage and enabled is true\n",
    );
    let _ = writeln!(script, "    set targetRecipient to {}", target.selector());

    if !text.is_empty() {
        let _ = writeln!(
            script,
            "    send \"{}\" to targetRecipient",
            escape_applescript_string(text)
        );
    }

    for attachment in attachments {
        let path = attachment.path.to_string_lossy();
        let _ = writeln!(
            script,
            "    send POSIX file \"{}\" to targetRecipient",
            escape_applescript_string(&path)
        );
        if attachment.delay_seconds > 0 {
            let _ = writeln!(script, "    delay {}", attachment.delay_seconds);
        }
    }

    script.push_str("end tell");
    script
}
