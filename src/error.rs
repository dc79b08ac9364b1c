//! Error type shared by the sender, the stager, and the chat lookup.
//!
//! CHANGELOG:
//! - 02/14/2026 - Split timeout / recipient-not-found out of script failures
//! - 02/12/2026 - Initial implementation

use std::path::PathBuf;
use std::time::Duration;

/// Everything that can go wrong while sending or looking up a chat.
#[derive(Debug, thiserror::Error)]
pub enum ImsgError {
    #[error("imsg: only supported on macOS")]
    UnsupportedPlatform,

    #[error("imsg: recipient is required")]
    MissingRecipient,

    #[error("imsg: chat id is required")]
    MissingChatId,

    #[error("imsg: chat name is required")]
    MissingChatName,

    #[error("imsg: message text or attachments required")]
    EmptyMessage,

    #[error("imsg: attachment path is empty")]
    AttachmentPathEmpty,

    #[error("imsg: attachment {path:?} is a directory")]
    AttachmentIsDirectory { path: PathBuf },

    #[error("imsg: unsupported tilde path {path:?}")]
    UnsupportedTildePath { path: String },

    #[error("imsg: could not resolve home directory")]
    HomeDirUnavailable,

    #[error("imsg: invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },

    #[error("imsg: {context} {path:?}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("imsg: failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("imsg: osascript timeout after {}s", .timeout.as_secs_f64())]
    ScriptTimeout { timeout: Duration },

    #[error("imsg: recipient not found: {status}: {output}")]
    RecipientNotFound { status: String, output: String },

    #[error("imsg: osascript failed: {status}{}", render_output(.output))]
    ScriptFailed { status: String, output: String },

    #[error("imsg: chat database unavailable at {path:?}: {source}")]
    ChatStoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("imsg: {context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl ImsgError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn db(context: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Database { context, source }
    }

    /// True for errors the caller caused with bad input (bad flags, blank ids).
    ///
    /// The CLI maps these to exit code 2.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::MissingRecipient
                | Self::MissingChatId
                | Self::MissingChatName
                | Self::EmptyMessage
                | Self::AttachmentPathEmpty
                | Self::UnsupportedTildePath { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

fn render_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(": {}", output)
    }
}

pub type Result<T> = std::result::Result<T, ImsgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_failed_omits_empty_output() {
        let err = ImsgError::ScriptFailed {
            status: "exit status: 1".to_string(),
            output: String::new(),
        };
        assert_eq!(err.to_string(), "imsg: osascript failed: exit status: 1");
    }

    #[test]
    fn test_script_failed_includes_output() {
        let err = ImsgError::ScriptFailed {
            status: "exit status: 1".to_string(),
            output: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "imsg: osascript failed: exit status: 1: syntax error"
        );
    }

    #[test]
    fn test_timeout_carries_duration() {
        let err = ImsgError::ScriptTimeout {
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "imsg: osascript timeout after 30s");
    }

    #[test]
    fn test_usage_classification() {
        assert!(ImsgError::EmptyMessage.is_usage());
        assert!(ImsgError::MissingChatName.is_usage());
        assert!(!ImsgError::UnsupportedPlatform.is_usage());
        assert!(!ImsgError::ScriptTimeout {
            timeout: Duration::from_secs(1)
        }
        .is_usage());
    }
}
