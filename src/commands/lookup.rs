//! Lookup command: chat display name to chat ids.
//!
//! CHANGELOG:
//! - 02/13/2026 - Initial implementation

use anyhow::Result;
use serde::Serialize;

use crate::db::lookup::lookup_chat_ids_by_name;
use crate::error::ImsgError;
use crate::output::OutputControls;

#[derive(Debug, Serialize)]
struct LookupResult<'a> {
    name: &'a str,
    chat_ids: &'a [String],
    count: usize,
}

/// Print chat ids matching `name`, most recent first. `limit` of 0 prints all.
pub fn lookup(name: &str, limit: usize, output: &OutputControls) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ImsgError::MissingChatName.into());
    }

    let chat_ids = lookup_chat_ids_by_name(name)?;
    let rendered = render(name, &chat_ids, limit, output);
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}

fn render(name: &str, chat_ids: &[String], limit: usize, output: &OutputControls) -> String {
    let shown = if limit > 0 && chat_ids.len() > limit {
        &chat_ids[..limit]
    } else {
        chat_ids
    };

    if output.json {
        output.emit(&LookupResult {
            name: name.trim(),
            chat_ids: shown,
            count: shown.len(),
        })
    } else {
        shown.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<String> {
        vec!["chat-a".to_string(), "chat-b".to_string(), "chat-c".to_string()]
    }

    #[test]
    fn test_render_plain_lines() {
        assert_eq!(
            render("Family", &ids(), 0, &OutputControls::default()),
            "chat-a\nchat-b\nchat-c"
        );
    }

    #[test]
    fn test_render_respects_limit() {
        assert_eq!(
            render("Family", &ids(), 2, &OutputControls::default()),
            "chat-a\nchat-b"
        );
        assert_eq!(
            render("Family", &ids(), 10, &OutputControls::default()),
            "chat-a\nchat-b\nchat-c"
        );
    }

    #[test]
    fn test_render_json() {
        let output = OutputControls {
            json: true,
            compact: true,
        };
        assert_eq!(
            render(" Family ", &ids(), 1, &output),
            r#"{"name":"Family","chat_ids":["chat-a"],"count":1}"#
        );
    }

    #[test]
    fn test_blank_name_is_usage_error() {
        let err = lookup("  ", 0, &OutputControls::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImsgError>(),
            Some(ImsgError::MissingChatName)
        ));
    }
}
