//! Messaging commands: send, send-chat.
//!
//! CHANGELOG:
//! - 02/13/2026 - Attachments, timeout and debug flags, chat id sending
//! - 02/12/2026 - Initial implementation

use std::time::Duration;

use anyhow::Result;

use crate::client::{Client, Message, SenderConfig};
use crate::error::ImsgError;

/// Flags shared by `send` and `send-chat`.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub text: Option<String>,
    pub files: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub debug: bool,
}

impl SendOptions {
    /// The message to send, rejecting one with neither text nor files.
    pub fn message(&self) -> Result<Message, ImsgError> {
        let text = self.text.clone().unwrap_or_default();
        if text.trim().is_empty() && self.files.is_empty() {
            return Err(ImsgError::EmptyMessage);
        }
        Ok(Message {
            text,
            attachments: self.files.clone(),
        })
    }

    /// Environment config with CLI flags layered on top.
    pub fn config(&self) -> Result<SenderConfig, ImsgError> {
        let mut config = SenderConfig::from_env()?;
        if self.debug {
            config = config.with_debug(true);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Send to a phone number or email.
pub fn send(to: &str, options: &SendOptions) -> Result<()> {
    if to.trim().is_empty() {
        return Err(ImsgError::MissingRecipient.into());
    }
    let msg = options.message()?;
    let client = Client::new(options.config()?);
    client.send(to, &msg)?;
    Ok(())
}

/// Send to a chat by GUID (see `imsg lookup`).
pub fn send_chat(chat_id: &str, options: &SendOptions) -> Result<()> {
    if chat_id.trim().is_empty() {
        return Err(ImsgError::MissingChatId.into());
    }
    let msg = options.message()?;
    let client = Client::new(options.config()?);
    client.send_chat_id(chat_id, &msg)?;
    Ok(())
}
