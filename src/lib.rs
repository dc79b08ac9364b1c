//! imsg library
//!
//! Sends iMessages (text and attachments) through Messages.app's AppleScript
//! interface, and resolves chat display names to chat ids from chat.db.
//! Receiving messages is out of scope.
//!
//! ```no_run
//! use imsg::{Client, Message, SenderConfig};
//!
//! let client = Client::new(SenderConfig::default().with_debug(true));
//! client.send("+14155551234", &Message::text("On my way").with_attachment("~/Desktop/eta.png"))?;
//! # Ok::<(), imsg::ImsgError>(())
//! ```
//!
//! CHANGELOG:
//! - 02/12/2026 - Initial library structure

// Core modules
pub mod applescript;
pub mod attachments;
pub mod client;
pub mod commands;
pub mod db;
pub mod error;
pub mod executor;
pub mod output;
pub mod paths;

pub use client::{send, send_chat_id, send_file, send_files, send_text, Client, Message, SenderConfig};
pub use db::lookup::lookup_chat_ids_by_name;
pub use error::{ImsgError, Result};
