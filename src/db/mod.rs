//! Read-only access to the Messages chat database (chat.db).
//!
//! CHANGELOG:
//! - 02/13/2026 - Chat name lookup
//! - 02/12/2026 - Initial module structure

pub mod connection;
pub mod lookup;
pub mod queries;
