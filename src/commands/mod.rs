//! Command implementations.
//!
//! CHANGELOG:
//! - 02/13/2026 - send, send-chat, lookup

pub mod lookup;
pub mod messaging;
