//! Send entry points and their configuration.
//!
//! CHANGELOG:
//! - 02/15/2026 - Text and recipients go into the script untrimmed
//! - 02/14/2026 - Environment overrides for timeout, staging, sandbox policy
//! - 02/13/2026 - Chat id sending
//! - 02/12/2026 - Initial implementation

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::applescript::{build_send_script, Target};
use crate::attachments::{AttachmentStager, SandboxPolicy};
use crate::error::{ImsgError, Result};
use crate::executor::{OsascriptRunner, ScriptRunner};
use crate::paths::expand_home;

pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_SCRIPT_TIMEOUT_SECS: &str = "IMSG_SCRIPT_TIMEOUT_SECS";
pub const ENV_DEBUG: &str = "IMSG_DEBUG";
pub const ENV_STAGING_DIR: &str = "IMSG_STAGING_DIR";
pub const ENV_SANDBOX_ALLOW: &str = "IMSG_SANDBOX_ALLOW";

/// The content to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub attachments: Vec<String>,
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, path: impl Into<String>) -> Self {
        self.attachments.push(path.into());
        self
    }

    /// Blank text doesn't count as content, but is still sent as written
    /// alongside attachments.
    fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Settings for a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    pub script_timeout: Duration,
    /// Log scripts, interpreter output, and cleanup failures at debug level.
    pub debug: bool,
    pub sandbox: SandboxPolicy,
    /// Where staged copies go. `None` means `~/Pictures`.
    pub staging_dir: Option<PathBuf>,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
            debug: false,
            sandbox: SandboxPolicy::default(),
            staging_dir: None,
        }
    }
}

impl SenderConfig {
    /// Defaults overridden by `IMSG_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = var(ENV_SCRIPT_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid(ENV_SCRIPT_TIMEOUT_SECS, &raw))?;
            config.script_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = var(ENV_DEBUG) {
            config.debug = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "" | "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid(ENV_DEBUG, &raw)),
            };
        }

        if let Some(raw) = var(ENV_STAGING_DIR) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(invalid(ENV_STAGING_DIR, &raw));
            }
            config.staging_dir = Some(expand_home(trimmed)?);
        }

        if let Some(raw) = var(ENV_SANDBOX_ALLOW) {
            config.sandbox = SandboxPolicy::new(raw.split(',').map(str::trim));
        }

        Ok(config)
    }

    /// Zero keeps the current timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.script_timeout = timeout;
        }
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_sandbox(mut self, sandbox: SandboxPolicy) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }
}

fn invalid(key: &str, value: &str) -> ImsgError {
    ImsgError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Sends iMessages through Messages.app.
#[derive(Debug, Clone)]
pub struct Client<R = OsascriptRunner> {
    config: SenderConfig,
    stager: AttachmentStager,
    runner: R,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(SenderConfig::default())
    }
}

impl Client {
    pub fn new(config: SenderConfig) -> Self {
        Self::with_runner(config, OsascriptRunner::default())
    }
}

impl<R: ScriptRunner> Client<R> {
    pub fn with_runner(config: SenderConfig, runner: R) -> Self {
        let stager = AttachmentStager::new(config.sandbox.clone(), config.staging_dir.clone());
        Self {
            config,
            stager,
            runner,
        }
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Send to a phone number or email.
    pub fn send(&self, to: &str, msg: &Message) -> Result<()> {
        self.ensure_platform()?;
        if to.trim().is_empty() {
            return Err(ImsgError::MissingRecipient);
        }
        self.deliver(Target::Handle(to), msg)
    }

    pub fn send_text(&self, to: &str, text: &str) -> Result<()> {
        self.send(to, &Message::text(text))
    }

    pub fn send_file(&self, to: &str, path: &str) -> Result<()> {
        self.send(to, &Message::default().with_attachment(path))
    }

    /// Attachments in order, with optional text sent first.
    pub fn send_files(&self, to: &str, paths: &[String], text: &str) -> Result<()> {
        self.send(
            to,
            &Message {
                text: text.to_string(),
                attachments: paths.to_vec(),
            },
        )
    }

    /// Send to an existing conversation by chat GUID.
    pub fn send_chat_id(&self, chat_id: &str, msg: &Message) -> Result<()> {
        self.ensure_platform()?;
        if chat_id.trim().is_empty() {
            return Err(ImsgError::MissingChatId);
        }
        self.deliver(Target::Chat(chat_id), msg)
    }

    pub fn send_chat_text(&self, chat_id: &str, text: &str) -> Result<()> {
        self.send_chat_id(chat_id, &Message::text(text))
    }

    fn ensure_platform(&self) -> Result<()> {
        if self.runner.platform_supported() {
            Ok(())
        } else {
            Err(ImsgError::UnsupportedPlatform)
        }
    }

    fn deliver(&self, target: Target<'_>, msg: &Message) -> Result<()> {
        if !msg.has_text() && msg.attachments.is_empty() {
            return Err(ImsgError::EmptyMessage);
        }

        let staged = self.stager.stage(&msg.attachments)?;
        let script = build_send_script(target, &msg.text, staged.attachments());

        if self.config.debug {
            debug!(script = %script, "imsg: executing AppleScript");
        }

        let result = self.runner.run(&script, self.config.script_timeout);
        staged.cleanup(self.config.debug);

        let output = result?;
        if self.config.debug && !output.is_empty() {
            debug!(output = %output, "imsg: osascript output");
        }
        Ok(())
    }
}

/// [`Client::send`] with default settings.
pub fn send(to: &str, msg: &Message) -> Result<()> {
    Client::default().send(to, msg)
}

/// [`Client::send_text`] with default settings.
pub fn send_text(to: &str, text: &str) -> Result<()> {
    Client::default().send_text(to, text)
}

/// [`Client::send_file`] with default settings.
pub fn send_file(to: &str, path: &str) -> Result<()> {
    Client::default().send_file(to, path)
}

/// [`Client::send_files`] with default settings.
pub fn send_files(to: &str, paths: &[String], text: &str) -> Result<()> {
    Client::default().send_files(to, paths, text)
}

/// [`Client::send_chat_id`] with default settings.
pub fn send_chat_id(chat_id: &str, msg: &Message) -> Result<()> {
    Client::default().send_chat_id(chat_id, msg)
}
