//! imsg - send iMessages from the command line
//!
//! AppleScript for sending, a read-only SQLite query for chat lookup.
//!
//! Exit codes: 0 success, 1 operational error, 2 usage error.
//!
//! CHANGELOG:
//! - 02/13/2026 - send-chat and lookup subcommands
//! - 02/12/2026 - Initial CLI

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use imsg::commands::{self, messaging::SendOptions};
use imsg::output::{self, OutputControls};
use imsg::{ImsgError, SenderConfig};

/// Send iMessages and attachments through Messages.app.
#[derive(Parser, Debug)]
#[command(name = "imsg")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log generated scripts, osascript output and cleanup failures
    #[arg(long, global = true)]
    debug: bool,

    /// Output as JSON (lookup results and errors)
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send to a phone number or email
    Send {
        /// Recipient phone number or email
        #[arg(long)]
        to: String,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Send to a chat by id (see `lookup`)
    SendChat {
        /// Chat id (guid) from the Messages database
        #[arg(long)]
        chat_id: String,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Print chat ids whose display name contains NAME, most recent first
    Lookup {
        /// Chat display name to search for
        #[arg(long)]
        name: String,

        /// Max results to print (0 for all)
        #[arg(short, long, default_value_t = 0)]
        limit: usize,
    },
}

#[derive(clap::Args, Debug)]
struct ContentArgs {
    /// Message text
    #[arg(long)]
    text: Option<String>,

    /// File to send (repeatable, sent in order after the text)
    #[arg(long = "file")]
    files: Vec<String>,

    /// osascript timeout in seconds (default 30)
    #[arg(long)]
    timeout: Option<u64>,
}

impl ContentArgs {
    fn into_options(self, debug: bool) -> SendOptions {
        SendOptions {
            text: self.text,
            files: self.files,
            timeout_secs: self.timeout,
            debug,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug = cli.debug || SenderConfig::from_env().map(|c| c.debug).unwrap_or(false);
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let output_controls = OutputControls {
        json: cli.json,
        compact: cli.compact,
    };

    let result = match cli.command {
        Command::Send { to, content } => {
            commands::messaging::send(&to, &content.into_options(debug))
        }
        Command::SendChat { chat_id, content } => {
            commands::messaging::send_chat(&chat_id, &content.into_options(debug))
        }
        Command::Lookup { name, limit } => {
            commands::lookup::lookup(&name, limit, &output_controls)
        }
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if output_controls.json {
                eprintln!("{}", output::format_error(&e.to_string()));
            } else {
                eprintln!("{}", e);
            }
            let usage = e
                .downcast_ref::<ImsgError>()
                .is_some_and(ImsgError::is_usage);
            ExitCode::from(if usage { 2 } else { 1 })
        }
    }
}
