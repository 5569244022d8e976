//! Bot command parsing and response formatting.
//!
//! This module provides the complete command processing pipeline of the bot,
//! letting Telegram users trigger emotes, group invites and lag requests.
//!
//! # Overview
//!
//! The commands module handles the entire lifecycle of bot commands:
//! 1. **Parsing** - Converting message text into structured [`command::Command`] enums
//! 2. **Gating** - Checking the sender joined every required channel
//! 3. **Validation** - Rejecting malformed arguments before any network call
//! 4. **Execution** - Routing commands to the action handlers
//! 5. **Response** - Formatting results as stylized Markdown with inline buttons
//!
//! # Architecture
//!
//! ```text
//! Telegram Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: handle_message() + handle_callback()
//! └─────────────┘
//!      │
//!      ├── parse() ──────────────────┐
//!      │                             ▼
//!      │                  ┌──────────────────┐
//!      │                  │  command::Command│
//!      │                  └──────────────────┘
//!      │
//!      ├── MembershipGate ── join prompt when a channel is missing
//!      │
//!      └── execute() ───────────────┐
//!                                   ▼
//!                        ┌─────────────────────┐
//!                        │ Action Handlers     │
//!                        │  - handle_help      │
//!                        │  - handle_emote     │
//!                        │  - handle_group     │
//!                        │  - handle_lag       │
//!                        └─────────────────────┘
//!                                   │
//!                                   ▼
//!                        ┌────────────────────┐
//!                        │  CommandResult     │
//!                        │  - response (MD)   │
//!                        │  - buttons         │
//!                        └────────────────────┘
//! ```
//!
//! ## Available Commands
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `/start`, `/help` | None | Welcome message and useful links |
//! | `/emote` | `<team_code> <uid>... <emote_id>` | Play an emote for 1 to 4 players |
//! | `/5g` | `<uid>` | Send a 5-player group invite |
//! | `/6g` | `<uid>` | Send a 6-player group invite |
//! | `/lag` | `<team_code>` | Send a lag request to a team |
//!
//! # Error Handling
//!
//! The module distinguishes between two error categories:
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): Messages that aren't commands
//!   or are unknown commands. These should not generate responses.
//!
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): Invalid command arguments.
//!   These include helpful error messages for the user.
//!
//! # Module Organization
//!
//! - [`commander`] - Main orchestrator for parsing and executing commands
//! - [`command`] - Command enum definitions and parsing logic
//! - [`actions`] - Individual command handler implementations
//! - [`markdown_response`] - Response formatting utilities

mod actions;
mod command;
mod commander;
mod markdown_response;

pub use crate::commands::commander::Commander;

/// Runtime context for command execution.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext {
    /// Telegram id of the user who issued the command
    pub user_id: u64,
}

/// Inline keyboard button attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    /// Opens `url`
    Url { label: String, url: String },
    /// Sends `data` back to the bot as a callback query
    Callback { label: String, data: String },
}

/// Result of command execution.
///
/// # Fields
///
/// * `response` - Markdown-formatted message to send to the chat
/// * `buttons` - Inline keyboard rows, empty for a plain message
///
/// # Examples
///
/// ```
/// # use emotebot::commands::CommandResult;
/// let result = CommandResult {
///     response: "*✅ ᴠᴇʀɪꜰɪᴇᴅ*".to_string(),
///     buttons: vec![],
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Markdown-formatted response message
    pub response: String,
    /// Inline keyboard rows
    pub buttons: Vec<Vec<Button>>,
}

impl CommandResult {
    /// A reply without keyboard.
    pub fn text(response: String) -> Self {
        CommandResult {
            response,
            buttons: vec![],
        }
    }
}

/// Outcome of an inline button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackResult {
    /// Alert shown to the user, `None` to acknowledge silently
    pub notice: Option<String>,
    /// Message sent to the chat of the button afterwards
    pub followup: Option<CommandResult>,
}

/// Errors that can occur during command parsing.
///
/// This enum distinguishes between errors that should produce user-facing
/// messages and those that should be silently ignored.
///
/// # Variants
///
/// * `NotForBot` - Message is not a command or is an unknown command.
///   Should be handled silently without responding to the user.
///
/// * `InvalidCommand` - Command arguments are invalid.
///   Contains a user-friendly error message to display.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command arguments with error message
    InvalidCommand(String),
}
