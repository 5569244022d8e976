//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler receives
//! the validated arguments of its command, performs the remote call if any,
//! and returns a [`CommandResult`].
//!
//! # Handler Pattern
//!
//! Handlers follow a consistent pattern:
//! 1. Receive validated arguments and the services they need
//! 2. Call the remote service
//! 3. Return a result with a stylized Markdown response and optional buttons
//!
//! Handlers never fail: every [`ActionError`] is turned into a reply.
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Welcome message with link buttons
//! - [`handle_join_prompt`] - Channel list with the check button
//! - [`handle_emote`] - Emote for 1 to 4 players
//! - [`handle_group`] - 5 or 6 player group invite
//! - [`handle_lag`] - Lag request to a team

mod emote;
mod group;
mod help;
mod join;
mod lag;

use log::error;

pub use crate::commands::actions::{
    emote::handle_emote, group::handle_group, help::handle_help, join::handle_join_prompt,
    lag::handle_lag,
};
use crate::{
    commands::{
        CommandResult,
        markdown_response::{format_action_error, format_action_failed},
    },
    ffapi::ActionError,
};

/// Turns a failed remote call into the reply sent to the user.
///
/// Rejections show the remote message, anything else gets the generic error.
fn reply_to_error(action: &str, error: ActionError) -> CommandResult {
    let response = match error {
        ActionError::Rejected(message) => format_action_failed(&message),
        other => {
            error!("{} request failed: {}", action, other);
            format_action_error()
        }
    };

    CommandResult::text(response)
}
