//! Telegram integration for the bot.
//!
//! This module wraps the `teloxide` Bot API client and provides:
//! - Token validation at startup
//! - A long polling loop turning updates into [`IncomingEvent`]s
//! - Replies with Markdown text and inline keyboards
//! - The channel membership gate
//!
//! # Architecture
//!
//! - [`client::TelegramClient`] - outbound calls (send, answer callbacks, membership lookups)
//! - [`sync::TelegramSync`] - inbound long polling loop
//! - [`membership::MembershipGate`] - force-join policy over a [`membership::ChatMembership`] source

mod client;
mod membership;
mod sync;

use teloxide::types::{CallbackQuery, Message, Update, UpdateKind};

pub use crate::telegram::client::TelegramClient;
pub use crate::telegram::membership::{ChatMembership, MembershipGate, MembershipStatus};
pub use crate::telegram::sync::{TelegramSync, UpdateSource};

#[cfg(test)]
pub use crate::telegram::membership::MockChatMembership;
#[cfg(test)]
pub use crate::telegram::sync::MockUpdateSource;

/// Callback data of the "check again" button of the join prompt.
pub const CHECK_JOIN: &str = "check_join";

/// A text message received by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Chat where the message was sent
    pub chat_id: i64,
    /// Id of the message, used to thread the reply
    pub message_id: i32,
    /// Telegram id of the sender
    pub user_id: u64,
    /// Raw message text
    pub text: String,
}

/// A press on an inline keyboard callback button.
#[derive(Debug, Clone)]
pub struct CallbackEvent {
    /// Telegram id of the user who pressed the button
    pub user_id: u64,
    /// Chat of the message carrying the button, if still accessible
    pub chat_id: Option<i64>,
    /// Callback data of the button
    pub data: String,
    /// Original query, needed to answer it
    query: CallbackQuery,
}

/// Events the bot reacts to.
#[derive(Debug, Clone)]
pub enum IncomingEvent {
    Message(MessageEvent),
    Callback(CallbackEvent),
}

impl IncomingEvent {
    /// Extracts the event carried by an update.
    ///
    /// Returns `None` for updates the bot ignores: non-text messages,
    /// messages without sender, edits, and every other update kind.
    pub fn from_update(update: Update) -> Option<Self> {
        match update.kind {
            UpdateKind::Message(message) => Self::from_message(&message),
            UpdateKind::CallbackQuery(query) => Some(IncomingEvent::Callback(CallbackEvent {
                user_id: query.from.id.0,
                chat_id: query.message.as_ref().map(|message| message.chat().id.0),
                data: query.data.clone().unwrap_or_default(),
                query,
            })),
            _ => None,
        }
    }

    fn from_message(message: &Message) -> Option<Self> {
        let text = message.text()?;
        let sender = message.from.as_ref()?;

        Some(IncomingEvent::Message(MessageEvent {
            chat_id: message.chat.id.0,
            message_id: message.id.0,
            user_id: sender.id.0,
            text: text.to_string(),
        }))
    }
}
