//! Telegram client wrapper for bot messaging.
//!
//! This module provides a high-level [`TelegramClient`] interface that wraps the
//! `teloxide` bot and handles token validation, replies, callback answers and
//! membership lookups.

use std::time::Duration;

use anyhow::Context;
use log::{error, info, warn};
use teloxide::{
    prelude::*,
    types::{
        ChatId, ChatMemberKind, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode,
        Recipient, ReplyParameters, Update, UserId,
    },
};

use crate::{
    commands::{Button, CommandResult},
    telegram::{
        CallbackEvent,
        membership::{ChatMembership, MembershipStatus},
        sync::UpdateSource,
    },
};

/// Seconds added to the long polling timeout for the HTTP client timeout.
const HTTP_TIMEOUT_MARGIN: u64 = 10;

/// High-level Telegram client for bot messaging operations.
///
/// Cheap to clone: clones share the same HTTP connection pool.
#[derive(Clone)]
pub struct TelegramClient {
    /// Underlying teloxide bot
    bot: Bot,
}

impl TelegramClient {
    /// Creates the client and validates the token with `getMe`.
    ///
    /// # Arguments
    ///
    /// * `token` - Bot token
    /// * `polling_timeout` - Long polling timeout in seconds, the HTTP timeout is set above it
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or Telegram cannot be reached.
    pub async fn new(token: &str, polling_timeout: u32) -> Result<Self, anyhow::Error> {
        let http_client = teloxide::net::default_reqwest_settings()
            .timeout(Duration::from_secs(
                u64::from(polling_timeout) + HTTP_TIMEOUT_MARGIN,
            ))
            .build()
            .context("failed to build telegram http client")?;

        let bot = Bot::with_client(token, http_client);

        let me = bot
            .get_me()
            .await
            .context("invalid bot token or network error during validation")?;
        info!("bot token valid, logged in as {} (id={})", me.username(), me.id.0);

        Ok(TelegramClient { bot })
    }

    /// Sends a Markdown message with its inline keyboard.
    ///
    /// # Arguments
    ///
    /// * `chat_id` - Destination chat
    /// * `reply_to` - Message to reply to, if any
    /// * `result` - Text and buttons to send
    pub async fn send_reply(&self, chat_id: i64, reply_to: Option<i32>, result: &CommandResult) {
        #[allow(deprecated)]
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), result.response.clone())
            .parse_mode(ParseMode::Markdown);

        if let Some(message_id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(message_id)));
        }
        if let Some(keyboard) = to_keyboard(&result.buttons) {
            request = request.reply_markup(keyboard);
        }

        if let Err(e) = request.await {
            error!("failed to send message to chat {}: {}", chat_id, e);
        }
    }

    /// Answers a callback query, optionally with an alert popup.
    pub async fn answer_callback(&self, event: &CallbackEvent, notice: Option<&str>) {
        let mut request = self.bot.answer_callback_query(event.query.id.clone());

        if let Some(text) = notice {
            request = request.text(text).show_alert(true);
        }

        if let Err(e) = request.await {
            error!("failed to answer callback of user {}: {}", event.user_id, e);
        }
    }
}

impl UpdateSource for TelegramClient {
    async fn get_updates(&self, offset: i32, timeout: u32) -> Result<Vec<Update>, anyhow::Error> {
        let updates = self
            .bot
            .get_updates()
            .offset(offset)
            .timeout(timeout)
            .await?;
        Ok(updates)
    }
}

impl ChatMembership for TelegramClient {
    async fn member_status(
        &self,
        channel: &str,
        user_id: u64,
    ) -> Result<MembershipStatus, anyhow::Error> {
        let member = self
            .bot
            .get_chat_member(Recipient::ChannelUsername(channel.to_string()), UserId(user_id))
            .await?;

        let status = match member.kind {
            ChatMemberKind::Left => MembershipStatus::Left,
            ChatMemberKind::Banned(_) => MembershipStatus::Kicked,
            _ => MembershipStatus::Joined,
        };

        Ok(status)
    }
}

/// Converts reply buttons into an inline keyboard.
///
/// Buttons with an invalid URL are dropped. Returns `None` when nothing is left.
fn to_keyboard(rows: &[Vec<Button>]) -> Option<InlineKeyboardMarkup> {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|button| match button {
                    Button::Url { label, url } => match reqwest::Url::parse(url) {
                        Ok(url) => Some(InlineKeyboardButton::url(label.clone(), url)),
                        Err(e) => {
                            warn!("ignore button {} with invalid url {}: {}", label, url, e);
                            None
                        }
                    },
                    Button::Callback { label, data } => {
                        Some(InlineKeyboardButton::callback(label.clone(), data.clone()))
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    if keyboard.is_empty() {
        return None;
    }

    Some(InlineKeyboardMarkup::new(keyboard))
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;

    #[test]
    fn test_to_keyboard_rows() {
        let rows = vec![
            vec![Button::Url {
                label: "Channel".to_string(),
                url: "https://t.me/channel".to_string(),
            }],
            vec![Button::Callback {
                label: "Check".to_string(),
                data: "check_join".to_string(),
            }],
        ];

        let keyboard = to_keyboard(&rows).unwrap();

        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Channel");
        assert!(matches!(
            &keyboard.inline_keyboard[1][0].kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "check_join"
        ));
    }

    #[test]
    fn test_to_keyboard_drops_invalid_urls() {
        let rows = vec![vec![
            Button::Url {
                label: "Broken".to_string(),
                url: "not a url".to_string(),
            },
            Button::Url {
                label: "Support".to_string(),
                url: "https://t.me/support".to_string(),
            },
        ]];

        let keyboard = to_keyboard(&rows).unwrap();
        assert_eq!(keyboard.inline_keyboard[0].len(), 1);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Support");
    }

    #[test]
    fn test_to_keyboard_empty() {
        assert!(to_keyboard(&[]).is_none());
        assert!(to_keyboard(&[vec![]]).is_none());
    }
}
