//! Bot module wiring Telegram to the command pipeline.
//!
//! This module provides the main [`Bot`] implementation that connects the Telegram
//! client with the remote action services. It owns every long-lived component and
//! routes each incoming event to the [`Commander`].
//!
//! # Event Processing Flow
//!
//! ```text
//! getUpdates → IncomingEvent → Commander → CommandResult → sendMessage
//!                                        → CallbackResult → answerCallbackQuery (+ sendMessage)
//! ```
//!
//! Events are processed one at a time, in the order Telegram delivers them.
//!
//! # Example
//!
//! ```no_run
//! # use emotebot::bot::Bot;
//! # use emotebot::config::Config;
//! # async fn run() -> Result<(), anyhow::Error> {
//! let config = Config::load("config.yaml")?;
//!
//! let bot = Bot::new(config).await?;
//! bot.start().await; // Runs indefinitely
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use anyhow::Context;
use log::{debug, info, warn};

use crate::{
    commands::{CommandContext, Commander},
    config::Config,
    ffapi::{ActionRequester, HttpItemFetcher, ItemCache, SystemClock},
    telegram::{
        CallbackEvent, IncomingEvent, MembershipGate, MessageEvent, TelegramClient, TelegramSync,
    },
};

/// Main bot structure.
///
/// # Components
///
/// - `client` - Outbound Telegram calls, also the membership source of the gate
/// - `sync` - Long polling loop
/// - `commander` - Command parsing, membership gate and action handlers
pub struct Bot {
    /// Telegram client used to reply.
    client: TelegramClient,

    /// Long polling loop feeding [`Bot::handle_event`].
    sync: TelegramSync<TelegramClient>,

    /// Command parser and executor.
    commander: Commander<ActionRequester, HttpItemFetcher, SystemClock, TelegramClient>,
}

impl Bot {
    /// Creates a new Bot instance from configuration.
    ///
    /// Validates the bot token against Telegram and builds the HTTP clients of
    /// the remote services. The item list is not downloaded until the first emote.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The token is rejected or Telegram cannot be reached
    /// - An HTTP client cannot be built (invalid user agent)
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let client =
            TelegramClient::new(&config.telegram.token, config.telegram.polling_timeout).await?;

        let requester =
            ActionRequester::new(&config.api).context("failed to build the action client")?;
        let fetcher = HttpItemFetcher::new(
            &config.api.items_url,
            Duration::from_secs(config.api.items_timeout),
            &config.api.user_agent,
        )
        .context("failed to build the item list client")?;
        let items = ItemCache::new(
            fetcher,
            SystemClock,
            Duration::from_secs(config.api.cache_duration),
        );

        if config.telegram.channels.is_empty() {
            warn!("no required channel configured, membership check disabled");
        }
        let gate = MembershipGate::new(client.clone(), config.telegram.channels);

        let commander = Commander::new(requester, items, gate, config.links);

        let sync = TelegramSync::new(
            client.clone(),
            config.telegram.polling_timeout,
            Duration::from_secs(config.telegram.retry_delay),
        );

        Ok(Bot {
            client,
            sync,
            commander,
        })
    }

    /// Starts polling Telegram. Runs until the process is terminated.
    pub async fn start(self) {
        info!("bot running, waiting for commands");
        self.sync.sync(|event| self.handle_event(event)).await;
    }

    async fn handle_event(&self, event: IncomingEvent) {
        match event {
            IncomingEvent::Message(message) => self.handle_message(message).await,
            IncomingEvent::Callback(callback) => self.handle_callback(callback).await,
        }
    }

    /// Answers a message in its chat, threaded onto it.
    async fn handle_message(&self, message: MessageEvent) {
        let context = CommandContext {
            user_id: message.user_id,
        };

        let Some(result) = self.commander.handle_message(&message.text, &context).await else {
            return;
        };

        debug!(
            "replying to message {} of user {} in chat {}",
            message.message_id, message.user_id, message.chat_id
        );
        self.client
            .send_reply(message.chat_id, Some(message.message_id), &result)
            .await;
    }

    /// Answers the callback query, then sends the follow-up message if any.
    async fn handle_callback(&self, callback: CallbackEvent) {
        let context = CommandContext {
            user_id: callback.user_id,
        };

        let result = self.commander.handle_callback(&callback.data, &context).await;
        self.client
            .answer_callback(&callback, result.notice.as_deref())
            .await;

        match (result.followup, callback.chat_id) {
            (Some(followup), Some(chat_id)) => {
                self.client.send_reply(chat_id, None, &followup).await;
            }
            (Some(_), None) => {
                warn!(
                    "callback of user {} has no accessible chat, follow-up dropped",
                    callback.user_id
                );
            }
            (None, _) => {}
        }
    }
}
