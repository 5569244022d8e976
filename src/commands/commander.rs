//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, which serves as the main entry point
//! for processing bot commands. It coordinates parsing, the channel membership gate
//! and execution, routing commands to their appropriate handlers.
//!
//! # Flow
//!
//! ```text
//! Telegram Message → parse() → MembershipGate → execute() → CommandResult
//! Button press → handle_callback() → MembershipGate → CallbackResult
//! ```
//!
//! Messages that are not commands of the bot are dropped before the gate, so
//! regular chat never triggers membership lookups. The gate runs before the
//! arguments are reported invalid: users outside the channels only ever see the
//! join prompt.

use log::debug;
use tokio::sync::Mutex;

use crate::{
    commands::{
        CallbackResult, CommandContext, CommandParseError, CommandResult,
        actions::{handle_emote, handle_group, handle_help, handle_join_prompt, handle_lag},
        command::{Command, format_command_error},
        markdown_response::{format_still_not_joined, format_verified},
    },
    config::Link,
    ffapi::{Clock, ItemCache, ItemFetcher, Requester},
    telegram::{CHECK_JOIN, ChatMembership, MembershipGate},
};

/// Command orchestrator for parsing and executing bot commands.
///
/// The Commander is responsible for:
/// - Parsing raw message text into structured commands
/// - Enforcing the channel membership gate
/// - Routing commands to appropriate handlers
/// - Converting errors into user-friendly messages
///
/// The item cache sits behind a [`Mutex`] held for the whole lookup, so two
/// emote commands never download the item list twice.
pub struct Commander<R: Requester, F: ItemFetcher, C: Clock, M: ChatMembership> {
    /// Client of the action services
    requester: R,
    /// Emote names
    items: Mutex<ItemCache<F, C>>,
    /// Required channels
    gate: MembershipGate<M>,
    /// Link buttons of the welcome message
    links: Vec<Link>,
}

impl<R: Requester, F: ItemFetcher, C: Clock, M: ChatMembership> Commander<R, F, C, M> {
    /// Creates a new Commander.
    ///
    /// # Arguments
    ///
    /// * `requester` - Client of the emote, group and lag services
    /// * `items` - Item cache resolving emote names
    /// * `gate` - Channels every user must have joined
    /// * `links` - Link buttons of the welcome message
    pub fn new(
        requester: R,
        items: ItemCache<F, C>,
        gate: MembershipGate<M>,
        links: Vec<Link>,
    ) -> Self {
        Commander {
            requester,
            items: Mutex::new(items),
            gate,
            links,
        }
    }

    /// Parses a message body into a structured command.
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - Successfully parsed and validated command
    /// * `Err(CommandParseError::NotForBot)` - Message is not a command or an unknown one
    /// * `Err(CommandParseError::InvalidCommand)` - Arguments are invalid, with the reply to send
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        Command::parse(body).map_err(|error| match format_command_error(error) {
            Some(message) => CommandParseError::InvalidCommand(message),
            None => CommandParseError::NotForBot,
        })
    }

    /// Handles a text message and returns the reply to send, if any.
    ///
    /// Returns `None` for messages the bot stays silent on.
    pub async fn handle_message(
        &self,
        body: &str,
        context: &CommandContext,
    ) -> Option<CommandResult> {
        let parsed = match self.parse(body) {
            Err(CommandParseError::NotForBot) => return None,
            parsed => parsed,
        };

        let not_joined = self.gate.check_force_join(context.user_id).await;
        if !not_joined.is_empty() {
            debug!(
                "user {} has not joined {:?}, sending join prompt",
                context.user_id, not_joined
            );
            return Some(handle_join_prompt(self.gate.channels()));
        }

        let result = match parsed {
            Ok(command) => self.execute(&command).await,
            Err(CommandParseError::InvalidCommand(message)) => CommandResult::text(message),
            Err(CommandParseError::NotForBot) => return None,
        };

        Some(result)
    }

    /// Executes a parsed command and returns the result.
    ///
    /// # Command Handlers
    ///
    /// - [`Command::Start`] and [`Command::Help`] → [`handle_help`]
    /// - [`Command::Emote`] → [`handle_emote`]
    /// - [`Command::Group`] → [`handle_group`]
    /// - [`Command::Lag`] → [`handle_lag`]
    pub async fn execute(&self, command: &Command) -> CommandResult {
        match command {
            Command::Start | Command::Help => handle_help(&self.links),
            Command::Emote {
                team_code,
                uids,
                emote_id,
            } => handle_emote(&self.requester, &self.items, team_code, uids, *emote_id).await,
            Command::Group { size, uid } => handle_group(&self.requester, *size, uid).await,
            Command::Lag { team_code } => handle_lag(&self.requester, team_code).await,
        }
    }

    /// Handles a press on an inline button.
    ///
    /// Only the check button of the join prompt does something: it runs the gate
    /// again and, once every channel is joined, sends the welcome message.
    /// Other buttons are acknowledged without text.
    pub async fn handle_callback(&self, data: &str, context: &CommandContext) -> CallbackResult {
        if data != CHECK_JOIN {
            debug!("ignore callback {} of user {}", data, context.user_id);
            return CallbackResult {
                notice: None,
                followup: None,
            };
        }

        if !self.gate.check_force_join(context.user_id).await.is_empty() {
            return CallbackResult {
                notice: Some(format_still_not_joined()),
                followup: None,
            };
        }

        debug!("user {} verified", context.user_id);
        CallbackResult {
            notice: Some(format_verified()),
            followup: Some(handle_help(&self.links)),
        }
    }
}
