//! emotebot - A Telegram bot driving Free Fire emote, group and lag services.
//!
//! This is the main entry point of the bot, which bridges Telegram commands with
//! the remote automation services that join a team, perform an action and leave.
//!
//! # Features
//!
//! - **Emotes**: Play an emote for 1 to 4 players of a team, with its resolved name
//! - **Group Invites**: Send 5 or 6 player group invites
//! - **Lag Requests**: Send a lag request to a team
//! - **Force Join**: Require users to join configured channels before any command
//! - **YAML Configuration**: Simple configuration file with environment variable overrides
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings (see `config.example.yaml`):
//!
//! ```yaml
//! telegram:
//!   token: "123456:ABC-DEF"
//!   channels:
//!     - username: "@ShadowGamerzFF"
//!       title: "Shadow Gamerz FF"
//!       url: "https://t.me/ShadowGamerzFF"
//!
//! api:
//!   emote_url: "http://127.0.0.1:2004"
//!   group_url: "http://127.0.0.1:2009"
//!   lag_url: "http://127.0.0.1:2010"
//!   items_url: "https://example.com/itemData.json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `EMOTEBOT_` prefix:
//!
//! ```bash
//! export EMOTEBOT_TELEGRAM__TOKEN="123456:ABC-DEF"
//! export EMOTEBOT_API__LAG_URL="http://127.0.0.1:2010"
//! ```
//!
//! # Usage
//!
//! ```bash
//! emotebot --config config.yaml --log-file bot.log
//! ```
//!
//! # Bot Commands
//!
//! - `/start`, `/help` - Welcome message with the command list
//! - `/emote <team_code> <uid>... <emote_id>` - Play an emote for 1 to 4 UIDs
//! - `/5g <uid>`, `/6g <uid>` - Send a group invite
//! - `/lag <team_code>` - Send a lag request
//!
//! # Architecture
//!
//! - [`bot`] - Owns the components and routes Telegram events
//! - [`commands`] - Command parsing, validation and execution
//! - [`config`] - YAML configuration with environment variable support
//! - [`ffapi`] - Clients of the action services and the item name cache
//! - [`telegram`] - Telegram client, polling loop and membership gate
//! - [`utils`] - Text styling and the log file target
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::process::ExitCode;

use clap::Parser;
use env_logger::{Env, Target};
use log::{error, info, warn};

use crate::{bot::Bot, config::Config, utils::LogTee};

mod bot;
mod commands;
mod config;
mod ffapi;
mod telegram;
mod utils;

/// Command-line arguments of the bot.
///
/// Most configuration is done through the YAML file (see [`config::Config`]).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Environment variables prefixed with `EMOTEBOT_` override its values,
    /// `__` separating nested keys.
    #[arg(short, long)]
    config: String,

    /// Also append every log line to this file.
    #[arg(short, long)]
    log_file: Option<String>,
}

/// Main entry point of the bot.
///
/// 1. **Argument Parsing**: Parses command-line arguments using `clap`
/// 2. **Logging Setup**: `info` level by default, overridden by `RUST_LOG`,
///    mirrored to the log file when one is given
/// 3. **Configuration Loading**: Reads the YAML file and the environment overrides
/// 4. **Bot Initialization**: Validates the token and builds the service clients
/// 5. **Bot Execution**: Polls Telegram forever
///
/// Exits with a failure code when the configuration cannot be loaded or the
/// bot cannot be initialized.
#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    let mut builder = env_logger::Builder::from_env(env);
    let log_file_error = match &args.log_file {
        Some(path) => match LogTee::open(path) {
            Ok(tee) => {
                builder.target(Target::Pipe(Box::new(tee)));
                None
            }
            Err(e) => Some((path, e)),
        },
        None => None,
    };
    builder.init();

    if let Some((path, e)) = log_file_error {
        warn!("Failed to open log file {}, logging to stderr only: {}", path, e);
    }

    info!("Starting emotebot {}...", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let bot = match Bot::new(config).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    bot.start().await;

    ExitCode::SUCCESS
}
