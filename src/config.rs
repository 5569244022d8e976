//! Configuration file structures for the emotebot.
//!
//! The configuration is read from a YAML file and can be overridden with
//! environment variables prefixed by `EMOTEBOT_`, nested keys being separated
//! by `__` (for example `EMOTEBOT_TELEGRAM__TOKEN`).
//!
//! # Configuration File Format
//!
//! ```yaml
//! telegram:
//!   # Bot token from @BotFather
//!   token: "123456:abcdef"
//!   # Long polling timeout in seconds
//!   polling_timeout: 20
//!   # Delay before polling again after a failure, in seconds
//!   retry_delay: 5
//!   # Channels users must join before using the bot
//!   channels:
//!     - username: "@ShadowGamerzFF"
//!       title: "Shadow Gamerz FF"
//!       url: "https://t.me/ShadowGamerzFF"
//!
//! api:
//!   emote_url: "http://127.0.0.1:2004"
//!   group_url: "http://127.0.0.1:2009"
//!   lag_url: "http://127.0.0.1:2010"
//!   items_url: "https://raw.githubusercontent.com/TeamShadows/Shadow-FF-Data/main/itemData.json"
//!
//! # Buttons shown under the welcome message
//! links:
//!   - title: "Browse Emotes"
//!     url: "https://shadow-emote-list.vercel.app/"
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Prefix of the environment variables overriding the configuration file.
pub const ENV_PREFIX: &str = "EMOTEBOT_";

/// Root configuration structure.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Telegram bot configuration
    pub telegram: Telegram,
    /// Remote services configuration
    pub api: Api,
    /// Link buttons of the welcome message
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Telegram bot configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct Telegram {
    /// Bot token. Validated with `getMe` at startup.
    pub token: String,

    /// Long polling timeout in seconds.
    #[serde(default = "default_polling_timeout")]
    pub polling_timeout: u32,

    /// Seconds to wait before polling again after a failure.
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,

    /// Channels a user must have joined before any command runs.
    ///
    /// An empty list disables the membership check.
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// A channel required by the membership check.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Public username used to query membership, with the leading `@`
    pub username: String,
    /// Button label in the join prompt
    pub title: String,
    /// Invite link opened by the button
    pub url: String,
}

/// Remote services configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct Api {
    /// Base URL of the emote service
    pub emote_url: String,
    /// Base URL of the 5 and 6 player group service
    pub group_url: String,
    /// Base URL of the lag service
    pub lag_url: String,
    /// URL of the JSON item metadata list
    pub items_url: String,

    /// Timeout of action requests in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Timeout of the item list download in seconds.
    #[serde(default = "default_items_timeout")]
    pub items_timeout: u64,

    /// Seconds after which the item list is downloaded again.
    #[serde(default = "default_cache_duration")]
    pub cache_duration: u64,

    /// `User-Agent` header of every outbound request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// A link button of the welcome message.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Button label
    pub title: String,
    /// URL opened by the button
    pub url: String,
}

fn default_polling_timeout() -> u32 {
    20
}

fn default_retry_delay() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    20
}

fn default_items_timeout() -> u64 {
    12
}

fn default_cache_duration() -> u64 {
    3600
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

impl Config {
    /// Loads the configuration from a YAML file, then applies `EMOTEBOT_` environment overrides.
    ///
    /// Trailing slashes are removed from the base URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing from both sources or a value has the wrong type.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        let figment = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: Config = figment.extract()?;
        config.api.normalize_urls();

        Ok(config)
    }
}

impl Api {
    fn normalize_urls(&mut self) {
        for url in [
            &mut self.emote_url,
            &mut self.group_url,
            &mut self.lag_url,
        ] {
            while url.ends_with('/') {
                url.pop();
            }
        }
    }
}
