//! Free Fire automation API integration.
//!
//! This module talks to the remote action endpoints (emote, group invites and
//! lag) and to the externally hosted item metadata list used to resolve emote
//! names.
//!
//! # Modules
//!
//! - `requester` - HTTP client for the three action endpoints
//! - `items` - Time-gated cache of the item metadata list
//! - `response_structs` - JSON bodies returned by the remote services
//!
//! # Examples
//!
//! ```no_run
//! use emotebot::ffapi::{ActionRequester, Requester};
//!
//! # async fn example(api: &emotebot::config::Api) -> Result<(), emotebot::ffapi::ActionError> {
//! let requester = ActionRequester::new(api)?;
//! let response = requester.lag("7488876").await?;
//! println!("{}", response.message);
//! # Ok(())
//! # }
//! ```

mod items;
mod requester;
mod response_structs;

use std::fmt;

pub use crate::ffapi::items::{Clock, HttpItemFetcher, ItemCache, ItemFetcher, SystemClock};
pub use crate::ffapi::requester::{ActionRequester, Requester};
pub use crate::ffapi::response_structs::{ActionResponse, ItemRecord};

#[cfg(test)]
pub use crate::ffapi::items::MockItemFetcher;
#[cfg(test)]
pub use crate::ffapi::requester::MockRequester;

/// Status value the action endpoints return when the request was accepted.
pub const SUCCESS_STATUS: &str = "success";

/// Size of the group invite sent by the group endpoint.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum GroupSize {
    /// 5-player group, `/5group`
    Five,
    /// 6-player group, `/6group`
    Six,
}

impl GroupSize {
    /// Path of the endpoint on the group API.
    pub fn path(&self) -> &'static str {
        match self {
            GroupSize::Five => "5group",
            GroupSize::Six => "6group",
        }
    }

    /// Number of players in the group.
    pub fn players(&self) -> u8 {
        match self {
            GroupSize::Five => 5,
            GroupSize::Six => 6,
        }
    }
}

/// Errors returned by the action endpoints.
///
/// # Variants
///
/// * `Transport` - The request could not be sent, timed out, or the body could not be read
/// * `Decode` - The body is not the expected JSON object
/// * `Rejected` - The service answered with a status other than `success`
#[derive(Debug)]
pub enum ActionError {
    /// Network failure or timeout.
    Transport(reqwest::Error),
    /// Malformed JSON body.
    Decode(serde_json::Error),
    /// The service refused the action, with its own message.
    Rejected(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ActionError::Transport(e) => write!(f, "transport error: {}", e),
            ActionError::Decode(e) => write!(f, "invalid response body: {}", e),
            ActionError::Rejected(message) => write!(f, "action rejected: {}", message),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<reqwest::Error> for ActionError {
    fn from(e: reqwest::Error) -> Self {
        ActionError::Transport(e)
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(e: serde_json::Error) -> Self {
        ActionError::Decode(e)
    }
}
