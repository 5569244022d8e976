//! HTTP client for the action endpoints.
//!
//! This module provides the [`ActionRequester`] struct for calling the emote,
//! group and lag services. Each call is a single GET with a fixed timeout and
//! returns either the accepted response or an [`ActionError`].

use std::time::Duration;

use log::{debug, info};
use mockall::automock;
use reqwest::Client;
use serde_json::Value;

use crate::{
    config::Api,
    ffapi::{ActionError, ActionResponse, GroupSize},
};

/// Number of UID slots accepted by the emote endpoint.
pub const UID_SLOTS: usize = 4;

/// HTTP client for requesting actions from the automation services.
///
/// # Examples
///
/// ```no_run
/// let requester = ActionRequester::new(&config.api)?;
/// let response = requester.group(GroupSize::Five, "1299021866").await?;
/// println!("{}", response.message);
/// ```
pub struct ActionRequester {
    /// Base URL of the emote service
    emote_url: String,
    /// Base URL of the group service
    group_url: String,
    /// Base URL of the lag service
    lag_url: String,
    /// HTTP client
    client: Client,
}

/// Trait for making requests to the action services.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
/// Implementations only return `Ok` for responses whose status is `success`.
#[automock]
pub trait Requester {
    /// Plays `emote_id` for up to four players in the team `team_code`.
    async fn emote(
        &self,
        team_code: &str,
        uids: &[String],
        emote_id: u64,
    ) -> Result<ActionResponse, ActionError>;
    /// Sends a group invite of the given size to `uid`.
    async fn group(&self, size: GroupSize, uid: &str) -> Result<ActionResponse, ActionError>;
    /// Sends a lag request to the team `team_code`.
    async fn lag(&self, team_code: &str) -> Result<ActionResponse, ActionError>;
}

impl ActionRequester {
    /// Create a new [ActionRequester].
    ///
    /// # Arguments
    ///
    /// * `api` - API section of the configuration: base URLs, timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api: &Api) -> Result<Self, ActionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.request_timeout))
            .user_agent(api.user_agent.clone())
            .build()?;

        Ok(ActionRequester {
            emote_url: api.emote_url.clone(),
            group_url: api.group_url.clone(),
            lag_url: api.lag_url.clone(),
            client,
        })
    }

    /// Sends a GET request and checks the `status` field of the body.
    ///
    /// The HTTP status code is not checked: the services answer errors with a
    /// JSON body too. Any JSON object is accepted, and only a `status` equal
    /// to the string `success` is a success.
    async fn request(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<ActionResponse, ActionError> {
        debug!("request {} {:?}", url, query);

        let body = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .text()
            .await?;

        let value: Value = serde_json::from_str(&body)?;
        if !value.is_object() {
            return Err(ActionError::Decode(serde::de::Error::custom(format!(
                "expected a JSON object, got {}",
                value
            ))));
        }

        let response: ActionResponse = serde_json::from_value(value)?;
        debug!("response from {} -> {}", url, response);

        if !response.is_success() {
            return Err(ActionError::Rejected(response.message));
        }

        Ok(response)
    }
}

impl Requester for ActionRequester {
    /// Request `/emote?tc=&uid1=&uid2=&uid3=&uid4=&emote_id=`.
    ///
    /// Unused UID slots are sent empty, extra UIDs past the fourth are ignored.
    async fn emote(
        &self,
        team_code: &str,
        uids: &[String],
        emote_id: u64,
    ) -> Result<ActionResponse, ActionError> {
        let url = format!("{}/emote", &self.emote_url);
        info!("request emote {} for team {}", emote_id, team_code);

        let mut query = vec![("tc", team_code.to_string())];
        let slots: [&str; UID_SLOTS] = ["uid1", "uid2", "uid3", "uid4"];
        for (index, slot) in slots.into_iter().enumerate() {
            query.push((slot, uids.get(index).cloned().unwrap_or_default()));
        }
        query.push(("emote_id", emote_id.to_string()));

        self.request(&url, &query).await
    }

    /// Request `/5group?uid=` or `/6group?uid=`.
    async fn group(&self, size: GroupSize, uid: &str) -> Result<ActionResponse, ActionError> {
        let url = format!("{}/{}", &self.group_url, size.path());
        info!("request {}-player group for {}", size.players(), uid);

        self.request(&url, &[("uid", uid.to_string())]).await
    }

    /// Request `/lag?tc=`.
    async fn lag(&self, team_code: &str) -> Result<ActionResponse, ActionError> {
        let url = format!("{}/lag", &self.lag_url);
        info!("request lag for team {}", team_code);

        self.request(&url, &[("tc", team_code.to_string())]).await
    }
}
