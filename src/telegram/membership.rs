//! Channel membership gate.
//!
//! Users must belong to every configured channel before a command runs.
//! The gate asks a [`ChatMembership`] source for the status of the user in
//! each channel and reports the channels still to join.

use futures::future::join_all;
use log::{debug, warn};
use mockall::automock;

use crate::config::Channel;

/// Status of a user in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    /// Member, administrator, owner or restricted member
    Joined,
    /// Never joined or left the channel
    Left,
    /// Banned from the channel
    Kicked,
}

/// Source of channel membership information.
#[automock]
pub trait ChatMembership {
    /// Looks up the status of `user_id` in the channel `@username`.
    async fn member_status(
        &self,
        channel: &str,
        user_id: u64,
    ) -> Result<MembershipStatus, anyhow::Error>;
}

/// Force-join policy over a fixed list of channels.
pub struct MembershipGate<M: ChatMembership> {
    membership: M,
    channels: Vec<Channel>,
}

impl<M: ChatMembership> MembershipGate<M> {
    /// Create a new [MembershipGate].
    ///
    /// # Arguments
    ///
    /// * `membership` - Source used to look up statuses
    /// * `channels` - Channels every user must have joined
    pub fn new(membership: M, channels: Vec<Channel>) -> Self {
        MembershipGate {
            membership,
            channels,
        }
    }

    /// Required channels, in configuration order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Returns the usernames of the channels `user_id` has not joined.
    ///
    /// A failed lookup counts as not joined. An empty result means the user may proceed.
    pub async fn check_force_join(&self, user_id: u64) -> Vec<String> {
        let statuses = join_all(
            self.channels
                .iter()
                .map(|channel| self.membership.member_status(&channel.username, user_id)),
        )
        .await;

        let not_joined: Vec<String> = self
            .channels
            .iter()
            .zip(statuses)
            .filter_map(|(channel, status)| match status {
                Ok(MembershipStatus::Joined) => None,
                Ok(status) => {
                    debug!("user {} is {:?} in {}", user_id, status, channel.username);
                    Some(channel.username.clone())
                }
                Err(e) => {
                    warn!(
                        "membership lookup of user {} in {} failed: {}",
                        user_id, channel.username, e
                    );
                    Some(channel.username.clone())
                }
            })
            .collect();

        not_joined
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};

    use super::*;

    fn create_channels() -> Vec<Channel> {
        vec![
            Channel {
                username: "@first".to_string(),
                title: "First".to_string(),
                url: "https://t.me/first".to_string(),
            },
            Channel {
                username: "@second".to_string(),
                title: "Second".to_string(),
                url: "https://t.me/second".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_joined_everywhere() {
        let mut membership = MockChatMembership::new();
        membership
            .expect_member_status()
            .with(always(), eq(7))
            .times(2)
            .returning(|_, _| Ok(MembershipStatus::Joined));

        let gate = MembershipGate::new(membership, create_channels());
        assert!(gate.check_force_join(7).await.is_empty());
    }

    #[tokio::test]
    async fn test_left_and_kicked_are_reported() {
        let mut membership = MockChatMembership::new();
        membership
            .expect_member_status()
            .with(eq("@first"), always())
            .returning(|_, _| Ok(MembershipStatus::Left));
        membership
            .expect_member_status()
            .with(eq("@second"), always())
            .returning(|_, _| Ok(MembershipStatus::Kicked));

        let gate = MembershipGate::new(membership, create_channels());
        assert_eq!(gate.check_force_join(7).await, vec!["@first", "@second"]);
    }

    #[tokio::test]
    async fn test_lookup_error_counts_as_not_joined() {
        let mut membership = MockChatMembership::new();
        membership
            .expect_member_status()
            .with(eq("@first"), always())
            .returning(|_, _| Ok(MembershipStatus::Joined));
        membership
            .expect_member_status()
            .with(eq("@second"), always())
            .returning(|_, _| Err(anyhow::anyhow!("Bad Request: member list is inaccessible")));

        let gate = MembershipGate::new(membership, create_channels());
        assert_eq!(gate.check_force_join(7).await, vec!["@second"]);
    }

    #[tokio::test]
    async fn test_no_channels_configured() {
        let membership = MockChatMembership::new();
        let gate = MembershipGate::new(membership, vec![]);

        assert!(gate.check_force_join(7).await.is_empty());
        assert!(gate.channels().is_empty());
    }
}
