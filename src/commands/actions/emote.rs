//! Emote command handler.
//!
//! Asks the emote service to play an emote for 1 to 4 players of a team, then
//! resolves the emote name from the item cache for the confirmation.
//!
//! The name is only looked up after the service accepted the request, so a
//! rejected emote never triggers an item list download.

use log::{debug, info};
use tokio::sync::Mutex;

use crate::{
    commands::{CommandResult, actions::reply_to_error, markdown_response::format_emote_success},
    ffapi::{Clock, ItemCache, ItemFetcher, Requester},
};

/// Plays `emote_id` for `uids` in the team `team_code`.
///
/// # Arguments
///
/// * `requester` - Client of the action services
/// * `items` - Item cache used to name the emote, locked for the whole lookup
/// * `team_code` - 7 digit team code
/// * `uids` - 1 to 4 player UIDs
/// * `emote_id` - Emote to play
pub async fn handle_emote<R: Requester, F: ItemFetcher, C: Clock>(
    requester: &R,
    items: &Mutex<ItemCache<F, C>>,
    team_code: &str,
    uids: &[String],
    emote_id: u64,
) -> CommandResult {
    debug!(
        "handling emote command: team {} uids {:?} emote {}",
        team_code, uids, emote_id
    );

    if let Err(e) = requester.emote(team_code, uids, emote_id).await {
        return reply_to_error("emote", e);
    }

    let emote_name = items.lock().await.get_emote_name(emote_id).await;
    info!(
        "emote {} ({}) executed in team {}",
        emote_id, emote_name, team_code
    );

    CommandResult::text(format_emote_success(team_code, uids, &emote_name, emote_id))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockall::predicate::{always, eq};
    use serde_json::json;

    use super::*;
    use crate::{
        ffapi::{
            ActionError, ActionResponse, ItemRecord, MockItemFetcher, MockRequester, SystemClock,
        },
        utils::fancy_text,
    };

    fn success() -> ActionResponse {
        ActionResponse {
            status: Some("success".into()),
            message: "done".to_string(),
            wait_seconds: None,
        }
    }

    fn create_cache(fetcher: MockItemFetcher) -> Mutex<ItemCache<MockItemFetcher, SystemClock>> {
        Mutex::new(ItemCache::new(fetcher, SystemClock, Duration::from_secs(3600)))
    }

    #[tokio::test]
    async fn test_handle_emote_success_resolves_name() {
        let mut requester = MockRequester::new();
        requester
            .expect_emote()
            .with(eq("7488876"), always(), eq(909000075))
            .times(1)
            .returning(|_, uids, _| {
                assert_eq!(uids, ["1299021866".to_string()]);
                Ok(success())
            });

        let mut fetcher = MockItemFetcher::new();
        fetcher.expect_fetch_items().times(1).returning(|| {
            Ok(vec![ItemRecord {
                id: json!(909000075),
                name: Some("Dance".to_string()),
            }])
        });
        let cache = create_cache(fetcher);

        let uids = vec!["1299021866".to_string()];
        let result = handle_emote(&requester, &cache, "7488876", &uids, 909000075).await;

        assert!(result.response.contains("7488876"));
        assert!(result.response.contains("1299021866"));
        assert!(result.response.contains(&fancy_text("EMOTE: Dance")));
        assert!(result.buttons.is_empty());
    }

    #[tokio::test]
    async fn test_handle_emote_unknown_name_falls_back() {
        let mut requester = MockRequester::new();
        requester
            .expect_emote()
            .returning(|_, _, _| Ok(success()));

        let mut fetcher = MockItemFetcher::new();
        fetcher
            .expect_fetch_items()
            .returning(|| Err(anyhow::anyhow!("timeout")));
        let cache = create_cache(fetcher);

        let uids = vec!["1".to_string(), "2".to_string()];
        let result = handle_emote(&requester, &cache, "7488876", &uids, 42).await;

        assert!(result.response.contains(&fancy_text("EMOTE: Emote 42")));
        assert!(result.response.contains("1, 2"));
    }

    #[tokio::test]
    async fn test_handle_emote_rejected_skips_name_lookup() {
        let mut requester = MockRequester::new();
        requester
            .expect_emote()
            .returning(|_, _, _| Err(ActionError::Rejected("invalid team".to_string())));

        let mut fetcher = MockItemFetcher::new();
        fetcher.expect_fetch_items().never();
        let cache = create_cache(fetcher);

        let uids = vec!["1299021866".to_string()];
        let result = handle_emote(&requester, &cache, "7488876", &uids, 909000075).await;

        assert_eq!(
            result.response,
            format!("*{}*", fancy_text("❌ FAILED: invalid team"))
        );
    }
}
