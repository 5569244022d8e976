//! Lag command handler.

use log::debug;

use crate::{
    commands::{CommandResult, actions::reply_to_error, markdown_response::format_lag_success},
    ffapi::Requester,
};

/// Sends a lag request to the team `team_code`.
///
/// The confirmation shows the wait announced by the service, `N/A` when absent.
pub async fn handle_lag<R: Requester>(requester: &R, team_code: &str) -> CommandResult {
    debug!("handling lag command for team {}", team_code);

    match requester.lag(team_code).await {
        Ok(response) => CommandResult::text(format_lag_success(team_code, &response)),
        Err(e) => reply_to_error("lag", e),
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::{
        ffapi::{ActionError, ActionResponse, MockRequester},
        utils::fancy_text,
    };

    #[tokio::test]
    async fn test_handle_lag_success() {
        let mut requester = MockRequester::new();
        requester
            .expect_lag()
            .with(eq("7488876"))
            .times(1)
            .returning(|_| {
                Ok(ActionResponse {
                    status: Some("success".into()),
                    message: "queued".to_string(),
                    wait_seconds: Some(json!(30)),
                })
            });

        let result = handle_lag(&requester, "7488876").await;

        assert!(result.response.contains(&fancy_text("TEAM CODE: 7488876")));
        assert!(result.response.contains(&fancy_text("MESSAGE: queued")));
        assert!(result.response.contains(&fancy_text("WAIT: 30")));
    }

    #[tokio::test]
    async fn test_handle_lag_rejected() {
        let mut requester = MockRequester::new();
        requester
            .expect_lag()
            .returning(|_| Err(ActionError::Rejected("cooldown".to_string())));

        let result = handle_lag(&requester, "7488876").await;
        assert!(result.response.contains(&fancy_text("FAILED: cooldown")));
    }
}
