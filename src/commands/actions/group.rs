//! Group invite command handler for `/5g` and `/6g`.

use log::debug;

use crate::{
    commands::{
        CommandResult, actions::reply_to_error, markdown_response::format_group_success,
    },
    ffapi::{GroupSize, Requester},
};

/// Sends a `size` player group invite to `uid`.
pub async fn handle_group<R: Requester>(
    requester: &R,
    size: GroupSize,
    uid: &str,
) -> CommandResult {
    debug!("handling {} group command for uid {}", size.players(), uid);

    match requester.group(size, uid).await {
        Ok(response) => CommandResult::text(format_group_success(size, uid, &response)),
        Err(e) => reply_to_error(size.path(), e),
    }
}
