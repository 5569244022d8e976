//! Join prompt shown to users missing a required channel.

use log::debug;

use crate::{
    commands::{
        Button, CommandResult,
        markdown_response::{CHECK_JOIN_LABEL, format_join_prompt},
    },
    config::Channel,
    telegram::CHECK_JOIN,
};

/// Returns the channel list with one URL button per channel and the check button last.
pub fn handle_join_prompt(channels: &[Channel]) -> CommandResult {
    debug!("sending join prompt for {} channels", channels.len());

    let mut buttons: Vec<Vec<Button>> = channels
        .iter()
        .map(|channel| {
            vec![Button::Url {
                label: channel.title.clone(),
                url: channel.url.clone(),
            }]
        })
        .collect();

    buttons.push(vec![Button::Callback {
        label: CHECK_JOIN_LABEL.to_string(),
        data: CHECK_JOIN.to_string(),
    }]);

    CommandResult {
        response: format_join_prompt(channels),
        buttons,
    }
}
