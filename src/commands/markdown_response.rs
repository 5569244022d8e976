//! Markdown response formatters for bot commands.
//!
//! This module provides functions to format bot responses in Telegram legacy
//! Markdown. Text is stylized with small caps and wrapped in bold by
//! [`format_text`], remote messages and emote names included.

use crate::{
    config::Channel,
    ffapi::{ActionResponse, GroupSize},
    utils::{escape_markdown, format_text},
};

/// Label of the button re-running the membership check.
pub const CHECK_JOIN_LABEL: &str = "✅ Join Kar Liya, Check Karo";

/// Formats the welcome message listing the commands and examples.
///
/// # Examples
///
/// ```
/// # use emotebot::commands::markdown_response::format_welcome;
/// let welcome = format_welcome();
/// assert!(welcome.starts_with('*'));
/// ```
pub fn format_welcome() -> String {
    let body = "🔥 WELCOME TO THE EMOTE BOT 🔥\n\n\
        COMMANDS:\n\
        /emote <TEAMCODE> <UIDS> <EMOTEID>\n\
        /5g <UID>\n\
        /6g <UID>\n\
        /lag <TEAMCODE>\n\n\
        EXAMPLES:\n\
        /emote 7488876 1299021866 909000075\n\
        /5g 1299021866\n\
        /6g 1299021866\n\
        /lag 7488876\n\n\
        👉 Bot join karega, emote/lag/group karega, auto-leave karega.";

    format_text(body)
}

/// Formats the prompt asking the user to join the required channels.
///
/// Channels are listed in configuration order with keycap numbers, usernames
/// escaped. The prompt is not stylized.
pub fn format_join_prompt(channels: &[Channel]) -> String {
    let list: Vec<String> = channels
        .iter()
        .enumerate()
        .map(|(index, channel)| {
            format!("{} {}", keycap(index + 1), escape_markdown(&channel.username))
        })
        .collect();

    format!(
        "⚠️ *Bot use karne ke liye pehle ye channels join karo:*\n\n{}\n\nJoin karne ke baad niche *✅ button* dabao.",
        list.join("\n")
    )
}

/// Keycap emoji for 1 to 9, plain `n.` above.
fn keycap(position: usize) -> String {
    match position {
        1..=9 => format!("{}\u{fe0f}\u{20e3}", position),
        _ => format!("{}.", position),
    }
}

/// Alert shown when the check button is pressed with a channel still missing.
pub fn format_still_not_joined() -> String {
    "❌ Pehle channels join karo!".to_owned()
}

/// Alert shown when the check button is pressed and every channel is joined.
pub fn format_verified() -> String {
    "✅ Verified!".to_owned()
}

pub fn format_invalid_emote_usage() -> String {
    format_text("❌ USAGE: /emote TEAMCODE UID EMOTEID")
}

pub fn format_invalid_team_code() -> String {
    format_text("❌ TEAM CODE 7 DIGIT KA HONA CHAHIYE")
}

pub fn format_invalid_emote_id() -> String {
    format_text("❌ EMOTE ID NUMBER HONA CHAHIYE")
}

pub fn format_invalid_uid_count() -> String {
    format_text("❌ UIDs 1–4 ENTER KARO")
}

/// Formats the usage of `/5g` or `/6g`.
pub fn format_invalid_group_usage(size: GroupSize) -> String {
    format_text(&format!("❌ USE: /{}g UID", size.players()))
}

pub fn format_invalid_uid() -> String {
    format_text("❌ UID NUMBER HONA CHAHIYE")
}

pub fn format_invalid_lag_usage() -> String {
    format_text("❌ USE: /lag TEAMCODE")
}

/// Formats a request the remote service refused, with its message.
///
/// # Examples
///
/// ```
/// # use emotebot::commands::markdown_response::format_action_failed;
/// let msg = format_action_failed("bot busy");
/// assert!(msg.contains("ʙᴏᴛ ʙᴜꜱʏ"));
/// ```
pub fn format_action_failed(message: &str) -> String {
    format_text(&format!("❌ FAILED: {}", message))
}

/// Generic reply when the remote service could not be reached or answered garbage.
pub fn format_action_error() -> String {
    format_text("❌ ERROR - Try again")
}

/// Formats a successful emote request.
///
/// # Arguments
///
/// * `team_code` - Team the emote was played in
/// * `uids` - Players performing the emote
/// * `emote_name` - Resolved name, or the `Emote <id>` fallback
/// * `emote_id` - Requested emote id
pub fn format_emote_success(
    team_code: &str,
    uids: &[String],
    emote_name: &str,
    emote_id: u64,
) -> String {
    format_text(&format!(
        "✅ EMOTE EXECUTED\n\nTEAM: {}\nUIDS: {}\nEMOTE: {}\nID: {}",
        team_code,
        uids.join(", "),
        emote_name,
        emote_id
    ))
}

/// Formats a successful group invite.
pub fn format_group_success(size: GroupSize, uid: &str, response: &ActionResponse) -> String {
    format_text(&format!(
        "✅ {}-PLAYER GROUP SENT\n\nUID: {}\nMESSAGE: {}",
        size.players(),
        uid,
        response.message
    ))
}

/// Formats a successful lag request with the wait announced by the service.
pub fn format_lag_success(team_code: &str, response: &ActionResponse) -> String {
    format_text(&format!(
        "✅ LAG REQUEST SENT\n\nTEAM CODE: {}\nMESSAGE: {}\nWAIT: {}",
        team_code,
        response.message,
        response.wait_seconds_label()
    ))
}
