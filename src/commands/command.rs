//! Command parsing and validation.
//!
//! This module converts Telegram message text into structured [`Command`]
//! enums. All argument validation happens here, before any network call.

use log::debug;

use crate::{
    commands::markdown_response::{
        format_invalid_emote_id, format_invalid_emote_usage, format_invalid_group_usage,
        format_invalid_lag_usage, format_invalid_team_code, format_invalid_uid,
        format_invalid_uid_count,
    },
    ffapi::GroupSize,
};

/// Maximum number of UIDs of the emote command.
pub const MAX_EMOTE_UIDS: usize = 4;

/// Number of digits of a team code.
const TEAM_CODE_LENGTH: usize = 7;

/// Represents a parsed bot command.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Command {
    /// `/start`: welcome message
    Start,
    /// `/help`: same as start
    Help,
    /// `/emote <team_code> <uid>... <emote_id>`
    Emote {
        team_code: String,
        uids: Vec<String>,
        emote_id: u64,
    },
    /// `/5g <uid>` and `/6g <uid>`
    Group { size: GroupSize, uid: String },
    /// `/lag <team_code>`
    Lag { team_code: String },
}

/// Errors that can occur during command parsing.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParsingError {
    /// The message does not start with `/`
    NotACommand,
    /// The command is not handled by the bot
    Unknown,
    /// Less than 3 arguments for `/emote`
    InvalidEmoteUsage,
    /// The team code is not 7 digits
    InvalidTeamCode,
    /// The emote id is not a number
    InvalidEmoteId,
    /// No UID or more than 4 UIDs for `/emote`
    InvalidUidCount,
    /// Not exactly one argument for `/5g` or `/6g`
    InvalidGroupUsage(GroupSize),
    /// The UID is not a number
    InvalidUid,
    /// Not exactly one argument for `/lag`
    InvalidLagUsage,
}

impl Command {
    /// Parses a message string into a Command.
    ///
    /// The command name may carry the bot username (`/lag@emote_bot`), which is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CommandParsingError::NotACommand`] and [`CommandParsingError::Unknown`]
    /// for messages the bot does not answer, and one of the other variants when
    /// the arguments of a known command are invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// # use emotebot::commands::command::Command;
    /// let command = Command::parse("/lag 7488876").unwrap();
    /// assert_eq!(command, Command::Lag { team_code: "7488876".to_string() });
    /// ```
    pub fn parse(body: &str) -> Result<Self, CommandParsingError> {
        let mut tokens = body.split_whitespace();

        let name = tokens
            .next()
            .and_then(|head| head.strip_prefix('/'))
            .ok_or(CommandParsingError::NotACommand)?;
        let name = match name.split_once('@') {
            Some((name, _bot_username)) => name,
            None => name,
        };
        let arguments: Vec<&str> = tokens.collect();

        debug!("parsing command {} with arguments {:?}", name, arguments);

        match name {
            "start" => Ok(Command::Start),
            "help" => Ok(Command::Help),
            "emote" => Self::parse_emote(&arguments),
            "5g" => Self::parse_group(GroupSize::Five, &arguments),
            "6g" => Self::parse_group(GroupSize::Six, &arguments),
            "lag" => Self::parse_lag(&arguments),
            _ => Err(CommandParsingError::Unknown),
        }
    }

    /// First argument is the team code, last is the emote id, UIDs are in between.
    fn parse_emote(arguments: &[&str]) -> Result<Self, CommandParsingError> {
        if arguments.len() < 3 {
            return Err(CommandParsingError::InvalidEmoteUsage);
        }

        let team_code = arguments[0];
        let emote_id = arguments[arguments.len() - 1];
        let uids = &arguments[1..arguments.len() - 1];

        if !is_team_code(team_code) {
            return Err(CommandParsingError::InvalidTeamCode);
        }

        let emote_id = match is_numeric(emote_id) {
            true => emote_id
                .parse::<u64>()
                .map_err(|_| CommandParsingError::InvalidEmoteId)?,
            false => return Err(CommandParsingError::InvalidEmoteId),
        };

        if uids.is_empty() || uids.len() > MAX_EMOTE_UIDS {
            return Err(CommandParsingError::InvalidUidCount);
        }

        Ok(Command::Emote {
            team_code: team_code.to_string(),
            uids: uids.iter().map(|uid| uid.to_string()).collect(),
            emote_id,
        })
    }

    fn parse_group(size: GroupSize, arguments: &[&str]) -> Result<Self, CommandParsingError> {
        let [uid] = arguments else {
            return Err(CommandParsingError::InvalidGroupUsage(size));
        };

        if !is_numeric(uid) {
            return Err(CommandParsingError::InvalidUid);
        }

        Ok(Command::Group {
            size,
            uid: uid.to_string(),
        })
    }

    fn parse_lag(arguments: &[&str]) -> Result<Self, CommandParsingError> {
        let [team_code] = arguments else {
            return Err(CommandParsingError::InvalidLagUsage);
        };

        if !is_team_code(team_code) {
            return Err(CommandParsingError::InvalidTeamCode);
        }

        Ok(Command::Lag {
            team_code: team_code.to_string(),
        })
    }
}

/// One or more ASCII digits.
fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly 7 ASCII digits.
fn is_team_code(value: &str) -> bool {
    value.len() == TEAM_CODE_LENGTH && is_numeric(value)
}

/// Formats a command error into a user-friendly message.
///
/// Returns `None` for messages the bot stays silent on
/// ([`CommandParsingError::NotACommand`] and [`CommandParsingError::Unknown`]).
pub fn format_command_error(error: CommandParsingError) -> Option<String> {
    match error {
        CommandParsingError::NotACommand | CommandParsingError::Unknown => None,
        CommandParsingError::InvalidEmoteUsage => Some(format_invalid_emote_usage()),
        CommandParsingError::InvalidTeamCode => Some(format_invalid_team_code()),
        CommandParsingError::InvalidEmoteId => Some(format_invalid_emote_id()),
        CommandParsingError::InvalidUidCount => Some(format_invalid_uid_count()),
        CommandParsingError::InvalidGroupUsage(size) => Some(format_invalid_group_usage(size)),
        CommandParsingError::InvalidUid => Some(format_invalid_uid()),
        CommandParsingError::InvalidLagUsage => Some(format_invalid_lag_usage()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fancy_text;

    #[test]
    fn test_parse_start_and_help() {
        assert_eq!(Command::parse("/start"), Ok(Command::Start));
        assert_eq!(Command::parse("/help extra words"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_emote_single_uid() {
        let result = Command::parse("/emote 7488876 1299021866 909000075");
        assert_eq!(
            result,
            Ok(Command::Emote {
                team_code: "7488876".to_string(),
                uids: vec!["1299021866".to_string()],
                emote_id: 909000075,
            })
        );
    }

    #[test]
    fn test_parse_emote_four_uids() {
        let result = Command::parse("/emote 7488876 1 2 3 4 909000075");
        assert!(matches!(
            result,
            Ok(Command::Emote { uids, .. }) if uids == vec!["1", "2", "3", "4"]
        ));
    }

    #[test]
    fn test_parse_emote_too_many_uids() {
        let result = Command::parse("/emote 7488876 1 2 3 4 5 909000075");
        assert_eq!(result, Err(CommandParsingError::InvalidUidCount));
    }

    #[test]
    fn test_parse_emote_missing_arguments() {
        assert_eq!(
            Command::parse("/emote 7488876 909000075"),
            Err(CommandParsingError::InvalidEmoteUsage)
        );
        assert_eq!(
            Command::parse("/emote"),
            Err(CommandParsingError::InvalidEmoteUsage)
        );
    }

    #[test]
    fn test_parse_emote_six_digit_team_code() {
        let result = Command::parse("/emote 748887 1299021866 909000075");
        assert_eq!(result, Err(CommandParsingError::InvalidTeamCode));
    }

    #[test]
    fn test_parse_emote_invalid_emote_id() {
        assert_eq!(
            Command::parse("/emote 7488876 1299021866 abc"),
            Err(CommandParsingError::InvalidEmoteId)
        );
        // Too large for an id
        assert_eq!(
            Command::parse("/emote 7488876 1299021866 99999999999999999999999"),
            Err(CommandParsingError::InvalidEmoteId)
        );
    }

    #[test]
    fn test_parse_emote_team_code_checked_before_emote_id() {
        let result = Command::parse("/emote 12 1299021866 abc");
        assert_eq!(result, Err(CommandParsingError::InvalidTeamCode));
    }

    #[test]
    fn test_parse_group_commands() {
        assert_eq!(
            Command::parse("/5g 1299021866"),
            Ok(Command::Group {
                size: GroupSize::Five,
                uid: "1299021866".to_string()
            })
        );
        assert_eq!(
            Command::parse("/6g 1299021866"),
            Ok(Command::Group {
                size: GroupSize::Six,
                uid: "1299021866".to_string()
            })
        );
    }

    #[test]
    fn test_parse_group_non_numeric_uid() {
        assert_eq!(Command::parse("/5g abc"), Err(CommandParsingError::InvalidUid));
    }

    #[test]
    fn test_parse_group_wrong_argument_count() {
        assert_eq!(
            Command::parse("/6g"),
            Err(CommandParsingError::InvalidGroupUsage(GroupSize::Six))
        );
        assert_eq!(
            Command::parse("/5g 1 2"),
            Err(CommandParsingError::InvalidGroupUsage(GroupSize::Five))
        );
    }

    #[test]
    fn test_parse_lag() {
        assert_eq!(
            Command::parse("/lag 1234567"),
            Ok(Command::Lag {
                team_code: "1234567".to_string()
            })
        );
        assert_eq!(
            Command::parse("/lag 12345678"),
            Err(CommandParsingError::InvalidTeamCode)
        );
        assert_eq!(Command::parse("/lag"), Err(CommandParsingError::InvalidLagUsage));
    }

    #[test]
    fn test_parse_command_with_bot_username() {
        assert_eq!(
            Command::parse("/lag@emote_bot 1234567"),
            Ok(Command::Lag {
                team_code: "1234567".to_string()
            })
        );
    }

    #[test]
    fn test_parse_not_a_command() {
        assert_eq!(
            Command::parse("hello there"),
            Err(CommandParsingError::NotACommand)
        );
        assert_eq!(Command::parse(""), Err(CommandParsingError::NotACommand));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(Command::parse("/dance"), Err(CommandParsingError::Unknown));
    }

    #[test]
    fn test_is_numeric_rejects_non_ascii_digits() {
        assert!(is_numeric("0123"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("١٢٣"));
        assert!(!is_numeric("12a"));
    }

    #[test]
    fn test_format_command_error_silent() {
        assert!(format_command_error(CommandParsingError::NotACommand).is_none());
        assert!(format_command_error(CommandParsingError::Unknown).is_none());
    }

    #[test]
    fn test_format_command_error_messages() {
        let message = format_command_error(CommandParsingError::InvalidTeamCode).unwrap();
        assert!(message.contains(&fancy_text("TEAM CODE")));

        let message =
            format_command_error(CommandParsingError::InvalidGroupUsage(GroupSize::Six)).unwrap();
        assert!(message.contains("/6ɢ"));
    }
}
