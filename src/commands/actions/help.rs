//! Welcome command handler.
//!
//! Answers `/start` and `/help` with the command list, examples and the
//! configured link buttons.
//!
//! This is a stateless command that always returns the same message.

use log::debug;

use crate::{
    commands::{Button, CommandResult, markdown_response::format_welcome},
    config::Link,
};

/// Link buttons per keyboard row.
const LINKS_PER_ROW: usize = 2;

/// Returns the welcome message with the link buttons, two per row.
pub fn handle_help(links: &[Link]) -> CommandResult {
    debug!("handling help command");

    let buttons = links
        .chunks(LINKS_PER_ROW)
        .map(|row| {
            row.iter()
                .map(|link| Button::Url {
                    label: link.title.clone(),
                    url: link.url.clone(),
                })
                .collect()
        })
        .collect();

    CommandResult {
        response: format_welcome(),
        buttons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_link(title: &str) -> Link {
        Link {
            title: title.to_string(),
            url: format!("https://t.me/{}", title),
        }
    }

    #[test]
    fn test_handle_help_rows_of_two() {
        let links = vec![
            create_link("browse"),
            create_link("support"),
            create_link("developer"),
        ];

        let result = handle_help(&links);

        assert_eq!(result.response, format_welcome());
        assert_eq!(result.buttons.len(), 2);
        assert_eq!(result.buttons[0].len(), 2);
        assert_eq!(
            result.buttons[1],
            vec![Button::Url {
                label: "developer".to_string(),
                url: "https://t.me/developer".to_string(),
            }]
        );
    }

    #[test]
    fn test_handle_help_without_links() {
        let result = handle_help(&[]);
        assert!(result.buttons.is_empty());
        assert!(!result.response.is_empty());
    }
}
