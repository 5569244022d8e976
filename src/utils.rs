//! Utility functions for reply styling and logging.

use std::{
    fs::File,
    io::{self, Write},
};

/// Small caps glyphs, indexed by `letter - 'a'`.
const SMALL_CAPS: [char; 26] = [
    'ᴀ', 'ʙ', 'ᴄ', 'ᴅ', 'ᴇ', 'ꜰ', 'ɢ', 'ʜ', 'ɪ', 'ᴊ', 'ᴋ', 'ʟ', 'ᴍ', 'ɴ', 'ᴏ', 'ᴘ', 'ǫ', 'ʀ', 'ꜱ', 'ᴛ',
    'ᴜ', 'ᴠ', 'ᴡ', 'x', 'ʏ', 'ᴢ',
];

/// Replaces every ASCII letter, upper or lower case, with its small caps glyph.
///
/// Digits, punctuation, whitespace and emoji are kept as is.
///
/// # Examples
///
/// ```
/// # use emotebot::utils::fancy_text;
/// assert_eq!(fancy_text("Team 42!"), "ᴛᴇᴀᴍ 42!");
/// ```
pub fn fancy_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'a'..='z' => SMALL_CAPS[(c as u8 - b'a') as usize],
            'A'..='Z' => SMALL_CAPS[(c as u8 - b'A') as usize],
            _ => c,
        })
        .collect()
}

/// Characters with a meaning in Telegram legacy Markdown.
const MARKDOWN_SPECIALS: [char; 4] = ['_', '*', '`', '['];

/// Prefixes every legacy Markdown special character with a backslash.
///
/// Only valid outside of an entity.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIALS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Applies [`fancy_text`] and wraps the result in Markdown bold.
///
/// Legacy Markdown has no escaping inside an entity, so each special
/// character closes the bold run and is written escaped between two runs.
///
/// # Examples
///
/// ```
/// # use emotebot::utils::format_text;
/// assert_eq!(format_text("a_b"), "*ᴀ*\\_*ʙ*");
/// ```
pub fn format_text(text: &str) -> String {
    let styled = fancy_text(text);
    let mut formatted = String::with_capacity(styled.len() + 2);
    let mut run = String::new();

    for c in styled.chars() {
        if MARKDOWN_SPECIALS.contains(&c) {
            push_bold(&mut formatted, &run);
            run.clear();
            formatted.push('\\');
            formatted.push(c);
        } else {
            run.push(c);
        }
    }
    push_bold(&mut formatted, &run);

    formatted
}

/// Appends `run` in bold, nothing when it is empty.
fn push_bold(formatted: &mut String, run: &str) {
    if !run.is_empty() {
        formatted.push('*');
        formatted.push_str(run);
        formatted.push('*');
    }
}

/// Log target writing every record to stderr and to a file.
///
/// Used as an `env_logger` pipe target when a log file is requested.
pub struct LogTee {
    file: File,
}

impl LogTee {
    /// Opens `path` in append mode, creating it if needed.
    pub fn open(path: &str) -> io::Result<Self> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(LogTee { file })
    }
}

impl Write for LogTee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}
