//! Wiki entry model and title rules

use crate::error::{Result, WikiError};

/// Longest title accepted, in bytes. Keeps `<title>.md` under common
/// filesystem name limits.
pub const MAX_TITLE_LEN: usize = 200;

/// Characters some filesystems refuse in file names
const RESERVED_CHARS: [char; 7] = [':', '*', '?', '"', '<', '>', '|'];

/// A wiki entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display name, also the file stem in the entries directory
    pub title: String,

    /// Raw markdown content
    pub content: String,
}

impl Entry {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Build an entry from a title and body, prefixing the body with the
    /// title as a level one heading
    pub fn with_heading(title: &str, body: &str) -> Self {
        Self::new(title, with_title_heading(title, body))
    }
}

/// Prefix `body` with `# {title}` and a blank line
pub fn with_title_heading(title: &str, body: &str) -> String {
    format!("# {}\n\n{}", title, body)
}

/// Remove a leading `# {title}` heading, as written by [`with_title_heading`]
///
/// Content that does not start with exactly that heading is returned as-is.
pub fn strip_title_heading<'a>(title: &str, content: &'a str) -> &'a str {
    let heading = format!("# {}", title);
    let Some(rest) = content.strip_prefix(heading.as_str()) else {
        return content;
    };

    // Only a whole heading line counts, "# Python" must not eat "# Python 3"
    let rest = if let Some(r) = rest.strip_prefix("\r\n") {
        r
    } else if let Some(r) = rest.strip_prefix('\n') {
        r
    } else if rest.is_empty() {
        rest
    } else {
        return content;
    };

    rest.trim_start_matches(['\r', '\n'])
}

/// Trim a title and check it can safely name a file
pub fn validate_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();

    let reason = if trimmed.is_empty() {
        Some("title is empty")
    } else if trimmed.len() > MAX_TITLE_LEN {
        Some("title is too long")
    } else if trimmed.starts_with('.') {
        Some("title must not start with '.'")
    } else if trimmed.contains(['/', '\\']) {
        Some("title must not contain path separators")
    } else if trimmed.contains(RESERVED_CHARS) {
        Some("title must not contain any of : * ? \" < > |")
    } else if trimmed.chars().any(char::is_control) {
        Some("title must not contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(WikiError::InvalidTitle {
            title: title.to_string(),
            reason,
        }),
        None => Ok(trimmed),
    }
}
