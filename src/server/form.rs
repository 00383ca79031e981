//! Entry form parsing and validation

use serde::Deserialize;

use crate::content::validate_title;
use crate::templates::FieldErrors;
use crate::WikiError;

const REQUIRED: &str = "This field is required.";

/// Fields posted by the create and edit forms
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl EntryForm {
    /// Check both fields, returning a message per invalid field
    pub fn validate(&self) -> FieldErrors {
        let title = if self.title.trim().is_empty() {
            Some(REQUIRED.to_string())
        } else {
            match validate_title(&self.title) {
                Ok(_) => None,
                Err(WikiError::InvalidTitle { reason, .. }) => Some(capitalize(reason) + "."),
                Err(e) => Some(e.to_string()),
            }
        };

        let content = if self.content.trim().is_empty() {
            Some(REQUIRED.to_string())
        } else {
            None
        };

        FieldErrors { title, content }
    }

    /// Submitted title, trimmed
    pub fn title(&self) -> &str {
        self.title.trim()
    }

    /// Submitted markdown, trimmed and with browser line endings normalized
    pub fn body(&self) -> String {
        self.content.trim().replace("\r\n", "\n")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, content: &str) -> EntryForm {
        EntryForm {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let f = form(" Python ", "  Snakes.\r\nMore.  ");
        assert!(f.validate().is_empty());
        assert_eq!(f.title(), "Python");
        assert_eq!(f.body(), "Snakes.\nMore.");
    }

    #[test]
    fn test_required_fields() {
        let errors = form("  ", "\n").validate();
        assert_eq!(errors.title.as_deref(), Some(REQUIRED));
        assert_eq!(errors.content.as_deref(), Some(REQUIRED));
    }

    #[test]
    fn test_bad_title() {
        let errors = form("a/b", "body").validate();
        assert_eq!(
            errors.title.as_deref(),
            Some("Title must not contain path separators.")
        );
        assert!(errors.content.is_none());
    }
}
