//! Create a new entry from the command line

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::{Wiki, WikiError};

/// Create an entry, reading the body from `content` or from a file
pub fn create_entry(
    wiki: &Wiki,
    title: &str,
    content: Option<&str>,
    file: Option<&Path>,
) -> Result<String> {
    let body = match (content, file) {
        (Some(text), None) => text.to_string(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => bail!("Provide the entry body with --content or --file"),
        (Some(_), Some(_)) => bail!("Use either --content or --file, not both"),
    };

    if body.trim().is_empty() {
        bail!("Entry content must not be empty");
    }

    match wiki.create_entry(title, body.trim()) {
        Ok(title) => {
            println!("Created: {}", title);
            Ok(title)
        }
        Err(WikiError::AlreadyExists(title)) => bail!("Page already exists: {}", title),
        Err(e) => Err(e.into()),
    }
}
