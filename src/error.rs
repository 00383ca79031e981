//! Error types for wiki operations

use thiserror::Error;

/// Errors raised by the entry store and the wiki operations built on it
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Page already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid title {title:?}: {reason}")]
    InvalidTitle { title: String, reason: &'static str },

    #[error("There are no entries yet")]
    NoEntries,

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WikiError>;
