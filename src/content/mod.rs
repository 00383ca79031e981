//! Content module - wiki entries, their storage, and markdown rendering

mod entry;
mod markdown;
mod store;

pub use entry::{
    strip_title_heading, validate_title, with_title_heading, Entry, MAX_TITLE_LEN,
};
pub use markdown::MarkdownRenderer;
pub use store::EntryStore;
