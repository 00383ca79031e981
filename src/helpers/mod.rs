//! Helper functions shared by the templates and the HTTP handlers

pub mod html;
pub mod url;

pub use html::html_escape;
pub use url::{edit_url, encode_segment, entry_url, new_url, search_url};
