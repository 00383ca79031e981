//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that must be escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Characters that must be escaped inside a query value
const QUERY: &AsciiSet = &SEGMENT.add(b'&').add(b'+').add(b'=');

/// Percent-encode a title so it can be used as one path segment
pub fn encode_segment(title: &str) -> String {
    utf8_percent_encode(title, SEGMENT).to_string()
}

/// URL of an entry page
///
/// # Examples
/// ```ignore
/// entry_url("Python 3") // -> "/wiki/Python%203"
/// ```
pub fn entry_url(title: &str) -> String {
    format!("/wiki/{}", encode_segment(title))
}

/// URL of the edit form for an entry
pub fn edit_url(title: &str) -> String {
    format!("/edit/{}", encode_segment(title))
}

/// URL of the create form, pre-filled with a title
pub fn new_url(title: &str) -> String {
    format!("/new?title={}", utf8_percent_encode(title, QUERY))
}

/// URL of the search results for a query
pub fn search_url(query: &str) -> String {
    format!("/search?q={}", utf8_percent_encode(query, QUERY))
}
