//! Print an entry rendered as HTML

use anyhow::Result;

use crate::content::MarkdownRenderer;
use crate::Wiki;

/// Render an entry's markdown to HTML
pub fn render_entry(wiki: &Wiki, title: &str) -> Result<String> {
    let entry = wiki.entry(title)?;
    let renderer = MarkdownRenderer::from_config(&wiki.config.highlight);
    Ok(renderer.render(&entry.content))
}

/// Run the show command
pub fn run(wiki: &Wiki, title: &str) -> Result<()> {
    print!("{}", render_entry(wiki, title)?);
    Ok(())
}
