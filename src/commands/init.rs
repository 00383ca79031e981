//! Initialize a new wiki directory

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::WikiConfig;
use crate::content::EntryStore;

const DEFAULT_CONFIG: &str = r#"# Encyclopedia configuration

# Site
title: Encyclopedia

# Directory
entries_dir: entries
static_dir: static

# Server
server:
  ip: localhost
  port: 8000

# Code blocks
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false
"#;

/// Entries written by `init`, as (title, markdown)
const SAMPLE_ENTRIES: &[(&str, &str)] = &[
    (
        "CSS",
        "# CSS\n\nCSS is a language that can be used to add style to an [HTML](/wiki/HTML) page.\n",
    ),
    (
        "Git",
        "# Git\n\nGit is a version control tool that can be used to keep track of versions of a software project.\n\n## GitHub\n\nGitHub is an online service for hosting git repositories.\n",
    ),
    (
        "HTML",
        "# HTML\n\nHTML is a markup language that can be used to define the structure of a web page. HTML elements include\n\n* headings\n* paragraphs\n* lists\n* links\n* and more!\n\nThe most recent major version of HTML is HTML5.\n",
    ),
    (
        "Markdown",
        "# Markdown\n\nMarkdown is a lightweight markup language that converts plain text into HTML.\n\n* `**bold**` gives **bold**\n* `[link](/wiki/HTML)` gives [a link](/wiki/HTML)\n* Fenced code blocks are highlighted:\n\n```python\nprint(\"hello, world\")\n```\n",
    ),
    (
        "Python",
        "# Python\n\nPython is a programming language that can be used both for writing **command-line scripts** or building **web applications**.\n",
    ),
];

/// Initialize a wiki in the given directory. Existing files are kept.
pub fn init_wiki(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
    }

    let config = WikiConfig::load(&config_path)?;
    let store = EntryStore::new(target_dir.join(&config.entries_dir));
    fs::create_dir_all(store.dir())?;

    for (title, content) in SAMPLE_ENTRIES {
        if store.exists(title) {
            continue;
        }
        store.save_entry(title, content)?;
        tracing::debug!("Created sample entry {:?}", title);
    }

    Ok(())
}
