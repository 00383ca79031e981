//! encyclopedia: a small flat-file markdown wiki
//!
//! Entries live as `<title>.md` files in one directory. The [`Wiki`] type
//! loads the configuration and exposes the entry operations used by both
//! the command line and the HTTP server.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;
pub mod templates;

use rand::seq::IndexedRandom;
use rand::Rng;
use std::path::{Path, PathBuf};

use content::{validate_title, with_title_heading, Entry, EntryStore};
pub use error::{Result, WikiError};

/// Result of a title search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// An entry is titled exactly like the query
    Exact(String),
    /// Titles containing the query, ignoring case
    Matches(Vec<String>),
}

/// The main wiki application
#[derive(Debug, Clone)]
pub struct Wiki {
    /// Wiki configuration
    pub config: config::WikiConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Static assets directory
    pub static_dir: PathBuf,
    store: EntryStore,
}

impl Wiki {
    /// Open the wiki in a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::WikiConfig::load(&config_path)?
        } else {
            config::WikiConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a wiki from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::WikiConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let store = EntryStore::new(base_dir.join(&config.entries_dir));
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            static_dir,
            store,
        }
    }

    /// Entry storage
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// All entry titles, sorted
    pub fn list_entries(&self) -> Result<Vec<String>> {
        self.store.list_entries()
    }

    /// Markdown of an entry, `None` if it does not exist
    pub fn get_entry(&self, title: &str) -> Result<Option<String>> {
        self.store.get_entry(title)
    }

    /// Load an entry, failing with [`WikiError::NotFound`] if it is missing
    pub fn entry(&self, title: &str) -> Result<Entry> {
        self.store
            .get_entry(title)?
            .map(|content| Entry::new(title, content))
            .ok_or_else(|| WikiError::NotFound(title.to_string()))
    }

    /// Find an entry by exact title, falling back to a case-insensitive
    /// substring match over all titles
    pub fn search(&self, term: &str) -> Result<SearchOutcome> {
        if term.trim().is_empty() {
            return Ok(SearchOutcome::Matches(Vec::new()));
        }

        if self.store.exists(term) {
            return Ok(SearchOutcome::Exact(term.to_string()));
        }

        let needle = term.to_lowercase();
        let matches = self
            .store
            .list_entries()?
            .into_iter()
            .filter(|title| title.to_lowercase().contains(&needle))
            .collect();

        Ok(SearchOutcome::Matches(matches))
    }

    /// Create a new entry. Fails if the title is taken.
    ///
    /// The stored markdown starts with the title as a heading. Returns the
    /// title the entry was stored under.
    pub fn create_entry(&self, title: &str, body: &str) -> Result<String> {
        let title = validate_title(title)?;

        if self.store.exists(title) {
            return Err(WikiError::AlreadyExists(title.to_string()));
        }

        self.store.save_entry(title, &with_title_heading(title, body))?;
        tracing::info!("Created entry {:?}", title);

        Ok(title.to_string())
    }

    /// Replace an entry's content, renaming it when `title` differs from
    /// `original`. Returns the title the entry is now stored under.
    pub fn update_entry(&self, original: &str, title: &str, body: &str) -> Result<String> {
        if !self.store.exists(original) {
            return Err(WikiError::NotFound(original.to_string()));
        }

        let title = validate_title(title)?;

        if title != original {
            // Match listed titles, `exists` also finds `original` itself when
            // only the case changes on a case-insensitive filesystem
            if self.store.list_entries()?.iter().any(|t| t == title) {
                return Err(WikiError::AlreadyExists(title.to_string()));
            }
            self.store.rename_entry(original, title)?;
            tracing::info!("Renamed entry {:?} to {:?}", original, title);
        }

        self.store.save_entry(title, &with_title_heading(title, body))?;
        tracing::info!("Updated entry {:?}", title);

        Ok(title.to_string())
    }

    /// Pick an entry title uniformly at random
    pub fn random_title<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let titles = self.store.list_entries()?;
        titles.choose(rng).cloned().ok_or(WikiError::NoEntries)
    }
}
