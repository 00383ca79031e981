//! Flat-file entry store - one markdown file per entry

use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::entry::validate_title;
use crate::error::{Result, WikiError};

/// Stores entries as `<title>.md` files in a single directory
#[derive(Debug, Clone)]
pub struct EntryStore {
    dir: PathBuf,
}

impl EntryStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Entries directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List the titles of all entries, sorted
    pub fn list_entries(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut titles = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // Only list files a lookup by title can reach again
            if self.entry_path(stem).is_some() {
                titles.push(stem.to_string());
            } else {
                tracing::debug!("Skipping {:?}, not a valid entry title", path);
            }
        }

        titles.sort();
        Ok(titles)
    }

    /// Read an entry's markdown, `None` if there is no such entry
    pub fn get_entry(&self, title: &str) -> Result<Option<String>> {
        let Some(path) = self.entry_path(title) else {
            return Ok(None);
        };

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether an entry with exactly this title exists
    pub fn exists(&self, title: &str) -> bool {
        self.entry_path(title).is_some_and(|p| p.is_file())
    }

    /// Write an entry, replacing any previous content under the same title
    pub fn save_entry(&self, title: &str, content: &str) -> Result<()> {
        let title = validate_title(title)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{}.md", title));
        fs::write(&path, content)?;
        tracing::debug!("Saved entry {:?} to {:?}", title, path);

        Ok(())
    }

    /// Move an entry to a new title, keeping its content
    pub fn rename_entry(&self, from: &str, to: &str) -> Result<()> {
        let from_path = self
            .entry_path(from)
            .filter(|p| p.is_file())
            .ok_or_else(|| WikiError::NotFound(from.to_string()))?;
        let to = validate_title(to)?;

        let to_path = self.dir.join(format!("{}.md", to));
        fs::rename(&from_path, &to_path)?;
        tracing::debug!("Renamed entry {:?} to {:?}", from, to);

        Ok(())
    }

    /// Last modification time of an entry's file
    pub fn modified(&self, title: &str) -> Option<DateTime<Local>> {
        let path = self.entry_path(title)?;
        fs::metadata(path)
            .ok()?
            .modified()
            .ok()
            .map(DateTime::<Local>::from)
    }

    /// Path of the file backing `title`, `None` for titles that cannot name
    /// an entry
    fn entry_path(&self, title: &str) -> Option<PathBuf> {
        // Lookups use the exact title, a padded title is a different entry
        match validate_title(title) {
            Ok(valid) if valid == title => Some(self.dir.join(format!("{}.md", title))),
            _ => None,
        }
    }
}

/// Check if a file is a markdown entry
fn is_markdown_file(path: &Path) -> bool {
    path.extension().map(|ext| ext == "md").unwrap_or(false)
}
