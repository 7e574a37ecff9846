//! Favorites store
//!
//! A durable, ordered set of city names kept in a single JSON record:
//! `{"favorites": ["Paris", "Lyon"]}`.
//!
//! Nothing is cached: every call re-reads the record, so the file is always
//! the source of truth. Failures never reach the caller; `load` degrades to an
//! empty list and `save` to `false`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::{debug, info, warn};

use crate::Config;

#[derive(Debug, Default, Serialize, Deserialize)]
struct FavoritesFile {
    #[serde(default)]
    favorites: Vec<String>,
}

#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    /// Serializes load-check-append-persist across callers sharing this store.
    write_lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.favorites_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved cities in insertion order.
    ///
    /// A missing, unreadable or malformed record reads as empty.
    pub fn load(&self) -> Vec<String> {
        let content = match self.read_raw() {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %format!("{err:#}"), "Ignoring unreadable favorites file");
                return Vec::new();
            }
        };

        self.parse_or_empty(&content)
    }

    pub fn contains(&self, city: &str) -> bool {
        let city = city.trim();
        self.load().iter().any(|c| c == city)
    }

    /// Append `city` if it is not already saved.
    ///
    /// Returns `true` only when the city was appended and written. Blank
    /// names, duplicates (exact, case-sensitive match after trimming), an
    /// existing record that cannot be read, and write failures all return
    /// `false` and leave the record as it was. A malformed record is
    /// replaced by a fresh list.
    pub fn save(&self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() {
            return false;
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut favorites = match self.read_raw() {
            Ok(Some(content)) => self.parse_or_empty(&content),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(city, error = %format!("{err:#}"), "Favorites file unreadable, not saving");
                return false;
            }
        };

        if favorites.iter().any(|c| c == city) {
            debug!(city, "Already a favorite");
            return false;
        }

        favorites.push(city.to_string());

        match self.persist(&favorites) {
            Ok(()) => {
                info!(city, path = %self.path.display(), "Saved favorite");
                true
            }
            Err(err) => {
                warn!(city, error = %format!("{err:#}"), "Failed to save favorite");
                false
            }
        }
    }

    /// Save the shell's current city, if there is one.
    pub fn save_current(&self, city: Option<&str>) -> bool {
        city.is_some_and(|c| self.save(c))
    }

    /// Raw record bytes; `None` when the record does not exist yet.
    fn read_raw(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    fn parse_or_empty(&self, content: &[u8]) -> Vec<String> {
        match serde_json::from_slice::<FavoritesFile>(content) {
            Ok(file) => file.favorites,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Ignoring malformed favorites file");
                Vec::new()
            }
        }
    }

    /// Write the full record via a sibling temp file so a failed write
    /// leaves the previous record intact.
    fn persist(&self, favorites: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let file = FavoritesFile { favorites: favorites.to_vec() };
        let json = serde_json::to_string_pretty(&file).context("Failed to serialize favorites")?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }

        Ok(())
    }
}
