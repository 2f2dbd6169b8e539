//! JSON file session store.
//!
//! Files live in one directory (default `~/.council/sessions`) and are named
//! `YYYY-MM-DD_HHMMSS_{short id}.json` after the deliberation's UTC creation
//! time, so a plain directory listing is chronological.

use council_application::{SessionEntry, SessionStore, StoreError};
use council_domain::Deliberation;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Session store writing one JSON file per deliberation
pub struct JsonSessionStore {
    dir: PathBuf,
}

impl JsonSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.council/sessions`
    pub fn default_dir() -> Result<PathBuf, StoreError> {
        dirs::home_dir()
            .map(|home| home.join(".council").join("sessions"))
            .ok_or(StoreError::NoHomeDirectory)
    }

    /// Store rooted at [`default_dir`](Self::default_dir)
    pub fn open_default() -> Result<Self, StoreError> {
        Self::default_dir().map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Canonical filename of a deliberation
    pub fn filename_for(deliberation: &Deliberation) -> String {
        format!(
            "{}_{}.json",
            deliberation.created_at.format("%Y-%m-%d_%H%M%S"),
            deliberation.short_id()
        )
    }

    /// Saved `.json` filenames, ascending
    fn filenames(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".json"))
            .collect();
        names.sort();
        Ok(names)
    }
}

fn create_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

impl SessionStore for JsonSessionStore {
    fn save(&self, deliberation: &Deliberation) -> Result<PathBuf, StoreError> {
        let path = self.dir.join(Self::filename_for(deliberation));
        self.save_to(deliberation, &path)?;
        Ok(path)
    }

    fn save_to(&self, deliberation: &Deliberation, path: &Path) -> Result<(), StoreError> {
        create_parent(path)?;
        let json =
            serde_json::to_string_pretty(deliberation).map_err(|source| StoreError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;
        fs::write(path, json).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved session {} to {}", deliberation.short_id(), path.display());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Deliberation, StoreError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(path.display().to_string())
            } else {
                StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
            path: path.to_path_buf(),
            source,
        })
    }

    fn list(&self) -> Result<Vec<SessionEntry>, StoreError> {
        let mut entries = Vec::new();
        for name in self.filenames()? {
            let path = self.dir.join(&name);
            match self.load(&path) {
                Ok(deliberation) => entries.push(SessionEntry::from_deliberation(path, &deliberation)),
                Err(e) => warn!("Skipping unreadable session {}: {}", path.display(), e),
            }
        }
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.path.cmp(&a.path))
        });
        Ok(entries)
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, StoreError> {
        if reference.ends_with(".json") {
            let path = PathBuf::from(reference);
            return if path.exists() {
                Ok(path)
            } else {
                Err(StoreError::NotFound(reference.to_string()))
            };
        }

        self.filenames()?
            .into_iter()
            .find(|name| name.contains(reference))
            .map(|name| self.dir.join(name))
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))
    }
}
