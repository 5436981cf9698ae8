//! Name → roll number mapping for registered users.
//!
//! One `Registry` is owned per session and passed to whatever needs it;
//! the table reads it, the console mutates it.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Shown in place of a roll number for names the registry does not know.
pub const UNKNOWN_ROLL_NO: &str = "N/A";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("User {0} already registered.")]
    AlreadyRegistered(String),
    #[error("Name and Roll No cannot be empty.")]
    EmptyField,
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("bad roster TOML in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Roster file layout: a single `[users]` table of `name = "roll"`.
#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    users: BTreeMap<String, String>,
}

/// Users in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    users: Vec<(String, String)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a roster TOML file. A missing file yields an empty registry;
    /// entries that cannot be registered are skipped with a warning.
    pub fn load_roster(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no roster file, starting empty");
            return Ok(Self::new());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let roster: RosterFile = toml::from_str(&raw).map_err(|source| RegistryError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        let mut registry = Self::new();
        for (name, roll_no) in roster.users {
            if let Err(e) = registry.register(&name, &roll_no) {
                tracing::warn!(path = %path.display(), name = %name, error = %e, "skipping roster entry");
            }
        }
        tracing::info!(path = %path.display(), users = registry.len(), "loaded roster");
        Ok(registry)
    }

    /// Register a user. Both fields are trimmed; neither may be empty,
    /// and an existing name is never overwritten.
    pub fn register(&mut self, name: &str, roll_no: &str) -> Result<(), RegistryError> {
        let (name, roll_no) = (name.trim(), roll_no.trim());
        if name.is_empty() || roll_no.is_empty() {
            return Err(RegistryError::EmptyField);
        }
        if self.roll_no(name).is_some() {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        self.users.push((name.to_string(), roll_no.to_string()));
        Ok(())
    }

    pub fn roll_no(&self, name: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r.as_str())
    }

    /// Roll number for display, [`UNKNOWN_ROLL_NO`] when unregistered.
    pub fn roll_no_or_unknown(&self, name: &str) -> &str {
        self.roll_no(name).unwrap_or(UNKNOWN_ROLL_NO)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.users.iter().map(|(n, r)| (n.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
