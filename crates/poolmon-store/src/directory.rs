//! Per-user routing: which data set an authenticated email maps to

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{StoreError, StoreResult};

/// One authorized user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub email: String,
    /// Identifier of the user's data set (e.g. a subdirectory name).
    pub storage_id: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Lookup table from login email to storage id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDirectory {
    pub entries: Vec<DirectoryEntry>,
}

impl UserDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolve an email to its storage id. Matching ignores case and
    /// surrounding whitespace. Unknown emails and deactivated accounts
    /// are distinct failures.
    pub fn resolve(&self, email: &str) -> StoreResult<&str> {
        let needle = email.trim().to_lowercase();
        let entry = self
            .entries
            .iter()
            .find(|e| e.email.trim().to_lowercase() == needle)
            .ok_or_else(|| StoreError::UserNotAuthorized(email.to_string()))?;
        if !entry.active {
            return Err(StoreError::UserInactive(email.to_string()));
        }
        Ok(&entry.storage_id)
    }
}
