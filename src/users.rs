// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User store collaborator.
//!
//! The gateway treats user storage as a point-lookup collaborator: the
//! local-secret auth path and the `/token` credential exchange only ever
//! fetch one record by username. The in-memory store is seeded at startup
//! from `USERS_FILE` (a JSON array of user records) when configured.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

/// A user record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    pub hashed_password: String,
}

/// In-memory user store keyed by username.
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, StoredUser>,
}

/// Errors loading the seed file.
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("failed to read users file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse users file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON array of user records.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, UserStoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let records: Vec<StoredUser> = serde_json::from_str(&raw)?;
        let mut store = Self::new();
        for user in records {
            store.insert_user(user);
        }
        info!(count = store.users.len(), "user store seeded from file");
        Ok(store)
    }

    pub fn insert_user(&mut self, user: StoredUser) {
        self.users.insert(user.username.clone(), user);
    }

    /// Point lookup by username.
    pub fn fetch_by_username(&self, username: &str) -> Option<&StoredUser> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_user(username: &str) -> StoredUser {
        StoredUser {
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            full_name: None,
            disabled: false,
            hashed_password: "$2b$04$fakehash".to_string(),
        }
    }

    #[test]
    fn fetch_by_username_finds_inserted_user() {
        let mut store = UserStore::new();
        store.insert_user(sample_user("alice"));

        let user = store.fetch_by_username("alice").unwrap();
        assert_eq!(user.username, "alice");
        assert!(store.fetch_by_username("bob").is_none());
    }

    #[test]
    fn from_file_parses_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"username":"alice","hashed_password":"$2b$04$x","disabled":false}},
                {{"username":"bob","hashed_password":"$2b$04$y"}}]"#
        )
        .unwrap();

        let store = UserStore::from_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.fetch_by_username("bob").unwrap().disabled);
    }

    #[test]
    fn from_file_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            UserStore::from_file(file.path()),
            Err(UserStoreError::Parse(_))
        ));
    }
}
