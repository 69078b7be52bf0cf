use crate::domain_model::*;
use crate::domain_port::*;
use super::file_token_store::{read_document, write_document};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

pub const AUTH_STORE_NAME: &str = "agriconnect-auth-store";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    state: Option<AuthSnapshot>,
}

pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<AuthSnapshot>, StoreError> {
        let document: SnapshotDocument = read_document(&self.path)?;
        if !document.name.is_empty() && document.name != AUTH_STORE_NAME {
            return Ok(None);
        }
        Ok(document.state)
    }

    fn save(&self, snapshot: &AuthSnapshot) -> Result<(), StoreError> {
        let document = SnapshotDocument {
            name: AUTH_STORE_NAME.to_string(),
            state: Some(snapshot.clone()),
        };
        write_document(&self.path, &document)
    }
}

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<AuthSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<AuthSnapshot>, StoreError> {
        Ok(self.snapshot.lock().ok().and_then(|s| s.clone()))
    }

    fn save(&self, snapshot: &AuthSnapshot) -> Result<(), StoreError> {
        if let Ok(mut slot) = self.snapshot.lock() {
            *slot = Some(snapshot.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("auth-store.json"));
        assert_eq!(store.load().unwrap(), None);

        let snapshot = AuthSnapshot::for_user(Some(UserProfile {
            id: 1,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "L".to_string(),
            phone_number: None,
            role: Role::Farmer,
        }));
        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.is_authenticated);
        assert_eq!(loaded, snapshot);
    }
}
