use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Credentials persisted as a small JSON document keyed by storage key,
/// e.g. `{"agriconnect.accessToken": "..."}`.
///
/// The document is read once on open and rewritten on every mutation.
/// Failures to write are logged and otherwise ignored.
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileTokenStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_document(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable credential store: {}", e);
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) {
        let Ok(mut entries) = self.entries.lock() else {
            tracing::error!("credential store lock poisoned");
            return;
        };
        f(&mut entries);
        if let Err(e) = write_document(&self.path, &*entries) {
            tracing::warn!(path = %self.path.display(), "failed to persist credentials: {}", e);
        }
    }
}

impl TokenStore for FileTokenStore {
    fn set(&self, kind: CredentialKind, value: &str) {
        self.mutate(|entries| {
            entries.insert(kind.storage_key().to_string(), value.to_string());
        });
    }

    fn get(&self, kind: CredentialKind) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(kind.storage_key()).cloned())
    }

    fn clear(&self, kind: Option<CredentialKind>) {
        self.mutate(|entries| match kind {
            Some(kind) => {
                entries.remove(kind.storage_key());
            }
            None => {
                for kind in CredentialKind::ALL {
                    entries.remove(kind.storage_key());
                }
            }
        });
    }
}

pub(crate) fn read_document<T>(path: &Path) -> Result<T, StoreError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(T::default()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Writes via a sibling temp file and rename so a crash never leaves a
/// half-written document behind.
pub(crate) fn write_document<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let store = FileTokenStore::open(&path);
        store.set(CredentialKind::Access, "A1");
        store.set(CredentialKind::Refresh, "R1");
        drop(store);

        let reopened = FileTokenStore::open(&path);
        assert_eq!(reopened.get(CredentialKind::Access).as_deref(), Some("A1"));
        assert_eq!(reopened.get(CredentialKind::Refresh).as_deref(), Some("R1"));

        let raw: BTreeMap<String, String> =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw.get("agriconnect.accessToken").map(String::as_str), Some("A1"));
    }

    #[test]
    fn clear_one_or_both() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileTokenStore::open(&path);
        store.set(CredentialKind::Access, "A1");
        store.set(CredentialKind::Refresh, "R1");

        store.clear(Some(CredentialKind::Refresh));
        assert_eq!(store.get(CredentialKind::Refresh), None);
        assert_eq!(store.get(CredentialKind::Access).as_deref(), Some("A1"));

        store.clear(None);
        let reopened = FileTokenStore::open(&path);
        assert_eq!(reopened.token_pair(), TokenPair::default());
    }

    #[test]
    fn corrupt_document_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, b"{not json").unwrap();

        let store = FileTokenStore::open(&path);
        assert_eq!(store.get(CredentialKind::Access), None);
        store.set(CredentialKind::Access, "A1");
        assert_eq!(
            FileTokenStore::open(&path).get(CredentialKind::Access).as_deref(),
            Some("A1")
        );
    }
}
