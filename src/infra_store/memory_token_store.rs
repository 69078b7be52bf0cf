use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;

/// Keeps credentials for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<CredentialKind, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn set(&self, kind: CredentialKind, value: &str) {
        self.tokens.insert(kind, value.to_string());
    }

    fn get(&self, kind: CredentialKind) -> Option<String> {
        self.tokens.get(&kind).map(|v| v.value().clone())
    }

    fn clear(&self, kind: Option<CredentialKind>) {
        match kind {
            Some(kind) => {
                self.tokens.remove(&kind);
            }
            None => self.tokens.clear(),
        }
    }
}
