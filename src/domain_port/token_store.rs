use crate::domain_model::*;

/// Durable, synchronous storage for the two session credentials.
///
/// Implementations never fail loudly: a store that cannot persist behaves
/// like an empty one, and writes are best-effort.
pub trait TokenStore: Send + Sync {
    /// Stores `value` under `kind`, replacing any previous value.
    fn set(&self, kind: CredentialKind, value: &str);
    /// Returns the stored value, or `None` when absent.
    fn get(&self, kind: CredentialKind) -> Option<String>;
    /// Clears one credential, or both when `kind` is `None`.
    fn clear(&self, kind: Option<CredentialKind>);

    fn token_pair(&self) -> TokenPair {
        TokenPair {
            access: self.get(CredentialKind::Access).map(AccessToken),
            refresh: self.get(CredentialKind::Refresh).map(RefreshToken),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid store document: {0}")]
    Format(#[from] serde_json::Error),
}
