use crate::domain_model::*;
use crate::domain_port::*;

/// Store used when no persistent environment is available: nothing is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTokenStore;

impl TokenStore for NoopTokenStore {
    fn set(&self, _kind: CredentialKind, _value: &str) {}

    fn get(&self, _kind: CredentialKind) -> Option<String> {
        None
    }

    fn clear(&self, _kind: Option<CredentialKind>) {}
}
