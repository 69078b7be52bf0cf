use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

pub const ACCESS_TOKEN_KEY: &str = "agriconnect.accessToken";
pub const REFRESH_TOKEN_KEY: &str = "agriconnect.refreshToken";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    Access,
    Refresh,
}

impl CredentialKind {
    pub const ALL: [CredentialKind; 2] = [CredentialKind::Access, CredentialKind::Refresh];

    /// Fixed storage key the credential is persisted under.
    pub fn storage_key(self) -> &'static str {
        match self {
            CredentialKind::Access => ACCESS_TOKEN_KEY,
            CredentialKind::Refresh => REFRESH_TOKEN_KEY,
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Access => write!(f, "access"),
            CredentialKind::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(pub String);

impl AccessToken {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.0)
    }
}

impl RefreshToken {
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.0)
    }
}

// Tokens are opaque secrets: Debug shows only the fingerprint.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self.fingerprint())
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefreshToken({})", self.fingerprint())
    }
}

/// Short, log-safe digest of a credential value.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(&digest[..4])
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TokenPair {
    pub access: Option<AccessToken>,
    pub refresh: Option<RefreshToken>,
}
