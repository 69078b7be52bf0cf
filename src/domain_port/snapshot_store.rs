use crate::domain_model::*;
use crate::domain_port::StoreError;

/// Persists the signed-in user snapshot between runs.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<AuthSnapshot>, StoreError>;
    fn save(&self, snapshot: &AuthSnapshot) -> Result<(), StoreError>;
}
