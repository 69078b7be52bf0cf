use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Signed-in user snapshot kept in step with the credential store and
/// persisted so a restart starts out with the last known user.
pub struct AuthState {
    auth_service: Arc<dyn AuthService>,
    snapshot_store: Arc<dyn SnapshotStore>,
    snapshot: Mutex<AuthSnapshot>,
    loading: AtomicBool,
}

impl AuthState {
    pub fn restore(
        auth_service: Arc<dyn AuthService>,
        snapshot_store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let snapshot = match snapshot_store.load() {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("ignoring unreadable auth snapshot: {}", e);
                AuthSnapshot::default()
            }
        };
        Self {
            auth_service,
            snapshot_store,
            snapshot: Mutex::new(snapshot),
            loading: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn set_user(&self, user: Option<UserProfile>) {
        let snapshot = AuthSnapshot::for_user(user);
        if let Ok(mut slot) = self.snapshot.lock() {
            *slot = snapshot.clone();
        }
        if let Err(e) = self.snapshot_store.save(&snapshot) {
            tracing::warn!("failed to persist auth snapshot: {}", e);
        }
    }

    /// Forgets the user and the stored credentials.
    pub async fn clear_user(&self) {
        if let Err(e) = self.auth_service.logout().await {
            tracing::warn!("logout failed: {}", e);
        }
        self.set_user(None);
    }

    /// Confirms the session against the backend. On any failure the
    /// credentials and the snapshot are cleared.
    pub async fn check_auth(&self) -> Result<UserProfile, ApiError> {
        self.loading.store(true, Ordering::Release);
        let result = self.auth_service.current_user().await;
        match &result {
            Ok(user) => self.set_user(Some(user.clone())),
            Err(e) => {
                tracing::info!("session check failed: {}", e);
                self.clear_user().await;
            }
        }
        self.loading.store(false, Ordering::Release);
        result
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResult, ApiError> {
        let result = self.auth_service.login(request).await?;
        self.set_user(Some(result.user.clone()));
        Ok(result)
    }

    pub async fn logout(&self) {
        self.clear_user().await;
    }
}
