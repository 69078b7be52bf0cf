use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_http::*;
use crate::infra_store::*;
use crate::logger::*;
use crate::session::SessionManager;
use crate::settings::Settings;
use std::sync::Arc;

/// Everything a front end needs, wired from settings.
pub struct Client {
    pub session: SessionManager,
    pub auth_service: Arc<dyn AuthService>,
    pub farm_service: Arc<dyn FarmService>,
    pub auth_state: Arc<AuthState>,
}

impl Client {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let token_store: Arc<dyn TokenStore> = match settings.store.backend.as_str() {
            "file" => Arc::new(FileTokenStore::open(&settings.store.credentials_path)),
            "memory" => Arc::new(MemoryTokenStore::new()),
            "none" => Arc::new(NoopTokenStore),
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };
        let snapshot_store: Arc<dyn SnapshotStore> = match settings.store.backend.as_str() {
            "file" => Arc::new(FileSnapshotStore::new(&settings.store.snapshot_path)),
            _ => Arc::new(MemorySnapshotStore::new()),
        };

        let transport: Arc<dyn Transport> =
            Arc::new(ReqwestTransport::try_new(&settings.api.transport_config())?);
        let session = SessionManager::new(transport, token_store.clone());

        let auth_service: Arc<dyn AuthService> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeAuthService::new(token_store)),
            "real" => Arc::new(RealAuthService::new(session.clone())),
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };
        let farm_service: Arc<dyn FarmService> = Arc::new(RealFarmService::new(session.clone()));
        let auth_state = Arc::new(AuthState::restore(auth_service.clone(), snapshot_store));

        debug!(
            base_url = %settings.api.base_url,
            store = %settings.store.backend,
            auth = %settings.auth.backend,
            "client ready"
        );

        Ok(Self {
            session,
            auth_service,
            farm_service,
            auth_state,
        })
    }
}
