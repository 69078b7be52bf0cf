use crate::application_port::ApiError;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::session::refresh::{Joined, RefreshCoordinator, RefreshOutcome};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::Instrument;

pub const REFRESH_PATH: &str = "/auth/token/refresh/";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

/// Authenticated front door to the backend.
///
/// Every request goes through two stages wrapped around the [`Transport`]:
/// [`SessionManager::before_send`] attaches the stored access credential, and
/// [`SessionManager::on_response`] turns a first 401 into a single shared
/// refresh followed by one replay of the request. Requests that hit a 401
/// while a refresh is running wait for it instead of starting another.
///
/// Cloning is cheap and clones share the refresh state.
#[derive(Clone)]
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    token_store: Arc<dyn TokenStore>,
    refresh: RefreshCoordinator,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            transport,
            token_store,
            refresh: RefreshCoordinator::default(),
        }
    }

    // region credentials

    pub fn store_tokens(&self, access: &AccessToken, refresh: &RefreshToken) {
        self.token_store.set(CredentialKind::Access, &access.0);
        self.token_store.set(CredentialKind::Refresh, &refresh.0);
    }

    pub fn clear_tokens(&self) {
        self.token_store.clear(None);
    }

    pub fn token_pair(&self) -> TokenPair {
        self.token_store.token_pair()
    }

    pub fn refresh_in_flight(&self) -> bool {
        self.refresh.in_flight()
    }

    fn stored_access(&self) -> Option<String> {
        self.token_store
            .get(CredentialKind::Access)
            .filter(|access| !access.is_empty())
    }

    // endregion

    // region pipeline

    /// Outgoing stage: attach the stored access credential, if any.
    pub fn before_send(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(access) = self.stored_access() {
            let token = AccessToken(access);
            tracing::trace!(token = %token.fingerprint(), "attaching access token");
            request.set_bearer(&token);
        }
        request
    }

    /// Incoming stage: pass successes through, recover a first 401 through
    /// the refresh protocol, and normalize every other failure.
    pub async fn on_response(
        &self,
        request: ApiRequest,
        result: Result<ApiResponse, TransportError>,
    ) -> Result<ApiResponse, ApiError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("transport failure: {}", e);
                return Err(e.into());
            }
        };

        if response.is_success() {
            return Ok(response);
        }

        if response.status != StatusCode::UNAUTHORIZED
            || request.retried
            || !request.refresh_on_unauthorized
        {
            return Err(ApiError::from_response(&response));
        }

        // Someone else already renewed the credential since this request left.
        let joined = self.refresh.join(|| {
            let current = self.stored_access()?;
            let sent = request.bearer()?;
            (sent != current).then(|| AccessToken(current))
        });

        let (outcome, leader) = match joined {
            Joined::Replay(current) => {
                tracing::debug!("request carried a stale access token, replaying");
                return self.replay(request, current).await;
            }
            Joined::Queued { outcome, leader } => (outcome, leader),
        };

        match self.wait_for_refresh(outcome, leader).await {
            Some(token) => self.replay(request, token).await,
            None => Err(ApiError::SessionExpired),
        }
    }

    /// Sends `request` through both stages.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let span = tracing::debug_span!(
            "api",
            id = %nanoid::nanoid!(8),
            method = %request.method,
            path = %request.path,
        );
        self.dispatch(request).instrument(span).await
    }

    fn dispatch(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse, ApiError>> {
        async move {
            let request = self.before_send(request);
            let result = self.transport.send(request.clone()).await;
            self.on_response(request, result).await
        }
        .boxed()
    }

    async fn replay(
        &self,
        mut request: ApiRequest,
        token: AccessToken,
    ) -> Result<ApiResponse, ApiError> {
        request.retried = true;
        request.set_bearer(&token);
        tracing::debug!(token = %token.fingerprint(), "replaying request with renewed token");
        self.dispatch(request).await
    }

    // endregion

    // region refresh

    /// Waits on the current refresh cycle, starting it when `leader`.
    async fn wait_for_refresh(
        &self,
        outcome: oneshot::Receiver<RefreshOutcome>,
        leader: bool,
    ) -> RefreshOutcome {
        if leader {
            // Detached: the refresh outlives the caller that started it.
            let this = self.clone();
            tokio::spawn(async move {
                let mut guard = this.refresh.drain_guard();
                guard.outcome = this.refresh_access_token().await;
            });
        } else {
            tracing::debug!("refresh already in flight, queueing request");
        }
        outcome.await.unwrap_or(None)
    }

    /// Exchanges the stored refresh credential for a new access credential.
    ///
    /// Bypasses both pipeline stages. On any failure both stored credentials
    /// are cleared and `None` is returned. No request is made when no refresh
    /// credential is stored.
    pub async fn refresh_access_token(&self) -> RefreshOutcome {
        let stored = self
            .token_store
            .get(CredentialKind::Refresh)
            .filter(|refresh| !refresh.is_empty());
        let Some(refresh) = stored else {
            tracing::info!("no refresh token stored, session cannot be renewed");
            self.token_store.clear(None);
            return None;
        };
        let refresh = RefreshToken(refresh);
        tracing::info!(token = %refresh.fingerprint(), "refreshing access token");

        let request = ApiRequest::post(REFRESH_PATH)
            .anonymous()
            .with_body(serde_json::json!({ "refresh": refresh.0 }));

        let renewed = match self.transport.send(request).await {
            Ok(response) if response.is_success() => match response.json::<RefreshResponse>() {
                Ok(RefreshResponse {
                    access: Some(access),
                    refresh: rotated,
                }) if !access.is_empty() => Some((access, rotated)),
                Ok(_) => {
                    tracing::warn!("refresh response carried no access token");
                    None
                }
                Err(e) => {
                    tracing::warn!("refresh response could not be decoded: {}", e);
                    None
                }
            },
            Ok(response) => {
                tracing::warn!(status = %response.status, "refresh rejected");
                None
            }
            Err(e) => {
                tracing::warn!("refresh request failed: {}", e);
                None
            }
        };

        match renewed {
            Some((access, rotated)) => {
                self.token_store.set(CredentialKind::Access, &access);
                if let Some(rotated) = rotated.filter(|r| !r.is_empty()) {
                    self.token_store.set(CredentialKind::Refresh, &rotated);
                }
                let token = AccessToken(access);
                tracing::info!(token = %token.fingerprint(), "access token refreshed");
                Some(token)
            }
            None => {
                self.token_store.clear(None);
                None
            }
        }
    }

    // endregion

    // region typed helpers

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        response.json().map_err(ApiError::decode)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(ApiError::encode)?;
        self.send_json(ApiRequest::post(path).with_body(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(ApiError::encode)?;
        self.send_json(ApiRequest::patch(path).with_body(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(path)).await.map(|_| ())
    }

    // endregion
}
