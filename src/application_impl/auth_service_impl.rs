use crate::application_port::*;
use crate::domain_model::*;
use crate::session::SessionManager;
use serde::Deserialize;

pub const LOGIN_PATH: &str = "/auth/token/";
pub const REGISTER_PATH: &str = "/auth/register/";
pub const ME_PATH: &str = "/auth/me/";
pub const PASSWORD_RESET_PATH: &str = "/auth/password-reset/";

#[derive(Debug, Deserialize)]
struct TokenPairResponse {
    access: AccessToken,
    refresh: RefreshToken,
}

pub struct RealAuthService {
    session: SessionManager,
}

impl RealAuthService {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }
}

fn json_body<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(ApiError::encode)
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn login(&self, request: LoginInput) -> Result<AuthResult, ApiError> {
        let body = json_body(&request)?;
        let tokens: TokenPairResponse = self
            .session
            .send_json(ApiRequest::post(LOGIN_PATH).anonymous().with_body(body))
            .await?;
        self.session.store_tokens(&tokens.access, &tokens.refresh);
        tracing::info!(email = %request.email, "logged in");

        let user = self.current_user().await?;
        Ok(AuthResult {
            access: tokens.access,
            refresh: tokens.refresh,
            user,
        })
    }

    async fn register(&self, request: RegisterInput) -> Result<UserProfile, ApiError> {
        let body = json_body(&request)?;
        self.session
            .send_json(ApiRequest::post(REGISTER_PATH).anonymous().with_body(body))
            .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.session.clear_tokens();
        tracing::info!("logged out");
        Ok(())
    }

    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.session.get(ME_PATH).await
    }

    async fn reset_password(&self, email: &str) -> Result<ResetPasswordResult, ApiError> {
        let body = serde_json::json!({ "email": email });
        self.session
            .send_json(ApiRequest::post(PASSWORD_RESET_PATH).anonymous().with_body(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_port::*;
    use crate::infra_http::FakeTransport;
    use crate::infra_store::MemoryTokenStore;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    fn profile_json() -> serde_json::Value {
        json!({
            "id": 7,
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "role": "farmer"
        })
    }

    fn service() -> (RealAuthService, Arc<FakeTransport>, Arc<MemoryTokenStore>) {
        let transport = Arc::new(FakeTransport::new(|request| {
            let reply = |code: u16, body: serde_json::Value| -> Result<ApiResponse, TransportError> {
                Ok(ApiResponse::json_body(StatusCode::from_u16(code).unwrap(), &body))
            };
            match request.path.as_str() {
                LOGIN_PATH => {
                    let body = request.body.clone().unwrap_or_default();
                    if body["password"] == "secret" {
                        reply(200, json!({ "access": "A1", "refresh": "R1" }))
                    } else {
                        reply(401, json!({ "detail": "No active account found with the given credentials" }))
                    }
                }
                ME_PATH if request.bearer() == Some("A1") => reply(200, profile_json()),
                ME_PATH => reply(401, json!({ "detail": "Authentication credentials were not provided." })),
                REGISTER_PATH => reply(400, json!({ "errors": { "email": ["user with this email already exists."] } })),
                PASSWORD_RESET_PATH => reply(200, json!({ "detail": "Password reset e-mail has been sent." })),
                _ => reply(404, json!({ "detail": "Not found." })),
            }
        }));
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionManager::new(transport.clone(), store.clone());
        (RealAuthService::new(session), transport, store)
    }

    #[tokio::test]
    async fn login_stores_tokens_and_loads_profile() {
        let (service, transport, store) = service();
        let result = service
            .login(LoginInput {
                email: "ada@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.access, AccessToken("A1".to_string()));
        assert_eq!(result.user.role, Role::Farmer);
        assert_eq!(store.get(CredentialKind::Access).as_deref(), Some("A1"));
        assert_eq!(store.get(CredentialKind::Refresh).as_deref(), Some("R1"));

        let sent = transport.requests();
        assert_eq!(sent[0].path, LOGIN_PATH);
        assert_eq!(sent[0].body, Some(json!({ "email": "ada@example.com", "password": "secret" })));
        assert_eq!(sent[1].path, ME_PATH);
        assert_eq!(sent[1].bearer(), Some("A1"));
    }

    #[tokio::test]
    async fn wrong_password_reports_backend_detail() {
        let (service, transport, store) = service();
        let err = service
            .login(LoginInput {
                email: "ada@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No active account found with the given credentials");
        assert_eq!(transport.count("/auth/token/refresh/"), 0);
        assert_eq!(store.token_pair(), TokenPair::default());
    }

    #[tokio::test]
    async fn register_failure_flattens_field_errors() {
        let (service, _, _) = service();
        let err = service
            .register(RegisterInput {
                email: "ada@example.com".to_string(),
                password: "secret".to_string(),
                confirm_password: "secret".to_string(),
                role: Some(Role::Buyer),
                ..RegisterInput::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "user with this email already exists.");
    }

    #[tokio::test]
    async fn logout_clears_tokens_and_me_then_expires() {
        let (service, _, store) = service();
        store.set(CredentialKind::Access, "A1");
        store.set(CredentialKind::Refresh, "R1");
        service.logout().await.unwrap();
        assert_eq!(store.token_pair(), TokenPair::default());

        let err = service.current_user().await.unwrap_err();
        assert_eq!(err, ApiError::SessionExpired);
    }

    #[tokio::test]
    async fn reset_password_returns_detail() {
        let (service, _, _) = service();
        let result = service.reset_password("ada@example.com").await.unwrap();
        assert_eq!(result.detail, "Password reset e-mail has been sent.");
    }
}
