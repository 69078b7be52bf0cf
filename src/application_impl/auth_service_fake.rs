use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::TokenStore;
use std::sync::{Arc, Mutex};

/// Offline stand-in for the backend's auth endpoints.
///
/// Any password logs in; the profile is derived from the e-mail address.
/// Tokens are `fake-access-token:<email>` / `fake-refresh-token:<email>` and
/// land in the token store like real ones. The backend does not accept them,
/// so farm endpoints still need the `real` auth backend.
pub struct FakeAuthService {
    token_store: Arc<dyn TokenStore>,
    signed_in: Mutex<Option<UserProfile>>,
}

impl FakeAuthService {
    pub fn new(token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            token_store,
            signed_in: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl AuthService for FakeAuthService {
    async fn login(&self, request: LoginInput) -> Result<AuthResult, ApiError> {
        let user = get_fake_user(&request.email, None);
        if let Ok(mut slot) = self.signed_in.lock() {
            *slot = Some(user.clone());
        }
        let access = format!("fake-access-token:{}", request.email);
        let refresh = format!("fake-refresh-token:{}", request.email);
        self.token_store.set(CredentialKind::Access, &access);
        self.token_store.set(CredentialKind::Refresh, &refresh);
        Ok(AuthResult {
            access: AccessToken(access),
            refresh: RefreshToken(refresh),
            user,
        })
    }

    async fn register(&self, request: RegisterInput) -> Result<UserProfile, ApiError> {
        if request.password != request.confirm_password {
            return Err(ApiError::Request {
                status: Some(reqwest::StatusCode::BAD_REQUEST),
                message: "Passwords do not match.".to_string(),
            });
        }
        let mut user = get_fake_user(&request.email, request.role);
        if let Some(first_name) = request.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name;
        }
        user.phone_number = request.phone_number;
        Ok(user)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.token_store.clear(None);
        if let Ok(mut slot) = self.signed_in.lock() {
            *slot = None;
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.signed_in
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(ApiError::SessionExpired)
    }

    async fn reset_password(&self, email: &str) -> Result<ResetPasswordResult, ApiError> {
        Ok(ResetPasswordResult {
            detail: format!("Password reset e-mail has been sent to {}.", email),
        })
    }
}

fn get_fake_user(email: &str, role: Option<Role>) -> UserProfile {
    let id = email
        .bytes()
        .fold(0i64, |acc, b| (acc * 31 + b as i64) % 1_000_000);
    let local = email.split('@').next().unwrap_or(email);
    UserProfile {
        id,
        email: email.to_string(),
        first_name: local.to_string(),
        last_name: String::new(),
        phone_number: None,
        role: role.unwrap_or(Role::Farmer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_store::MemoryTokenStore;

    #[tokio::test]
    async fn login_then_logout() {
        let store = Arc::new(MemoryTokenStore::new());
        let service = FakeAuthService::new(store.clone());
        assert_eq!(service.current_user().await.unwrap_err(), ApiError::SessionExpired);

        let result = service
            .login(LoginInput {
                email: "ada@example.com".to_string(),
                password: "anything".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(result.access.0, "fake-access-token:ada@example.com");
        assert_eq!(service.current_user().await.unwrap(), result.user);
        assert_eq!(
            store.get(CredentialKind::Access).as_deref(),
            Some("fake-access-token:ada@example.com")
        );
        assert_eq!(
            store.get(CredentialKind::Refresh).as_deref(),
            Some("fake-refresh-token:ada@example.com")
        );

        service.logout().await.unwrap();
        assert!(service.current_user().await.is_err());
        assert_eq!(store.token_pair(), TokenPair::default());
    }
}
