use crate::application_port::ApiError;
use crate::domain_model::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone)]
pub struct AuthResult {
    pub access: AccessToken,
    pub refresh: RefreshToken,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResetPasswordResult {
    pub detail: String,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Obtains a token pair, stores it, and loads the signed-in profile.
    async fn login(&self, request: LoginInput) -> Result<AuthResult, ApiError>;
    async fn register(&self, request: RegisterInput) -> Result<UserProfile, ApiError>;
    /// Forgets both stored credentials. Purely local.
    async fn logout(&self) -> Result<(), ApiError>;
    async fn current_user(&self) -> Result<UserProfile, ApiError>;
    async fn reset_password(&self, email: &str) -> Result<ResetPasswordResult, ApiError>;
}
