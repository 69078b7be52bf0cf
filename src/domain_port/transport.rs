use crate::domain_model::*;

/// Sends one request and returns whatever the server answered.
///
/// Non-2xx statuses are ordinary responses; only failures to obtain a
/// response at all are `TransportError`s.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("could not connect: {0}")]
    Connect(String),
    #[error("{0}")]
    Network(String),
}
