use crate::domain_model::ApiResponse;
use crate::domain_port::TransportError;
use reqwest::StatusCode;
use serde::Deserialize;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failure surfaced to callers of the session pipeline. `Display` is the
/// message meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    #[error("{message}")]
    Unauthorized { message: String },
    #[error("{message}")]
    Request {
        status: Option<StatusCode>,
        message: String,
    },
    #[error("unexpected response from server: {message}")]
    Decode { message: String },
    #[error("could not encode request: {message}")]
    Encode { message: String },
}

/// Error body shape produced by the backend.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ErrorBody {
    fn display_message(&self) -> Option<String> {
        if let Some(detail) = self.detail.as_deref().filter(|s| !s.is_empty()) {
            return Some(detail.to_string());
        }
        if let Some(message) = self.message.as_deref().filter(|s| !s.is_empty()) {
            return Some(message.to_string());
        }
        let errors = self.errors.as_ref()?;
        let joined = errors
            .values()
            .flat_map(|value| match value {
                serde_json::Value::String(s) => vec![s.as_str()],
                serde_json::Value::Array(items) => {
                    items.iter().filter_map(|item| item.as_str()).collect()
                }
                _ => Vec::new(),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" \u{2022} ");
        if joined.is_empty() { None } else { Some(joined) }
    }
}

/// Picks the display message for an HTTP error response: `detail`, then
/// `message`, then the flattened `errors`, then the transport-level text.
pub fn error_message(response: &ApiResponse) -> String {
    serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.display_message())
        .unwrap_or_else(|| {
            format!(
                "Request failed with status code {}",
                response.status.as_u16()
            )
        })
}

impl ApiError {
    pub fn from_response(response: &ApiResponse) -> Self {
        let message = error_message(response);
        if response.status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Request {
                status: Some(response.status),
                message,
            }
        }
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        ApiError::Decode {
            message: err.to_string(),
        }
    }

    pub fn encode(err: impl std::fmt::Display) -> Self {
        ApiError::Encode {
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::SessionExpired | ApiError::Unauthorized { .. } => {
                Some(StatusCode::UNAUTHORIZED)
            }
            ApiError::Request { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        ApiError::Request {
            status: None,
            message: if message.is_empty() {
                GENERIC_FAILURE_MESSAGE.to_string()
            } else {
                message
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: serde_json::Value) -> ApiResponse {
        ApiResponse::json_body(StatusCode::from_u16(status).unwrap(), &body)
    }

    #[test]
    fn detail_takes_precedence() {
        let r = response(400, json!({"detail": "Bad", "message": "Other", "errors": {"a": "x"}}));
        assert_eq!(error_message(&r), "Bad");
    }

    #[test]
    fn message_used_when_detail_missing() {
        let r = response(400, json!({"message": "Other", "errors": {"a": "x"}}));
        assert_eq!(error_message(&r), "Other");
    }

    #[test]
    fn field_errors_are_flattened_in_order() {
        let r = response(
            400,
            json!({"errors": {"email": ["Taken.", ""], "password": "Too short."}}),
        );
        assert_eq!(error_message(&r), "Taken. \u{2022} Too short.");
    }

    #[test]
    fn falls_back_to_status_text() {
        let r = ApiResponse::new(StatusCode::BAD_GATEWAY, b"<html>".to_vec());
        assert_eq!(error_message(&r), "Request failed with status code 502");

        let r = response(400, json!({"errors": {}}));
        assert_eq!(error_message(&r), "Request failed with status code 400");
    }

    #[test]
    fn unauthorized_responses_map_to_unauthorized() {
        let r = response(401, json!({"detail": "No active account found"}));
        let err = ApiError::from_response(&r);
        assert_eq!(
            err,
            ApiError::Unauthorized {
                message: "No active account found".to_string()
            }
        );
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn session_expired_message_is_fixed() {
        assert_eq!(ApiError::SessionExpired.to_string(), SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn transport_failures_keep_their_message() {
        let err: ApiError = TransportError::Timeout("timed out after 10000ms".to_string()).into();
        assert_eq!(err.to_string(), "request timed out: timed out after 10000ms");
        assert_eq!(err.status(), None);
    }
}
