//! Error taxonomy for the BloodLink API client.
//!
//! Three classes matter to callers: authentication failures (flow into
//! session state, never toasted here), transport failures (toasted once at
//! the HTTP layer, never retried), and decode failures (a contract bug).

use thiserror::Error;

/// Error type for API operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Session expired")]
    SessionExpired,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Authentication-class failures are routed into session state rather
    /// than shown as toasts.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::SessionExpired)
    }

    /// Transient failures that warrant a user-visible toast but no retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_)
                | ApiError::Timeout
                | ApiError::Server { .. }
                | ApiError::Forbidden
                | ApiError::NotFound
                | ApiError::Api { .. }
        )
    }

    /// Short message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Network error. Check your connection.".to_string(),
            ApiError::Timeout => "The request timed out. Please try again.".to_string(),
            ApiError::Unauthorized => "Invalid email or password".to_string(),
            ApiError::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Forbidden => "You don't have permission to do that.".to_string(),
            ApiError::NotFound => "The requested resource was not found.".to_string(),
            ApiError::Server { .. } => "Server error. Please try again later.".to_string(),
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_not_transient() {
        assert!(ApiError::Unauthorized.is_auth());
        assert!(ApiError::SessionExpired.is_auth());
        assert!(!ApiError::Unauthorized.is_transient());
        assert!(!ApiError::SessionExpired.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = ApiError::Server {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(err.is_transient());
        assert!(!err.is_auth());
    }

    #[test]
    fn api_error_toast_carries_server_message() {
        let err = ApiError::Api {
            status: 422,
            message: "Blood type is required".to_string(),
        };
        assert_eq!(err.user_message(), "Blood type is required");
    }
}
