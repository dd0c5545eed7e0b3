//! Error types for the dashboard client.

use thiserror::Error;

/// Errors that can occur when talking to the dashboard service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The service rejected the request with an explanatory message
    /// (failed login or signup).
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message returned by the service.
        message: String,
    },

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Input was rejected locally before any request was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status } | ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when no response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Reasons a signup form is refused before it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Username shorter than three characters.
    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,

    /// Username contains characters outside `[A-Za-z0-9_]`.
    #[error("Username can only contain letters, numbers, and underscores")]
    UsernameCharset,

    /// Email does not look like an address.
    #[error("Invalid email format")]
    InvalidEmail,

    /// Password shorter than eight characters.
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    /// Password lacks an uppercase letter.
    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,

    /// Password lacks a lowercase letter.
    #[error("Password must contain at least one lowercase letter")]
    PasswordMissingLowercase,

    /// Password lacks a digit.
    #[error("Password must contain at least one number")]
    PasswordMissingDigit,

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    ConfirmationMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_errors() {
        assert_eq!(ClientError::Http { status: 503 }.status(), Some(503));
        let rejected = ClientError::Rejected {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(rejected.status(), Some(401));
        assert_eq!(ClientError::Network("refused".to_string()).status(), None);
    }

    #[test]
    fn validation_errors_convert() {
        let err: ClientError = ValidationError::ConfirmationMismatch.into();
        assert!(matches!(err, ClientError::Validation(ValidationError::ConfirmationMismatch)));
        assert_eq!(err.to_string(), "Validation failed: Passwords do not match");
    }
}
