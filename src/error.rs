//! Error conditions callers need to tell apart
//!
//! Everything else travels as a plain `anyhow::Error`. These variants are
//! wrapped into `anyhow` as well and recovered with `downcast_ref`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpsError {
    /// A required argument was neither supplied nor resolvable
    #[error("Value cannot be null. Parameter name: {parameter}")]
    ArgumentNull { parameter: String },

    #[error("Invalid {parameter}: {message}")]
    InvalidArgument {
        parameter: &'static str,
        message: String,
    },

    /// The operation cannot run in the current state (e.g. no saved sessions)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Sign-in completed but produced a session for a different scope
    #[error("Signed in to {kind} '{actual}' but '{requested}' was requested")]
    SessionMismatch {
        kind: &'static str,
        requested: String,
        actual: String,
    },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Non-success response from Azure Resource Manager or Key Vault
    #[error("{service} request failed ({status}): {code}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        code: String,
        message: String,
    },
}

impl OpsError {
    pub fn argument_null(parameter: impl Into<String>) -> Self {
        Self::ArgumentNull {
            parameter: parameter.into(),
        }
    }

    /// HTTP status of an API failure, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            OpsError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Check whether an `anyhow` error wraps the given `OpsError` shape
pub fn is_invalid_operation(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<OpsError>(), Some(OpsError::InvalidOperation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_null_message() {
        let err = OpsError::argument_null("session");
        assert_eq!(err.to_string(), "Value cannot be null. Parameter name: session");
    }

    #[test]
    fn test_invalid_operation_survives_anyhow_wrapping() {
        let err: anyhow::Error = OpsError::InvalidOperation("no sessions".into()).into();
        let err = err.context("looking up session");
        assert!(is_invalid_operation(&err));

        let other = anyhow::anyhow!("boom");
        assert!(!is_invalid_operation(&other));
    }

    #[test]
    fn test_api_status() {
        let err = OpsError::Api {
            service: "Key Vault",
            status: 403,
            code: "Forbidden".into(),
            message: "denied".into(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(OpsError::FileNotFound("x".into()).status(), None);
    }
}
