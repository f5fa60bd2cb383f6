//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pin::Exhaustion;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wrong PIN entered while verifying the current PIN
    #[error("Incorrect PIN, {remaining} attempt(s) remaining")]
    IncorrectPin { remaining: u32 },

    /// Confirmation did not match the newly chosen PIN
    #[error("PINs do not match, {remaining} attempt(s) remaining")]
    ConfirmationMismatch { remaining: u32 },

    #[error("{0}")]
    AttemptsExhausted(Exhaustion),

    /// The session was terminated by a lockout; no further PIN input is accepted
    #[error("Session has ended, please log in again")]
    SessionEnded,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("PIN store error: {0}")]
    Store(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Record source error: {0}")]
    Records(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a PIN store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a record source error
    pub fn records(msg: impl Into<String>) -> Self {
        Self::Records(msg.into())
    }

    /// Remaining attempts carried by a recoverable PIN error, if any
    pub fn remaining_attempts(&self) -> Option<u32> {
        match self {
            Self::IncorrectPin { remaining } | Self::ConfirmationMismatch { remaining } => {
                Some(*remaining)
            }
            _ => None,
        }
    }

    /// True when the error ended the user's session
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            Self::AttemptsExhausted(Exhaustion::Logout) | Self::SessionEnded
        )
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for FFI serialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                // Keep the remaining count machine-readable for the UI
                match e.remaining_attempts() {
                    Some(remaining) => {
                        let mut context = HashMap::new();
                        context.insert("remainingAttempts".to_string(), remaining.into());
                        Self::fail_with_context(e.to_string(), context)
                    }
                    None => Self::fail(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_from_result() {
        let err: Result<i32> = Err(Error::validation("bad input"));
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Validation error"));
        assert!(result.context.is_none());
    }

    #[test]
    fn test_mismatch_carries_remaining_attempts() {
        let err: Result<()> = Err(Error::IncorrectPin { remaining: 2 });
        let result: OperationResult<()> = err.into();
        let context = result.context.unwrap();
        assert_eq!(context["remainingAttempts"], serde_json::json!(2));
        assert_eq!(result.error.unwrap(), "Incorrect PIN, 2 attempt(s) remaining");
    }

    #[test]
    fn test_exhaustion_messages_differ_from_mismatch() {
        let reset = Error::AttemptsExhausted(Exhaustion::ResetToSetup).to_string();
        let logout = Error::AttemptsExhausted(Exhaustion::Logout).to_string();
        let mismatch = Error::ConfirmationMismatch { remaining: 1 }.to_string();
        assert_ne!(reset, mismatch);
        assert_ne!(reset, logout);
        assert!(Error::AttemptsExhausted(Exhaustion::Logout).is_session_fatal());
        assert!(!Error::AttemptsExhausted(Exhaustion::ResetToSetup).is_session_fatal());
    }
}
