//! Error Types
//!
//! `BackendError` classifies collaborator failures; `BoardError` is the
//! user-facing taxonomy behind the single message slot.

use std::fmt;

/// Common result type for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures reported by the remote store or auth service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    NotFound(String),
    PermissionDenied(String),
    Unavailable(String),
    Unauthenticated(String),
    Internal(String),
}

impl BackendError {
    /// Classify a collaborator error code such as `permission-denied`.
    ///
    /// Codes may carry a service prefix (`auth/network-request-failed`).
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let bare = code.rsplit('/').next().unwrap_or(code);
        match bare {
            "not-found" | "user-not-found" => BackendError::NotFound(message),
            "permission-denied" | "operation-not-allowed" | "admin-restricted-operation" => {
                BackendError::PermissionDenied(message)
            }
            "unavailable" | "network-request-failed" | "deadline-exceeded" => {
                BackendError::Unavailable(message)
            }
            "unauthenticated" | "invalid-custom-token" | "custom-token-mismatch" => {
                BackendError::Unauthenticated(message)
            }
            _ => BackendError::Internal(message),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotFound(msg) => write!(f, "Not found: {}", msg),
            BackendError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BackendError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
            BackendError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            BackendError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Failures surfaced to the user.
///
/// Each variant maps to one fixed human-readable message; details stay in
/// the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Configuration or backend unreachable at startup. Fatal.
    Initialization(String),
    /// Neither token nor anonymous sign-in succeeded
    Auth,
    /// The live listener reported an error
    Subscription,
    AddFailed,
    UpdateFailed,
    DeleteFailed,
}

impl BoardError {
    pub fn user_message(&self) -> &'static str {
        match self {
            BoardError::Initialization(_) => {
                "Failed to initialize the application. Please check the configuration."
            }
            BoardError::Auth => "Could not connect to the authentication service.",
            BoardError::Subscription => {
                "Failed to load tasks. Please check your connection or permissions."
            }
            BoardError::AddFailed => "Failed to add the task.",
            BoardError::UpdateFailed => "Failed to update the task.",
            BoardError::DeleteFailed => "Failed to delete the task.",
        }
    }

    /// Whether the application cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(self, BoardError::Initialization(_))
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for BoardError {}
