//! Result type shared by every write operation.
//!
//! All mutations are confirm-then-update: local state changes only after the
//! backend accepts the request, and the server's answer is what gets stored.
//! On failure the caller gets the untouched snapshot back.

use bookstore_api::Error as ApiError;

#[derive(Debug)]
pub enum MutationOutcome<T> {
    /// The backend accepted the change; `T` is the state after it.
    Applied(T),
    /// The backend refused or could not be reached; `reverted` is the state
    /// as it was before the attempt.
    Failed { error: ApiError, reverted: T },
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }

    /// Local state after the attempt, whichever way it went.
    pub fn state(&self) -> &T {
        match self {
            MutationOutcome::Applied(state) => state,
            MutationOutcome::Failed { reverted, .. } => reverted,
        }
    }

    pub fn into_state(self) -> T {
        match self {
            MutationOutcome::Applied(state) => state,
            MutationOutcome::Failed { reverted, .. } => reverted,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            MutationOutcome::Applied(_) => None,
            MutationOutcome::Failed { error, .. } => Some(error),
        }
    }

    /// Message for the administrator when the mutation failed.
    pub fn failure_message(&self, fallback: &str) -> Option<String> {
        self.error().map(|e| user_message(e, fallback))
    }
}

/// Backend message if it sent one, otherwise `fallback`.
pub fn user_message(error: &ApiError, fallback: &str) -> String {
    error
        .server_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
