//! Per-operation fetch status and user-visible errors.

use std::fmt;

/// Shown when a search never produced a usable response.
pub const CONNECTIVITY_MESSAGE: &str =
    "Failed to fetch movies. Please check your connection and try again.";

/// Shown when a detail lookup fails for any reason.
pub const DETAIL_FAILED_MESSAGE: &str = "Failed to fetch movie details";

/// A recoverable, user-visible failure of one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The API answered `Response: "False"`; holds its message.
    Api(String),
    /// Network error or malformed body.
    Transport,
    /// Detail lookup failed (API-reported or transport).
    Details,
}

impl SessionError {
    /// Returns the message to display.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Api(message) => message,
            Self::Transport => CONNECTIVITY_MESSAGE,
            Self::Details => DETAIL_FAILED_MESSAGE,
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SessionError {}

/// Lifecycle of one kind of request (search or detail).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing requested yet, or state was cleared.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Loaded,
    /// The latest request failed.
    Failed(SessionError),
}

impl FetchStatus {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&SessionError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        // Arrange & Act & Assert
        assert_eq!(
            SessionError::Api(String::from("Movie not found!")).message(),
            "Movie not found!"
        );
        assert_eq!(SessionError::Transport.message(), CONNECTIVITY_MESSAGE);
        assert_eq!(SessionError::Details.to_string(), DETAIL_FAILED_MESSAGE);
    }

    #[test]
    fn test_status_accessors() {
        // Arrange
        let failed = FetchStatus::Failed(SessionError::Transport);

        // Act & Assert
        assert!(FetchStatus::Loading.is_loading());
        assert!(!FetchStatus::Loaded.is_loading());
        assert_eq!(failed.error(), Some(&SessionError::Transport));
        assert_eq!(FetchStatus::Idle.error(), None);
    }
}
