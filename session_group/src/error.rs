//! Error types for the `session_group` crate.
//!
//! Follows the same layering as the other workspace crates: a root `Error`
//! struct holding an `ErrorKind` plus an optional source for chaining.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for group and session operations.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors surfaced by groups, the group manager and sessions.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// A mutation or delivery was attempted on a group after `close`.
    GroupClosed,
    /// `add` was called with a session id that is already a member.
    DuplicateSession,
    /// No member carries the requested user id.
    MemberNotFound,
    /// The manager holds no group under the requested name.
    GroupNotFound,
    /// The manager already holds a group under the requested name.
    DuplicateGroup,
    /// A session failed to accept a pushed message.
    Push(PushErrorKind),
}

/// Reasons a single session push can fail.
#[derive(Debug, PartialEq)]
pub enum PushErrorKind {
    /// The receiving half of the session's channel is gone.
    Disconnected,
    /// The session was closed locally.
    Closed,
}

impl Error {
    pub fn group_closed() -> Self {
        Self::from(ErrorKind::GroupClosed)
    }

    pub fn duplicate_session() -> Self {
        Self::from(ErrorKind::DuplicateSession)
    }

    pub fn member_not_found() -> Self {
        Self::from(ErrorKind::MemberNotFound)
    }

    pub fn is_group_closed(&self) -> bool {
        self.error_kind == ErrorKind::GroupClosed
    }
}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::GroupClosed => write!(f, "group is closed"),
            ErrorKind::DuplicateSession => write!(f, "session is already a group member"),
            ErrorKind::MemberNotFound => write!(f, "group member not found"),
            ErrorKind::GroupNotFound => write!(f, "group not found"),
            ErrorKind::DuplicateGroup => write!(f, "group already exists"),
            ErrorKind::Push(kind) => write!(f, "push error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Helper function to create push errors.
pub fn push_error(kind: PushErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Push(kind),
    }
}

/// Helper function to create manager lookup errors.
pub fn manager_error(kind: ErrorKind, group_name: &str) -> Error {
    Error {
        source: Some(format!("group [{group_name}]").into()),
        error_kind: kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failure() {
        assert_eq!(Error::group_closed().to_string(), "group is closed");
        assert_eq!(
            push_error(PushErrorKind::Disconnected, "receiver dropped").to_string(),
            "push error: Disconnected"
        );
    }

    #[test]
    fn test_push_error_keeps_message_as_source() {
        let err = push_error(PushErrorKind::Closed, "session 42 closed");
        let source = StdError::source(&err).expect("source should be set");
        assert_eq!(source.to_string(), "session 42 closed");
    }

    #[test]
    fn test_kind_constructors_have_no_source() {
        let err = Error::member_not_found();
        assert_eq!(err.error_kind, ErrorKind::MemberNotFound);
        assert!(StdError::source(&err).is_none());
        assert!(!err.is_group_closed());
        assert!(Error::group_closed().is_group_closed());
    }
}
