//! Identity service fault kinds.
//!
//! # Invariants
//! - `ErrorKind::code()` strings are the service's wire error codes and must
//!   not change.
//! - Faults are surfaced to callers unchanged; nothing here retries.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Remote fault enumeration of the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    NotAuthorized,
    ResourceConflict,
    ResourceNotFound,
    TooManyRequests,
    InternalError,
    LimitExceeded,
    InvalidIdentityPoolConfiguration,
    ExternalService,
    DeveloperUserAlreadyRegistered,
    ConcurrentModification,
}

const ALL_ERROR_KINDS: &[ErrorKind] = &[
    ErrorKind::InvalidParameter,
    ErrorKind::NotAuthorized,
    ErrorKind::ResourceConflict,
    ErrorKind::ResourceNotFound,
    ErrorKind::TooManyRequests,
    ErrorKind::InternalError,
    ErrorKind::LimitExceeded,
    ErrorKind::InvalidIdentityPoolConfiguration,
    ErrorKind::ExternalService,
    ErrorKind::DeveloperUserAlreadyRegistered,
    ErrorKind::ConcurrentModification,
];

impl ErrorKind {
    pub fn all() -> &'static [ErrorKind] {
        ALL_ERROR_KINDS
    }

    /// Wire error code.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidParameter => "InvalidParameterException",
            Self::NotAuthorized => "NotAuthorizedException",
            Self::ResourceConflict => "ResourceConflictException",
            Self::ResourceNotFound => "ResourceNotFoundException",
            Self::TooManyRequests => "TooManyRequestsException",
            Self::InternalError => "InternalErrorException",
            Self::LimitExceeded => "LimitExceededException",
            Self::InvalidIdentityPoolConfiguration => "InvalidIdentityPoolConfigurationException",
            Self::ExternalService => "ExternalServiceException",
            Self::DeveloperUserAlreadyRegistered => "DeveloperUserAlreadyRegisteredException",
            Self::ConcurrentModification => "ConcurrentModificationException",
        }
    }

    /// Parses a wire error code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.code() == code.trim())
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::InvalidParameter => "missing or bad input parameter(s)",
            Self::NotAuthorized => "not authorized to access the requested resource",
            Self::ResourceConflict => "login is already linked to another account",
            Self::ResourceNotFound => "requested resource does not exist",
            Self::TooManyRequests => "request was throttled",
            Self::InternalError => "service encountered an error processing the request",
            Self::LimitExceeded => "total number of identity pools exceeded a preset limit",
            Self::InvalidIdentityPoolConfiguration => {
                "identity pool has no role associated for the given auth type"
            }
            Self::ExternalService => "a dependent login provider is not responding",
            Self::DeveloperUserAlreadyRegistered => {
                "developer user identifier is registered under a different identity"
            }
            Self::ConcurrentModification => "parallel requests modified the same resource",
        }
    }

    /// Informational: whether callers may reasonably retry this fault.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::TooManyRequests | Self::InternalError)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A fault returned by an identity service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CognitoIdentityError {
    kind: ErrorKind,
    message: String,
}

impl CognitoIdentityError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, message)
    }

    pub(crate) fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthorized, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceNotFound, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceConflict, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }
}

impl Display for CognitoIdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

impl Error for CognitoIdentityError {}

/// Result type of identity service operations.
pub type CognitoResult<T> = Result<T, CognitoIdentityError>;

#[cfg(test)]
mod tests {
    use super::{CognitoIdentityError, ErrorKind};

    #[test]
    fn codes_round_trip() {
        for kind in ErrorKind::all() {
            assert_eq!(ErrorKind::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(ErrorKind::from_code("ValidationError"), None);
    }

    #[test]
    fn display_prefixes_wire_code() {
        let err = CognitoIdentityError::new(ErrorKind::TooManyRequests, "slow down");
        assert_eq!(err.to_string(), "TooManyRequestsException: slow down");
        assert!(err.kind().is_retryable());
        assert!(!ErrorKind::NotAuthorized.is_retryable());
    }
}
