//! Typed HTTP outcomes and the messages the error boundary shows.
//!
//! The REST API signals everything through status codes. [`StatusKind`] is the
//! closed set the client reacts to, with a pure mapping to the readable suffix
//! appended to boundary messages. [`ApiError`] is what every request returns on
//! failure and [`ErrorReport`] is the final text handed to the boundary.

use std::fmt;

/// Status codes the client distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ServerError,
    Other(u16),
}

impl StatusKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => StatusKind::BadRequest,
            401 => StatusKind::Unauthorized,
            403 => StatusKind::Forbidden,
            404 => StatusKind::NotFound,
            409 => StatusKind::Conflict,
            500 => StatusKind::ServerError,
            other => StatusKind::Other(other),
        }
    }

    pub fn status(self) -> u16 {
        match self {
            StatusKind::BadRequest => 400,
            StatusKind::Unauthorized => 401,
            StatusKind::Forbidden => 403,
            StatusKind::NotFound => 404,
            StatusKind::Conflict => 409,
            StatusKind::ServerError => 500,
            StatusKind::Other(status) => status,
        }
    }

    /// Readable explanation appended to a failure message.
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            StatusKind::BadRequest => Some("Bad request"),
            StatusKind::Unauthorized => Some("You must be logged in to access this resource"),
            StatusKind::Forbidden => Some("You do not have access to edit this character"),
            StatusKind::NotFound => Some("Could not be found"),
            StatusKind::Conflict => Some("Conflicted with another value"),
            StatusKind::ServerError => Some("Server error"),
            StatusKind::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}")]
    Status { status: u16, kind: StatusKind },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    /// The request was cancelled because its owner went away.
    #[error("Request aborted")]
    Aborted,
}

impl ApiError {
    pub fn status(status: u16) -> Self {
        ApiError::Status {
            status,
            kind: StatusKind::from_status(status),
        }
    }

    pub fn kind(&self) -> Option<StatusKind> {
        match self {
            ApiError::Status { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is(&self, kind: StatusKind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }

    /// Boundary message: `context` followed by the status explanation, if any.
    pub fn report(&self, context: &str) -> ErrorReport {
        match self.kind().and_then(StatusKind::suffix) {
            Some(suffix) => ErrorReport::new(format!("{context} {suffix}")),
            None => ErrorReport::new(context),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// A message destined for the nearest error boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_kinds_and_back() {
        for status in [400, 401, 403, 404, 409, 500] {
            let kind = StatusKind::from_status(status);
            assert!(!matches!(kind, StatusKind::Other(_)));
            assert_eq!(kind.status(), status);
            assert!(kind.suffix().is_some());
        }
        assert_eq!(StatusKind::from_status(418), StatusKind::Other(418));
        assert_eq!(StatusKind::Other(418).suffix(), None);
    }

    #[test]
    fn report_appends_status_suffix() {
        let report = ApiError::status(403).report("Failed to add item");
        assert_eq!(
            report.message(),
            "Failed to add item You do not have access to edit this character"
        );
        assert_eq!(
            ApiError::status(401).report("Not logged in").to_string(),
            "Not logged in You must be logged in to access this resource"
        );
    }

    #[test]
    fn report_without_status_keeps_context() {
        assert_eq!(
            ApiError::Network("connection refused".into())
                .report("Failed to load user")
                .message(),
            "Failed to load user"
        );
        assert_eq!(
            ApiError::status(502).report("Failed to load server").message(),
            "Failed to load server"
        );
    }

    #[test]
    fn kind_checks() {
        let err = ApiError::status(409);
        assert!(err.is(StatusKind::Conflict));
        assert!(!err.is(StatusKind::NotFound));
        assert!(ApiError::Aborted.is_aborted());
        assert_eq!(ApiError::Decode("eof".into()).kind(), None);
    }
}
