use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status the cloud backend reports for a missing object.
pub const REMOTE_NOT_FOUND_STATUS: u16 = 612;

/// Errors raised by the accessors behind the router.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote object not found: {key}")]
    RemoteNotFound { key: String },

    #[error("remote error: {0}")]
    Remote(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl SyncError {
    /// Protocol code carried by dialogs raised from this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SyncError::RemoteNotFound { .. } => ErrorCode::RemoteNotFound,
            SyncError::Parse(_) => ErrorCode::ParseError,
            SyncError::Remote(_) | SyncError::Settings(_) | SyncError::Io(_) => {
                ErrorCode::RemoteError
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::RemoteNotFound { .. })
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

/// Machine-readable failure class sent alongside error dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    RemoteNotFound,
    RemoteError,
    ParseError,
}

impl ErrorCode {
    /// Backend status equivalent, where one exists.
    pub fn status(self) -> Option<u16> {
        match self {
            ErrorCode::RemoteNotFound => Some(REMOTE_NOT_FOUND_STATUS),
            ErrorCode::RemoteError | ErrorCode::ParseError => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let not_found = SyncError::RemoteNotFound {
            key: "notes/a.md".to_string(),
        };
        assert_eq!(not_found.code(), ErrorCode::RemoteNotFound);
        assert_eq!(not_found.code().status(), Some(612));
        assert!(not_found.is_not_found());

        assert_eq!(SyncError::Parse("bad".into()).code(), ErrorCode::ParseError);
        assert_eq!(SyncError::Remote("boom".into()).code(), ErrorCode::RemoteError);
        assert_eq!(SyncError::Io("disk".into()).code(), ErrorCode::RemoteError);
        assert_eq!(ErrorCode::RemoteError.status(), None);
    }

    #[test]
    fn test_error_code_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::RemoteNotFound).unwrap(),
            "\"remote_not_found\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::ParseError).unwrap(),
            "\"parse_error\""
        );
    }
}
