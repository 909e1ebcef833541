use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

use super::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncErrorKind {
    ParseFailure,
    UnknownOrigin,
    InvalidParams,
    NotFound,
    Internal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncError {
    pub kind: SyncErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl SyncError {
    pub fn new(kind: SyncErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn parse_failure(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::ParseFailure, "PARSE_FAILURE", message)
    }

    /// A direction outside `url | fields` reached a synchronizer. This is a
    /// programming defect; the pass that sees it is aborted.
    pub fn unknown_origin(origin: &str) -> Self {
        Self::new(
            SyncErrorKind::UnknownOrigin,
            "UNKNOWN_ORIGIN",
            format!("Unknown origin: {}", origin),
        )
        .with_hint("origin must be one of: url, fields")
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::NotFound, "NOT_FOUND", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SyncErrorKind::Internal, "INTERNAL", message)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, SyncErrorKind::UnknownOrigin | SyncErrorKind::Internal)
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for SyncError {}

impl From<TemplateError> for SyncError {
    fn from(err: TemplateError) -> Self {
        SyncError::parse_failure(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::invalid_params(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::internal(err.to_string())
    }
}
