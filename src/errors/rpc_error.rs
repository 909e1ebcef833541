use serde::Serialize;
use std::fmt;

use super::{SyncError, SyncErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcError {
    pub code: ErrorCode,
    pub message: String,
}

impl RpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RpcError {}

impl From<SyncError> for RpcError {
    fn from(err: SyncError) -> Self {
        let code = match err.kind {
            SyncErrorKind::InvalidParams | SyncErrorKind::NotFound | SyncErrorKind::ParseFailure => {
                ErrorCode::InvalidParams
            }
            SyncErrorKind::UnknownOrigin | SyncErrorKind::Internal => ErrorCode::InternalError,
        };
        let message = match err.hint {
            Some(hint) => format!("{} ({})", err.message, hint),
            None => err.message,
        };
        RpcError::new(code, message)
    }
}
