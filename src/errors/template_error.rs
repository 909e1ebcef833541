use thiserror::Error;

/// Why a url string could not be read as an absolute URL template.
///
/// Every variant is a transient editing state, never a user-facing failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("url is empty")]
    Empty,
    #[error("url is not absolute: {0}")]
    Malformed(#[from] url::ParseError),
    #[error("url has no hierarchical path: {0}")]
    Opaque(String),
}
