use serde::{Deserialize, Serialize};

use super::field::{FieldList, FieldListKind};
use crate::constants::http::{BODYLESS_METHODS, DEFAULT_METHOD, METHODS};
use crate::errors::SyncError;

/// The HTTP call configuration edited by an operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpToolConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: FieldList,
    #[serde(default)]
    pub query_parameters: FieldList,
    #[serde(default)]
    pub path_variables: FieldList,
    #[serde(default)]
    pub body: FieldList,
    #[serde(default)]
    pub with_approval: bool,
}

impl HttpToolConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn fields(&self, kind: FieldListKind) -> &FieldList {
        match kind {
            FieldListKind::PathVariables => &self.path_variables,
            FieldListKind::Headers => &self.headers,
            FieldListKind::QueryParameters => &self.query_parameters,
            FieldListKind::Body => &self.body,
        }
    }

    pub fn fields_mut(&mut self, kind: FieldListKind) -> &mut FieldList {
        match kind {
            FieldListKind::PathVariables => &mut self.path_variables,
            FieldListKind::Headers => &mut self.headers,
            FieldListKind::QueryParameters => &mut self.query_parameters,
            FieldListKind::Body => &mut self.body,
        }
    }

    pub fn method_or_default(&self) -> &str {
        self.method
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_METHOD)
    }

    /// Body parameters only apply to methods that carry a request body.
    pub fn accepts_body(&self) -> bool {
        !BODYLESS_METHODS.contains(&self.method_or_default())
    }
}

pub fn normalize_method(raw: &str) -> Result<String, SyncError> {
    let upper = raw.trim().to_uppercase();
    if METHODS.contains(&upper.as_str()) {
        return Ok(upper);
    }
    Err(
        SyncError::invalid_params(format!("Unsupported request method: {}", raw))
            .with_hint(format!("Use one of: {}.", METHODS.join(", "))),
    )
}

/// Batched view of the three values the synchronizers watch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub url: String,
    pub query_parameters: FieldList,
    pub path_variables: FieldList,
}

impl Snapshot {
    pub fn fields(&self, kind: FieldListKind) -> Option<&FieldList> {
        match kind {
            FieldListKind::QueryParameters => Some(&self.query_parameters),
            FieldListKind::PathVariables => Some(&self.path_variables),
            FieldListKind::Headers | FieldListKind::Body => None,
        }
    }
}
