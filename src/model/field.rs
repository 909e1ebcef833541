use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::form_paths;
use crate::errors::SyncError;

/// One entry of a structured parameter list. `key` is its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_user_provided: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_values: Option<Vec<String>>,
}

pub type FieldList = Vec<Field>;

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            is_user_provided: Some(false),
            ..Default::default()
        }
    }

    pub fn user_provided(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(String::new()),
            is_user_provided: Some(true),
            ..Default::default()
        }
    }

    pub fn is_user_provided(&self) -> bool {
        self.is_user_provided.unwrap_or(false)
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Neither user-provided nor carrying a value; such fields are left out of urls.
    pub fn is_blank(&self) -> bool {
        !self.is_user_provided() && self.value_str().is_empty()
    }

    /// Applies `patch` on top of this record. Metadata the patch does not
    /// name (`description`, `acceptedValues`) is kept.
    pub fn merged(&self, patch: &FieldPatch) -> Field {
        let mut next = self.clone();
        next.key = patch.key.clone();
        if let Some(value) = &patch.value {
            next.value = Some(value.clone());
        }
        if let Some(flag) = patch.is_user_provided {
            next.is_user_provided = Some(flag);
        }
        next
    }
}

/// The identity part of a field written by a synchronization pass.
/// `None` leaves the corresponding attribute of an existing record alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPatch {
    pub key: String,
    pub value: Option<String>,
    pub is_user_provided: Option<bool>,
}

impl FieldPatch {
    pub fn literal(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            is_user_provided: Some(false),
        }
    }

    pub fn user_provided(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(String::new()),
            is_user_provided: Some(true),
        }
    }

    /// Path variables: key and user-provided flag only, value untouched.
    pub fn path_variable(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            is_user_provided: Some(true),
        }
    }

    pub fn into_field(self) -> Field {
        Field::default().merged(&self)
    }

    /// True when applying the patch to `field` would not change it.
    pub fn is_satisfied_by(&self, field: &Field) -> bool {
        field.key == self.key
            && self
                .value
                .as_ref()
                .map_or(true, |value| field.value.as_ref() == Some(value))
            && self
                .is_user_provided
                .map_or(true, |flag| field.is_user_provided == Some(flag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldListKind {
    PathVariables,
    Headers,
    QueryParameters,
    Body,
}

impl FieldListKind {
    pub const ALL: [FieldListKind; 4] = [
        FieldListKind::PathVariables,
        FieldListKind::Headers,
        FieldListKind::QueryParameters,
        FieldListKind::Body,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldListKind::PathVariables => "pathVariables",
            FieldListKind::Headers => "headers",
            FieldListKind::QueryParameters => "queryParameters",
            FieldListKind::Body => "body",
        }
    }

    pub fn form_path(self) -> &'static str {
        match self {
            FieldListKind::PathVariables => form_paths::PATH_VARIABLES,
            FieldListKind::Headers => form_paths::HEADERS,
            FieldListKind::QueryParameters => form_paths::QUERY_PARAMETERS,
            FieldListKind::Body => form_paths::BODY,
        }
    }

    /// Lists whose entries are always filled in by the caller.
    pub fn is_user_only(self) -> bool {
        matches!(self, FieldListKind::PathVariables)
    }
}

impl fmt::Display for FieldListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldListKind {
    type Err = SyncError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let name = trimmed.strip_prefix("config.").unwrap_or(trimmed);
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "pathvariables" | "path" => Ok(FieldListKind::PathVariables),
            "headers" => Ok(FieldListKind::Headers),
            "queryparameters" | "query" => Ok(FieldListKind::QueryParameters),
            "body" => Ok(FieldListKind::Body),
            _ => Err(SyncError::invalid_params(format!("Unknown field list: {}", raw))
                .with_hint("list must be one of: pathVariables, headers, queryParameters, body")),
        }
    }
}
