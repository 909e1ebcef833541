//! URL ⇄ structured-fields synchronization.
//!
//! A pass reads one settled [`Snapshot`], picks a direction from the
//! editor's [`SyncOrigin`] and writes only the opposite representation.

pub mod debounce;
pub mod origin;
pub mod path_vars;
pub mod query;
pub mod reconcile;
pub mod segments;
pub mod session;
pub mod template;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::SyncError;
use crate::model::{FieldListKind, Snapshot};
use crate::services::form_state::FormStore;
use crate::services::logger::Logger;

pub use debounce::Debouncer;
pub use origin::{OriginTracker, SyncGate, SyncOrigin};
pub use session::{SessionStats, SyncSession, SyncSettings};

/// Field lists that mirror part of the url.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncTarget {
    QueryParameters,
    PathVariables,
}

impl SyncTarget {
    pub const ALL: [SyncTarget; 2] = [SyncTarget::QueryParameters, SyncTarget::PathVariables];

    pub fn kind(self) -> FieldListKind {
        match self {
            SyncTarget::QueryParameters => FieldListKind::QueryParameters,
            SyncTarget::PathVariables => FieldListKind::PathVariables,
        }
    }
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().as_str())
    }
}

impl FromStr for SyncTarget {
    type Err = SyncError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.parse::<FieldListKind>()? {
            FieldListKind::QueryParameters => Ok(SyncTarget::QueryParameters),
            FieldListKind::PathVariables => Ok(SyncTarget::PathVariables),
            other => Err(SyncError::invalid_params(format!(
                "{} is not synchronized with the url",
                other
            ))
            .with_hint("target must be queryParameters or pathVariables")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub target: SyncTarget,
    pub direction: SyncOrigin,
    pub changes: usize,
}

impl PassReport {
    pub fn wrote(&self) -> bool {
        self.changes > 0
    }
}

/// Runs one synchronization pass for `target` over `snapshot`.
pub fn run_pass<S: FormStore + ?Sized>(
    target: SyncTarget,
    direction: SyncOrigin,
    snapshot: &Snapshot,
    store: &mut S,
    logger: &Logger,
) -> Result<PassReport, SyncError> {
    let changes = match (target, direction) {
        (SyncTarget::QueryParameters, SyncOrigin::Url) => {
            query::url_to_fields(&snapshot.url, &snapshot.query_parameters, store, logger)
        }
        (SyncTarget::QueryParameters, SyncOrigin::Fields) => {
            usize::from(query::fields_to_url(&snapshot.query_parameters, &snapshot.url, store, logger)?)
        }
        (SyncTarget::PathVariables, SyncOrigin::Url) => path_vars::url_to_fields(&snapshot.url, store),
        (SyncTarget::PathVariables, SyncOrigin::Fields) => {
            usize::from(path_vars::fields_to_url(&snapshot.path_variables, &snapshot.url, store, logger))
        }
    };
    Ok(PassReport {
        target,
        direction,
        changes,
    })
}
