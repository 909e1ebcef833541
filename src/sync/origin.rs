use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SyncError;
use crate::model::Snapshot;

/// Which representation the user is editing, and therefore which one is
/// authoritative for the next pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOrigin {
    #[default]
    Url,
    Fields,
}

impl SyncOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncOrigin::Url => "url",
            SyncOrigin::Fields => "fields",
        }
    }
}

impl fmt::Display for SyncOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncOrigin {
    type Err = SyncError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "url" => Ok(SyncOrigin::Url),
            "fields" => Ok(SyncOrigin::Fields),
            _ => Err(SyncError::unknown_origin(raw)),
        }
    }
}

/// Pointer-driven origin flag for one field editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OriginTracker {
    origin: SyncOrigin,
}

impl OriginTracker {
    pub fn current(&self) -> SyncOrigin {
        self.origin
    }

    pub fn pointer_down(&mut self) {
        self.origin = SyncOrigin::Fields;
    }

    pub fn pointer_leave(&mut self) {
        self.origin = SyncOrigin::Url;
    }
}

/// Cycle breaker between a pass and the echo of its own write.
///
/// After a pass writes, the gate holds the state it produced. When that exact
/// state settles again no pass is started in either direction, so a
/// `fields -> url` write can never be re-read as a url edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncGate {
    #[default]
    Idle,
    Syncing {
        direction: SyncOrigin,
        produced: Snapshot,
    },
}

impl SyncGate {
    /// Decides whether a pass may run on `snapshot`. Any decision moves the
    /// gate back to idle.
    pub fn admit(&mut self, snapshot: &Snapshot) -> bool {
        let echo = matches!(&*self, SyncGate::Syncing { produced, .. } if produced == snapshot);
        *self = SyncGate::Idle;
        !echo
    }

    pub fn complete(&mut self, direction: SyncOrigin, produced: Snapshot) {
        *self = SyncGate::Syncing {
            direction,
            produced,
        };
    }

    pub fn in_flight(&self) -> Option<SyncOrigin> {
        match self {
            SyncGate::Idle => None,
            SyncGate::Syncing { direction, .. } => Some(*direction),
        }
    }
}
