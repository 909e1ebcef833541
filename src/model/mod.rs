mod config;
mod field;

pub use config::{normalize_method, HttpToolConfig, Snapshot};
pub use field::{Field, FieldList, FieldListKind, FieldPatch};
