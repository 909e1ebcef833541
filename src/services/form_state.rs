use crate::model::{Field, FieldList, FieldListKind, HttpToolConfig, Snapshot};

/// Flags accompanying a point write, mirroring what a form owner needs to
/// decide whether to re-validate and whether the form counts as edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetValueOptions {
    pub should_validate: bool,
    pub should_dirty: bool,
}

impl SetValueOptions {
    /// A change a person reads as content.
    pub const CONTENT: SetValueOptions = SetValueOptions {
        should_validate: true,
        should_dirty: true,
    };
    /// A path rewrite: content changed, validation not needed.
    pub const PATH_REWRITE: SetValueOptions = SetValueOptions {
        should_validate: false,
        should_dirty: true,
    };
}

/// The form-state owner the synchronizers read from and write to.
///
/// Reads return owned values; a synchronization pass works on the values
/// it read and writes back through the point and field-array primitives.
pub trait FormStore {
    /// Batched read of url, query parameters and path variables.
    fn watch(&self) -> Snapshot;

    fn url(&self) -> String;

    fn fields(&self, kind: FieldListKind) -> FieldList;

    fn field(&self, kind: FieldListKind, index: usize) -> Option<Field> {
        self.fields(kind).get(index).cloned()
    }

    fn config(&self) -> HttpToolConfig;

    fn set_url(&mut self, url: &str, options: SetValueOptions);

    fn set_method(&mut self, method: &str, options: SetValueOptions);

    fn replace_config(&mut self, config: HttpToolConfig, options: SetValueOptions);

    fn append(&mut self, kind: FieldListKind, field: Field);

    /// Removes the field at `index`, or every field when `index` is `None`.
    fn remove(&mut self, kind: FieldListKind, index: Option<usize>);

    /// Replaces the field at `index`; an index past the end appends.
    fn update(&mut self, kind: FieldListKind, index: usize, field: Field);
}
