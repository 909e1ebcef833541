use crate::model::{FieldList, FieldListKind, FieldPatch};
use crate::services::form_state::FormStore;

/// Applies synchronization results to one field list of the store while
/// carrying `description` and `acceptedValues` forward.
pub struct FieldReconciler<'a, S: FormStore + ?Sized> {
    store: &'a mut S,
    kind: FieldListKind,
    changes: usize,
}

impl<'a, S: FormStore + ?Sized> FieldReconciler<'a, S> {
    pub fn new(store: &'a mut S, kind: FieldListKind) -> Self {
        Self {
            store,
            kind,
            changes: 0,
        }
    }

    pub fn fields(&self) -> FieldList {
        self.store.fields(self.kind)
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields().iter().position(|field| field.key == key)
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.store.remove(self.kind, None);
            self.changes += 1;
        }
    }

    /// Removes every field whose key `keep` rejects.
    pub fn retain_keys(&mut self, keep: impl Fn(&str) -> bool) {
        let doomed: Vec<usize> = self
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| !keep(&field.key))
            .map(|(index, _)| index)
            .collect();
        for index in doomed.into_iter().rev() {
            self.store.remove(self.kind, Some(index));
            self.changes += 1;
        }
    }

    /// Merges `patch` onto the field at `index`, or appends a fresh field
    /// when the list is shorter. Returns whether the store was written.
    pub fn upsert_at(&mut self, index: usize, patch: &FieldPatch) -> bool {
        let next = match self.store.field(self.kind, index) {
            Some(existing) if patch.is_satisfied_by(&existing) => return false,
            Some(existing) => existing.merged(patch),
            None => patch.clone().into_field(),
        };
        self.store.update(self.kind, index, next);
        self.changes += 1;
        true
    }

    pub fn changes(&self) -> usize {
        self.changes
    }
}
