use crate::constants::form_paths;
use crate::model::{Field, FieldList, FieldListKind, HttpToolConfig, Snapshot};
use crate::services::form_state::{FormStore, SetValueOptions};
use std::collections::BTreeSet;

/// In-process form state. Tracks dirty paths, validation requests and a
/// revision counter bumped on every write so observers can detect change.
#[derive(Debug, Clone, Default)]
pub struct MemoryFormStore {
    config: HttpToolConfig,
    dirty: BTreeSet<String>,
    validation_requests: u64,
    mutations: u64,
}

impl MemoryFormStore {
    pub fn new(config: HttpToolConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn revision(&self) -> u64 {
        self.mutations
    }

    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    pub fn validation_requests(&self) -> u64 {
        self.validation_requests
    }

    pub fn is_dirty(&self, path: &str) -> bool {
        self.dirty.contains(path)
    }

    pub fn dirty_paths(&self) -> Vec<String> {
        self.dirty.iter().cloned().collect()
    }

    fn record(&mut self, path: &str, options: SetValueOptions) {
        self.mutations += 1;
        if options.should_dirty {
            self.dirty.insert(path.to_string());
        }
        if options.should_validate {
            self.validation_requests += 1;
        }
    }

    fn record_field_array(&mut self, kind: FieldListKind) {
        self.record(kind.form_path(), SetValueOptions::CONTENT);
    }
}

impl FormStore for MemoryFormStore {
    fn watch(&self) -> Snapshot {
        Snapshot {
            url: self.config.url.clone(),
            query_parameters: self.config.query_parameters.clone(),
            path_variables: self.config.path_variables.clone(),
        }
    }

    fn url(&self) -> String {
        self.config.url.clone()
    }

    fn fields(&self, kind: FieldListKind) -> FieldList {
        self.config.fields(kind).clone()
    }

    fn field(&self, kind: FieldListKind, index: usize) -> Option<Field> {
        self.config.fields(kind).get(index).cloned()
    }

    fn config(&self) -> HttpToolConfig {
        self.config.clone()
    }

    fn set_url(&mut self, url: &str, options: SetValueOptions) {
        self.config.url = url.to_string();
        self.record(form_paths::URL, options);
    }

    fn set_method(&mut self, method: &str, options: SetValueOptions) {
        self.config.method = Some(method.to_string());
        self.record(form_paths::METHOD, options);
    }

    fn replace_config(&mut self, config: HttpToolConfig, options: SetValueOptions) {
        self.config = config;
        self.record("config", options);
    }

    fn append(&mut self, kind: FieldListKind, field: Field) {
        self.config.fields_mut(kind).push(field);
        self.record_field_array(kind);
    }

    fn remove(&mut self, kind: FieldListKind, index: Option<usize>) {
        let list = self.config.fields_mut(kind);
        match index {
            None => list.clear(),
            Some(index) if index < list.len() => {
                list.remove(index);
            }
            Some(_) => return,
        }
        self.record_field_array(kind);
    }

    fn update(&mut self, kind: FieldListKind, index: usize, field: Field) {
        let list = self.config.fields_mut(kind);
        if index < list.len() {
            list[index] = field;
        } else {
            list.push(field);
        }
        self.record_field_array(kind);
    }
}
