#![allow(dead_code)]

use std::time::{Duration, Instant};
use urlsync::model::{Field, FieldList, HttpToolConfig};
use urlsync::services::logger::{LogLevel, Logger};
use urlsync::stores::MemoryFormStore;

pub fn quiet_logger() -> Logger {
    Logger::with_level("test", LogLevel::Off)
}

pub fn store_with(url: &str, query: FieldList, path: FieldList) -> MemoryFormStore {
    MemoryFormStore::new(HttpToolConfig {
        url: url.to_string(),
        query_parameters: query,
        path_variables: path,
        ..Default::default()
    })
}

pub fn keys(fields: &[Field]) -> Vec<String> {
    fields.iter().map(|field| field.key.clone()).collect()
}

/// `(key, value, isUserProvided)` triples, the part of a field a url can carry.
pub fn identity(fields: &[Field]) -> Vec<(String, String, bool)> {
    fields
        .iter()
        .map(|field| {
            (
                field.key.clone(),
                field.value_str().to_string(),
                field.is_user_provided(),
            )
        })
        .collect()
}

pub fn described(key: &str, value: &str, description: &str) -> Field {
    Field {
        description: Some(description.to_string()),
        accepted_values: Some(vec!["a".to_string(), "b".to_string()]),
        ..Field::new(key, value)
    }
}

pub fn ms(start: Instant, millis: u64) -> Instant {
    start + Duration::from_millis(millis)
}
