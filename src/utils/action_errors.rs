use crate::constants::limits::MAX_SUGGESTIONS;
use crate::errors::SyncError;
use crate::utils::suggest::suggest;
use serde_json::Value;

pub fn unknown_action_error(scope: &str, action: Option<&Value>, known_actions: &[&str]) -> SyncError {
    let action_value = action.and_then(Value::as_str).unwrap_or("").to_string();
    let suggestions = suggest(&action_value, known_actions, MAX_SUGGESTIONS);

    let mut hint = String::new();
    if !suggestions.is_empty() {
        hint.push_str(&format!("Did you mean: {}? ", suggestions.join(", ")));
    }
    hint.push_str(&format!("Use one of: {}.", known_actions.join(", ")));

    SyncError::invalid_params(format!("Unknown {} action: {}", scope, action_value))
        .with_hint(hint)
        .with_details(serde_json::json!({
            "known_actions": known_actions,
            "did_you_mean": suggestions,
        }))
}

pub fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, SyncError> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::invalid_params(format!("{} must be a string", name)))
}

pub fn optional_index(args: &Value, name: &str) -> Result<Option<usize>, SyncError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|index| Some(index as usize))
            .ok_or_else(|| SyncError::invalid_params(format!("{} must be a non-negative integer", name))),
    }
}
