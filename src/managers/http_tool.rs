use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;

use crate::errors::SyncError;
use crate::model::{FieldListKind, HttpToolConfig};
use crate::services::logger::Logger;
use crate::services::templates::{builtin_templates, find_template};
use crate::sync::{PassReport, SyncOrigin, SyncSession, SyncSettings, SyncTarget};
use crate::utils::action_errors::{optional_index, required_str, unknown_action_error};

const SESSION_ACTIONS: &[&str] = &[
    "get",
    "set_url",
    "set_field",
    "append_field",
    "remove_field",
    "toggle_user_provided",
    "pointer_down",
    "pointer_leave",
    "settle",
    "sync",
    "set_method",
    "set_name",
    "set_description",
    "set_approval",
    "apply_template",
    "list_templates",
    "stats",
];

/// Partial field edit; absent attributes keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldUpdate {
    key: Option<String>,
    value: Option<String>,
    is_user_provided: Option<bool>,
    description: Option<String>,
    accepted_values: Option<Vec<String>>,
}

fn list_arg(args: &Value) -> Result<FieldListKind, SyncError> {
    required_str(args, "list")?.parse()
}

fn target_arg(args: &Value) -> Result<SyncTarget, SyncError> {
    required_str(args, "target")?.parse()
}

fn required_index(args: &Value) -> Result<usize, SyncError> {
    optional_index(args, "index")?.ok_or_else(|| SyncError::invalid_params("index is required"))
}

fn required_bool(args: &Value, name: &str) -> Result<bool, SyncError> {
    args.get(name)
        .and_then(Value::as_bool)
        .ok_or_else(|| SyncError::invalid_params(format!("{} must be a boolean", name)))
}

/// JSON action surface over one [`SyncSession`].
pub struct HttpToolManager {
    logger: Logger,
    session: SyncSession,
}

impl HttpToolManager {
    pub fn new(logger: Logger, settings: SyncSettings, config: HttpToolConfig) -> Self {
        let logger = logger.child("http_tool");
        let mut session = SyncSession::with_config(config, settings, &logger);
        session.ensure_method();
        Self { logger, session }
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    pub fn tick(&mut self, now: Instant) -> Result<Vec<PassReport>, SyncError> {
        self.session.tick(now)
    }

    pub fn settle_all(&mut self, now: Instant) -> Result<Vec<PassReport>, SyncError> {
        self.session.flush_all(now)
    }

    /// Replaces the whole configuration, e.g. one loaded by the host.
    pub fn load(&mut self, config: HttpToolConfig, now: Instant) {
        self.session.replace_config(config, now);
        self.session.ensure_method();
    }

    pub fn handle_action(&mut self, args: Value) -> Result<Value, SyncError> {
        self.handle_action_at(args, Instant::now())
    }

    pub fn handle_action_at(&mut self, args: Value, now: Instant) -> Result<Value, SyncError> {
        let action = args.get("action");
        self.logger.debug("handle_action", action);
        match action.and_then(Value::as_str).unwrap_or("") {
            "get" => Ok(self.state()),
            "set_url" => {
                let url = required_str(&args, "url")?;
                self.session.edit_url(url, now);
                Ok(self.state())
            }
            "set_field" => {
                let kind = list_arg(&args)?;
                let index = required_index(&args)?;
                let update: FieldUpdate = match args.get("field") {
                    Some(raw) if !raw.is_null() => serde_json::from_value(raw.clone())?,
                    _ => FieldUpdate::default(),
                };
                let mut field = self
                    .session
                    .config()
                    .fields(kind)
                    .get(index)
                    .cloned()
                    .ok_or_else(|| {
                        SyncError::not_found(format!("No field at {}.{}", kind.form_path(), index))
                    })?;
                if let Some(key) = update.key {
                    field.key = key;
                }
                if let Some(value) = update.value {
                    field.value = Some(value);
                }
                if let Some(flag) = update.is_user_provided {
                    field.is_user_provided = Some(flag);
                }
                if let Some(description) = update.description {
                    field.description = Some(description);
                }
                if let Some(accepted) = update.accepted_values {
                    field.accepted_values = Some(accepted);
                }
                self.session.edit_field(kind, index, field, now)?;
                Ok(self.state())
            }
            "append_field" => {
                let kind = list_arg(&args)?;
                let index = self.session.append_field(kind, now);
                Ok(serde_json::json!({"index": index, "state": self.state()}))
            }
            "remove_field" => {
                let kind = list_arg(&args)?;
                let index = optional_index(&args, "index")?;
                self.session.remove_field(kind, index, now)?;
                Ok(self.state())
            }
            "toggle_user_provided" => {
                let kind = list_arg(&args)?;
                let index = required_index(&args)?;
                let flag = required_bool(&args, "isUserProvided")?;
                let field = self.session.toggle_user_provided(kind, index, flag, now)?;
                Ok(serde_json::json!({"field": field, "state": self.state()}))
            }
            "pointer_down" => {
                let target = target_arg(&args)?;
                self.session.pointer_down(target);
                Ok(self.state())
            }
            "pointer_leave" => {
                let target = target_arg(&args)?;
                self.session.pointer_leave(target);
                Ok(self.state())
            }
            "settle" => {
                let reports = self.session.flush_all(now)?;
                Ok(serde_json::json!({"reports": reports, "state": self.state()}))
            }
            "sync" => {
                let target = target_arg(&args)?;
                let origin: SyncOrigin = required_str(&args, "origin")?.parse()?;
                let report = self.session.sync_now(target, origin, now)?;
                Ok(serde_json::json!({"report": report, "state": self.state()}))
            }
            "set_method" => {
                let method = self.session.set_method(required_str(&args, "method")?, now)?;
                Ok(serde_json::json!({"method": method, "state": self.state()}))
            }
            "set_name" => {
                let name = required_str(&args, "name")?.to_string();
                self.session.update_details(|config| config.name = name, now);
                Ok(self.state())
            }
            "set_description" => {
                let description = required_str(&args, "description")?.to_string();
                self.session
                    .update_details(|config| config.description = description, now);
                Ok(self.state())
            }
            "set_approval" => {
                let flag = required_bool(&args, "withApproval")?;
                self.session
                    .update_details(|config| config.with_approval = flag, now);
                Ok(self.state())
            }
            "apply_template" => {
                let template = find_template(required_str(&args, "name")?)?;
                self.logger.info(
                    "template applied",
                    Some(&serde_json::json!({"template": template.name})),
                );
                self.session.replace_config(template.config(), now);
                Ok(self.state())
            }
            "list_templates" => Ok(serde_json::json!({"templates": builtin_templates()})),
            "stats" => Ok(serde_json::json!({
                "session": self.session.stats(),
                "log": self.logger.stats(),
            })),
            _ => Err(unknown_action_error("session", action, SESSION_ACTIONS)),
        }
    }

    pub fn state(&self) -> Value {
        let config = self.session.config();
        serde_json::json!({
            "sessionId": self.session.id(),
            "bodyActive": config.accepts_body(),
            "origins": {
                "queryParameters": self.session.origin(SyncTarget::QueryParameters),
                "pathVariables": self.session.origin(SyncTarget::PathVariables),
            },
            "pending": self.session.has_pending(),
            "config": config,
        })
    }
}
