use serde::Serialize;

use crate::constants::http::DEFAULT_METHOD;
use crate::constants::limits::MAX_SUGGESTIONS;
use crate::errors::SyncError;
use crate::model::HttpToolConfig;
use crate::utils::suggest::suggest;

/// A ready-made configuration an operator can start from.
#[derive(Debug, Clone, Serialize)]
pub struct ToolTemplate {
    pub name: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    #[serde(skip)]
    build: fn() -> HttpToolConfig,
}

impl ToolTemplate {
    pub fn config(&self) -> HttpToolConfig {
        (self.build)()
    }
}

fn random_cat_image() -> HttpToolConfig {
    HttpToolConfig {
        name: "Random Cat Image".to_string(),
        description: "Useful for getting a random cat image".to_string(),
        url: "https://api.thecatapi.com/v1/images/search".to_string(),
        method: Some(DEFAULT_METHOD.to_string()),
        ..Default::default()
    }
}

pub fn builtin_templates() -> Vec<ToolTemplate> {
    vec![ToolTemplate {
        name: "random-cat-image",
        title: "Random Cat Picture",
        summary: "Ask your agent to fetch a random cat picture from thecatapi.com",
        build: random_cat_image,
    }]
}

pub fn find_template(name: &str) -> Result<ToolTemplate, SyncError> {
    let templates = builtin_templates();
    let wanted = name.trim().to_lowercase();
    if let Some(found) = templates.iter().find(|template| template.name == wanted) {
        return Ok(found.clone());
    }
    let known: Vec<&str> = templates.iter().map(|template| template.name).collect();
    let suggestions = suggest(name, &known, MAX_SUGGESTIONS);
    let mut err = SyncError::not_found(format!("Unknown template: {}", name))
        .with_details(serde_json::json!({ "known_templates": known }));
    if !suggestions.is_empty() {
        err = err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    Err(err)
}
