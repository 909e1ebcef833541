use crate::constants::limits::LOG_URL_LENGTH;
use crate::constants::sync::PATH_VARIABLE_PREFIX;
use crate::model::{FieldList, FieldListKind, FieldPatch};
use crate::services::form_state::{FormStore, SetValueOptions};
use crate::services::logger::Logger;
use crate::sync::reconcile::FieldReconciler;
use crate::sync::segments::path_variable_names;
use crate::sync::template::{authority_prefix, parse_template};
use crate::utils::text::clip_for_log;

/// Rebuilds the path-variable list from the url's `:name` segments.
/// Returns the number of field-array writes.
pub fn url_to_fields<S: FormStore + ?Sized>(url: &str, store: &mut S) -> usize {
    let names = path_variable_names(url);
    let mut reconciler = FieldReconciler::new(store, FieldListKind::PathVariables);
    if names.is_empty() {
        reconciler.clear();
        return reconciler.changes();
    }

    // Only prune when the count moved; a same-size rename is handled by the
    // positional overwrite below.
    if names.len() != reconciler.len() {
        reconciler.retain_keys(|key| names.iter().any(|name| name == key));
    }

    for (index, name) in names.iter().enumerate() {
        reconciler.upsert_at(index, &FieldPatch::path_variable(name.as_str()));
    }
    reconciler.changes()
}

fn variable_suffix(fields: &FieldList, skip_empty: bool) -> String {
    let mut out = String::new();
    for field in fields {
        if skip_empty && field.key.is_empty() {
            continue;
        }
        out.push('/');
        out.push(PATH_VARIABLE_PREFIX);
        out.push_str(&field.key);
    }
    out
}

/// Rewrites the url path from the path-variable list. Returns whether the
/// url changed.
pub fn fields_to_url<S: FormStore + ?Sized>(
    fields: &FieldList,
    url: &str,
    store: &mut S,
    logger: &Logger,
) -> bool {
    let next = match parse_template(url) {
        Ok(parsed) => {
            let trimmed = parsed.path().trim_end_matches('/');
            let literal_path = trimmed
                .split('/')
                .filter(|segment| !segment.starts_with(PATH_VARIABLE_PREFIX))
                .collect::<Vec<_>>()
                .join("/");
            let mut next = format!("{}{}", authority_prefix(&parsed), literal_path);
            if fields.is_empty() {
                logger.debug(
                    "path variables cleared, keeping base path",
                    Some(&serde_json::json!({"url": clip_for_log(url, LOG_URL_LENGTH)})),
                );
            } else {
                next.push_str(&variable_suffix(fields, true));
            }
            if let Some(query) = parsed.query().filter(|query| !query.is_empty()) {
                next.push('?');
                next.push_str(query);
            }
            next
        }
        Err(err) => {
            logger.debug(
                "url not parseable, path rebuilt from variables only",
                Some(&serde_json::json!({"reason": err.to_string()})),
            );
            variable_suffix(fields, false)
        }
    };

    if next == url {
        return false;
    }
    store.set_url(&next, SetValueOptions::PATH_REWRITE);
    true
}
