use indexmap::IndexMap;

use crate::constants::limits::LOG_URL_LENGTH;
use crate::constants::sync::{MAX_RECONCILE_ROUNDS, USER_SENTINEL};
use crate::errors::{SyncError, TemplateError};
use crate::model::{FieldList, FieldListKind, FieldPatch};
use crate::services::form_state::{FormStore, SetValueOptions};
use crate::services::logger::Logger;
use crate::sync::reconcile::FieldReconciler;
use crate::sync::template::{decode_uri, encode_query, parse_template, query_map};
use crate::utils::text::clip_for_log;

fn patch_for(key: &str, value: &str) -> FieldPatch {
    if value == USER_SENTINEL {
        FieldPatch::user_provided(key)
    } else {
        FieldPatch::literal(key, value)
    }
}

/// Rebuilds the query-parameter list from the url's query string.
/// Returns the number of field-array writes.
pub fn url_to_fields<S: FormStore + ?Sized>(
    url: &str,
    fields: &FieldList,
    store: &mut S,
    logger: &Logger,
) -> usize {
    let mut reconciler = FieldReconciler::new(store, FieldListKind::QueryParameters);
    let parsed = match parse_template(url) {
        Ok(parsed) => parsed,
        Err(TemplateError::Empty) => {
            reconciler.clear();
            return reconciler.changes();
        }
        Err(err) => {
            logger.debug(
                "url not parseable, query parameters kept",
                Some(&serde_json::json!({
                    "url": clip_for_log(url, LOG_URL_LENGTH),
                    "reason": err.to_string(),
                })),
            );
            return 0;
        }
    };

    let params = query_map(&parsed);
    if params.is_empty() {
        reconciler.clear();
        return reconciler.changes();
    }

    // A positional write can land on a slot another url key still needs;
    // rounds repeat until one leaves the list untouched.
    let mut count = fields.len();
    for _ in 0..MAX_RECONCILE_ROUNDS {
        let before = reconciler.changes();
        reconcile_round(&mut reconciler, &params, count);
        if reconciler.changes() == before {
            return reconciler.changes();
        }
        count = reconciler.len();
    }
    logger.debug(
        "query parameters did not settle",
        Some(&serde_json::json!({
            "url": clip_for_log(url, LOG_URL_LENGTH),
            "rounds": MAX_RECONCILE_ROUNDS,
        })),
    );
    reconciler.changes()
}

fn reconcile_round<S: FormStore + ?Sized>(
    reconciler: &mut FieldReconciler<'_, S>,
    params: &IndexMap<String, String>,
    count: usize,
) {
    if count != params.len() {
        reconciler.retain_keys(|key| params.contains_key(key));
    }
    for (url_index, (key, value)) in params.iter().enumerate() {
        let patch = patch_for(key, value);
        let index = reconciler.position(key).unwrap_or(url_index);
        reconciler.upsert_at(index, &patch);
    }
}

fn collect_pairs(fields: &FieldList) -> IndexMap<&str, &str> {
    let mut pairs = IndexMap::new();
    for field in fields.iter().filter(|field| !field.is_blank()) {
        let value = if field.is_user_provided() {
            USER_SENTINEL
        } else {
            field.value_str()
        };
        pairs.insert(field.key.as_str(), value);
    }
    pairs
}

/// Writes the query-parameter list into the url. Returns whether the url
/// changed.
pub fn fields_to_url<S: FormStore + ?Sized>(
    fields: &FieldList,
    url: &str,
    store: &mut S,
    logger: &Logger,
) -> Result<bool, SyncError> {
    let next = match parse_template(url) {
        Ok(mut parsed) => {
            let pairs = collect_pairs(fields);
            if pairs.is_empty() {
                parsed.set_query(None);
            } else {
                parsed.set_query(Some(&encode_query(&pairs)?));
            }
            decode_uri(parsed.as_str())
        }
        Err(err) => {
            logger.debug(
                "url not parseable, building query by hand",
                Some(&serde_json::json!({"reason": err.to_string()})),
            );
            manual_query(fields)
        }
    };

    if next == url {
        return Ok(false);
    }
    store.set_url(&next, SetValueOptions::CONTENT);
    Ok(true)
}

/// `?k=v&k=v` from the fields alone, for urls the parser rejects.
pub fn manual_query(fields: &FieldList) -> String {
    let mut out = String::new();
    for field in fields.iter().filter(|field| !field.is_blank()) {
        out.push(if out.is_empty() { '?' } else { '&' });
        out.push_str(&field.key);
        out.push('=');
        out.push_str(if field.is_user_provided() {
            USER_SENTINEL
        } else {
            field.value_str()
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    #[test]
    fn manual_query_skips_blank_fields_without_leading_ampersand() {
        let fields = vec![
            Field::new("empty", ""),
            Field::new("q", "x"),
            Field::user_provided("city"),
        ];
        assert_eq!(manual_query(&fields), "?q=x&city={user}");
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let fields = vec![Field::new("a", "1"), Field::new("b", "2"), Field::new("a", "3")];
        let pairs = collect_pairs(&fields);
        assert_eq!(pairs.get("a"), Some(&"3"));
        assert_eq!(pairs.get_index(0).map(|(k, _)| *k), Some("a"));
    }
}
