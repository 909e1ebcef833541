mod common;
use common::{keys, ms, quiet_logger};

use std::time::{Duration, Instant};
use urlsync::errors::SyncErrorKind;
use urlsync::model::{Field, FieldListKind, HttpToolConfig};
use urlsync::sync::{SyncOrigin, SyncSession, SyncSettings, SyncTarget};

const QUERY: FieldListKind = FieldListKind::QueryParameters;

fn session(url: &str, query: Vec<Field>) -> SyncSession {
    let config = HttpToolConfig {
        url: url.to_string(),
        query_parameters: query,
        ..Default::default()
    };
    SyncSession::with_config(config, SyncSettings::default(), &quiet_logger())
}

#[test]
fn burst_of_url_edits_settles_once() {
    let start = Instant::now();
    let mut session = session("https://api.example.com/search", Vec::new());

    for page in 0..10u64 {
        let url = format!("https://api.example.com/search?q=rust&page={}", page);
        session.edit_url(&url, ms(start, page));
    }
    assert!(session.tick(ms(start, 58)).expect("tick").is_empty());
    let reports = session.tick(ms(start, 59)).expect("tick");

    assert!(reports.iter().any(|report| report.wrote()));
    let stats = session.stats();
    assert_eq!(stats.edits, 10);
    assert_eq!(stats.settles, 1);
    assert_eq!(stats.superseded, 9);
    let config = session.config();
    assert_eq!(keys(&config.query_parameters), vec!["q", "page"]);
    assert_eq!(config.query_parameters[1].value.as_deref(), Some("9"));
}

#[test]
fn nothing_settles_inside_the_quiet_window() {
    let start = Instant::now();
    let mut session = session("https://api.example.com", Vec::new());

    session.edit_url("https://api.example.com?a=1", start);

    assert!(session.tick(start + Duration::from_millis(49)).expect("tick").is_empty());
    assert!(session.has_pending());
    assert_eq!(session.stats().settles, 0);
}

#[test]
fn field_edit_rewrites_url_and_echo_is_refused() {
    let start = Instant::now();
    let url = "https://api.example.com/weather?units=metric";
    let mut session = session(url, vec![Field::new("units", "metric")]);

    session.pointer_down(SyncTarget::QueryParameters);
    session
        .edit_field(QUERY, 0, Field::new("units", "imperial"), start)
        .expect("edit");
    session.tick(ms(start, 50)).expect("settle");
    assert_eq!(session.config().url, "https://api.example.com/weather?units=imperial");

    assert!(session.tick(ms(start, 100)).expect("echo").is_empty());
    let stats = session.stats();
    assert_eq!(stats.settles, 1);
    assert_eq!(stats.echoes_refused, 1);
    assert!(!session.has_pending());
    assert_eq!(keys(&session.config().query_parameters), vec!["units"]);
}

#[test]
fn url_edit_with_renamed_and_new_keys_converges_in_one_settle() {
    let start = Instant::now();
    let mut session = session(
        "https://api.example.com/?x=1&y=0",
        vec![Field::new("x", "1"), Field::new("y", "0")],
    );

    session.edit_url("https://api.example.com/?y=1&z=2", start);
    session.tick(ms(start, 50)).expect("settle");
    assert!(session.tick(ms(start, 100)).expect("echo").is_empty());
    assert!(session.tick(ms(start, 200)).expect("idle").is_empty());

    let config = session.config();
    assert_eq!(config.url, "https://api.example.com/?y=1&z=2");
    assert_eq!(keys(&config.query_parameters), vec!["y", "z"]);
    assert_eq!(config.query_parameters[0].value.as_deref(), Some("1"));
    assert_eq!(session.stats().echoes_refused, 1);
    assert!(!session.has_pending());
}

#[test]
fn pointer_leave_hands_direction_back_to_url() {
    let start = Instant::now();
    let mut session = session("https://api.example.com/weather", Vec::new());

    session.pointer_down(SyncTarget::QueryParameters);
    assert_eq!(session.origin(SyncTarget::QueryParameters), SyncOrigin::Fields);
    session.pointer_leave(SyncTarget::QueryParameters);
    assert_eq!(session.origin(SyncTarget::QueryParameters), SyncOrigin::Url);

    session.edit_url("https://api.example.com/weather?units=metric&lang=en", start);
    session.flush_all(start).expect("flush");

    let fields = session.config().query_parameters;
    assert_eq!(keys(&fields), vec!["units", "lang"]);
    assert_eq!(fields[0].value.as_deref(), Some("metric"));
}

#[test]
fn same_snapshot_runs_again_when_the_origin_changed() {
    let start = Instant::now();
    let url = "https://api.example.com/?q=2";
    let mut session = session("https://api.example.com/?q=1", vec![Field::new("q", "1")]);
    session.edit_url(url, start);
    session.flush_all(start).expect("settle");
    let before = session.stats();

    session.pointer_down(SyncTarget::QueryParameters);
    session.edit_url("https://api.example.com/?q=3", ms(start, 10));
    session.edit_url(url, ms(start, 20));
    session.flush_all(ms(start, 20)).expect("settle");

    let after = session.stats();
    assert_eq!(after.settles, before.settles + 1);
    assert_eq!(after.passes, before.passes + 1);
    assert_eq!(after.skipped_unchanged, before.skipped_unchanged + 1);
    assert_eq!(after.writes, before.writes);
    assert_eq!(session.config().url, url);
}

#[test]
fn pointer_down_moves_the_other_lane_back_to_url() {
    let mut session = session("https://api.example.com", Vec::new());

    session.pointer_down(SyncTarget::PathVariables);
    session.pointer_down(SyncTarget::QueryParameters);

    assert_eq!(session.origin(SyncTarget::QueryParameters), SyncOrigin::Fields);
    assert_eq!(session.origin(SyncTarget::PathVariables), SyncOrigin::Url);
}

#[test]
fn path_edit_on_url_populates_both_lists() {
    let start = Instant::now();
    let mut session = session("https://api.example.com", Vec::new());

    session.edit_url("https://api.example.com/weather/:city?units=metric", start);
    session.flush_all(start).expect("flush");

    let config = session.config();
    assert_eq!(keys(&config.path_variables), vec!["city"]);
    assert_eq!(keys(&config.query_parameters), vec!["units"]);
    assert_eq!(session.config().url, "https://api.example.com/weather/:city?units=metric");
}

#[test]
fn appended_path_variable_is_written_to_url() {
    let start = Instant::now();
    let mut session = session("https://api.example.com/weather", Vec::new());

    session.pointer_down(SyncTarget::PathVariables);
    let index = session.append_field(FieldListKind::PathVariables, start);
    session
        .edit_field(FieldListKind::PathVariables, index, Field::user_provided("city"), start)
        .expect("edit");
    session.flush_all(start).expect("flush");

    assert_eq!(session.config().url, "https://api.example.com/weather/:city");
    assert_eq!(session.stats().settles, 1);
}

#[test]
fn user_provided_edit_drops_the_value() {
    let start = Instant::now();
    let mut session = session("https://api.example.com?city=paris", vec![Field::new("city", "paris")]);

    let field = Field {
        value: Some("london".to_string()),
        is_user_provided: Some(true),
        ..Field::new("city", "")
    };
    session.edit_field(QUERY, 0, field, start).expect("edit");

    let config = session.config();
    let stored = &config.query_parameters[0];
    assert_eq!(stored.value.as_deref(), Some(""));
    assert!(stored.is_user_provided());
}

#[test]
fn edits_at_missing_index_are_not_found() {
    let start = Instant::now();
    let mut session = session("https://api.example.com", Vec::new());

    let err = session
        .toggle_user_provided(QUERY, 3, true, start)
        .expect_err("missing");
    assert_eq!(err.kind, SyncErrorKind::NotFound);
    assert!(session.remove_field(QUERY, Some(0), start).is_err());
    assert_eq!(session.stats().edits, 0);
}

#[test]
fn sync_now_runs_a_single_pass_without_waiting() {
    let start = Instant::now();
    let mut session = session("https://api.example.com/items", vec![Field::new("limit", "5")]);

    let report = session
        .sync_now(SyncTarget::QueryParameters, SyncOrigin::Fields, start)
        .expect("sync");

    assert!(report.wrote());
    assert_eq!(session.config().url, "https://api.example.com/items?limit=5");
    assert!(session.flush_all(start).expect("echo").is_empty());
    assert_eq!(session.stats().echoes_refused, 1);
}
