use serde::Serialize;
use std::time::{Duration, Instant};

use crate::constants::env;
use crate::constants::sync::{DEBOUNCE_MS, MAX_SETTLE_ROUNDS};
use crate::errors::SyncError;
use crate::model::{normalize_method, Field, FieldListKind, HttpToolConfig, Snapshot};
use crate::services::form_state::{FormStore, SetValueOptions};
use crate::services::logger::Logger;
use crate::stores::MemoryFormStore;
use crate::sync::debounce::Debouncer;
use crate::sync::origin::{OriginTracker, SyncGate, SyncOrigin};
use crate::sync::{run_pass, PassReport, SyncTarget};
use crate::utils::env::env_u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub debounce: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
        }
    }
}

impl SyncSettings {
    pub fn from_env() -> Self {
        Self {
            debounce: Duration::from_millis(env_u64(env::DEBOUNCE_MS, DEBOUNCE_MS)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub edits: u64,
    pub settles: u64,
    pub passes: u64,
    pub writes: u64,
    pub skipped_unchanged: u64,
    pub echoes_refused: u64,
    pub superseded: u64,
}

#[derive(Debug, Default)]
struct Lane {
    tracker: OriginTracker,
    /// Snapshot and direction of the last pass; both must match to skip.
    last_settled: Option<(Snapshot, SyncOrigin)>,
}

impl Lane {
    fn settled(&mut self, snapshot: Snapshot) {
        self.last_settled = Some((snapshot, self.tracker.current()));
    }

    fn is_settled(&self, snapshot: &Snapshot) -> bool {
        matches!(
            &self.last_settled,
            Some((settled, origin)) if settled == snapshot && *origin == self.tracker.current()
        )
    }
}

/// One operator editing one HTTP tool configuration.
///
/// Edits go to the store immediately and are observed as snapshots; passes
/// run only when a snapshot settles (`tick` past the deadline, or `flush`).
pub struct SyncSession<S: FormStore = MemoryFormStore> {
    id: String,
    logger: Logger,
    store: S,
    debouncer: Debouncer<Snapshot>,
    query: Lane,
    path: Lane,
    gate: SyncGate,
    observed: Snapshot,
    stats: SessionStats,
}

impl SyncSession<MemoryFormStore> {
    pub fn with_config(config: HttpToolConfig, settings: SyncSettings, logger: &Logger) -> Self {
        Self::new(MemoryFormStore::new(config), settings, logger)
    }
}

impl<S: FormStore> SyncSession<S> {
    pub fn new(store: S, settings: SyncSettings, logger: &Logger) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let observed = store.watch();
        Self {
            logger: logger.child(&format!("session:{}", &id[..8])),
            id,
            store,
            debouncer: Debouncer::new(settings.debounce),
            query: Lane::default(),
            path: Lane::default(),
            gate: SyncGate::default(),
            observed,
            stats: SessionStats::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> HttpToolConfig {
        self.store.config()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.watch()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            superseded: self.debouncer.superseded(),
            ..self.stats.clone()
        }
    }

    pub fn origin(&self, target: SyncTarget) -> SyncOrigin {
        self.lane(target).tracker.current()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn lane(&self, target: SyncTarget) -> &Lane {
        match target {
            SyncTarget::QueryParameters => &self.query,
            SyncTarget::PathVariables => &self.path,
        }
    }

    fn observe(&mut self, now: Instant) {
        let current = self.store.watch();
        if current != self.observed {
            self.observed = current.clone();
            self.debouncer.push(current, now);
        }
    }

    fn edited(&mut self, now: Instant) {
        self.stats.edits += 1;
        self.observe(now);
    }

    fn ensure_index(&self, kind: FieldListKind, index: usize) -> Result<Field, SyncError> {
        self.store.field(kind, index).ok_or_else(|| {
            SyncError::not_found(format!("No field at {}.{}", kind.form_path(), index))
        })
    }

    pub fn edit_url(&mut self, url: &str, now: Instant) {
        self.store.set_url(url, SetValueOptions::CONTENT);
        self.edited(now);
    }

    /// Replaces the field at `index`. A user-provided field never keeps a value.
    pub fn edit_field(
        &mut self,
        kind: FieldListKind,
        index: usize,
        mut field: Field,
        now: Instant,
    ) -> Result<(), SyncError> {
        self.ensure_index(kind, index)?;
        if field.is_user_provided() {
            field.value = Some(String::new());
        }
        self.store.update(kind, index, field);
        self.edited(now);
        Ok(())
    }

    /// Appends an empty field and returns its index. Path variables start
    /// out user-provided.
    pub fn append_field(&mut self, kind: FieldListKind, now: Instant) -> usize {
        let field = Field {
            key: String::new(),
            value: Some(String::new()),
            is_user_provided: kind.is_user_only().then_some(true),
            ..Default::default()
        };
        self.store.append(kind, field);
        self.edited(now);
        self.store.fields(kind).len() - 1
    }

    pub fn remove_field(
        &mut self,
        kind: FieldListKind,
        index: Option<usize>,
        now: Instant,
    ) -> Result<(), SyncError> {
        if let Some(index) = index {
            self.ensure_index(kind, index)?;
        }
        self.store.remove(kind, index);
        self.edited(now);
        Ok(())
    }

    pub fn toggle_user_provided(
        &mut self,
        kind: FieldListKind,
        index: usize,
        flag: bool,
        now: Instant,
    ) -> Result<Field, SyncError> {
        let mut field = self.ensure_index(kind, index)?;
        field.value = Some(String::new());
        field.is_user_provided = Some(flag);
        self.store.update(kind, index, field.clone());
        self.edited(now);
        Ok(field)
    }

    pub fn set_method(&mut self, raw: &str, now: Instant) -> Result<String, SyncError> {
        let method = normalize_method(raw)?;
        self.store.set_method(&method, SetValueOptions::CONTENT);
        self.edited(now);
        Ok(method)
    }

    /// Falls back to the default method when none is set. Returns whether the
    /// store was written.
    pub fn ensure_method(&mut self) -> bool {
        let config = self.store.config();
        if config.method.as_deref().is_some_and(|m| !m.trim().is_empty()) {
            return false;
        }
        let method = config.method_or_default().to_string();
        self.store.set_method(&method, SetValueOptions::CONTENT);
        true
    }

    pub fn replace_config(&mut self, config: HttpToolConfig, now: Instant) {
        self.store.replace_config(config, SetValueOptions::CONTENT);
        self.edited(now);
    }

    /// Edits config attributes no synchronizer watches (name, description, approval).
    pub fn update_details(&mut self, edit: impl FnOnce(&mut HttpToolConfig), now: Instant) {
        let mut config = self.store.config();
        edit(&mut config);
        self.replace_config(config, now);
    }

    /// The pointer went down inside `target`'s editor. Only one editor can
    /// hold the pointer, so every other lane falls back to `url`.
    pub fn pointer_down(&mut self, target: SyncTarget) {
        for lane_target in SyncTarget::ALL {
            let lane = self.lane_mut(lane_target);
            if lane_target == target {
                lane.tracker.pointer_down();
            } else {
                lane.tracker.pointer_leave();
            }
        }
    }

    pub fn pointer_leave(&mut self, target: SyncTarget) {
        self.lane_mut(target).tracker.pointer_leave();
    }

    fn lane_mut(&mut self, target: SyncTarget) -> &mut Lane {
        match target {
            SyncTarget::QueryParameters => &mut self.query,
            SyncTarget::PathVariables => &mut self.path,
        }
    }

    /// Runs the passes for a snapshot whose quiet window has elapsed.
    pub fn tick(&mut self, now: Instant) -> Result<Vec<PassReport>, SyncError> {
        match self.debouncer.poll(now) {
            Some(snapshot) => self.settle(snapshot, now),
            None => Ok(Vec::new()),
        }
    }

    /// Settles the pending snapshot without waiting for the window.
    pub fn flush(&mut self, now: Instant) -> Result<Vec<PassReport>, SyncError> {
        match self.debouncer.flush() {
            Some(snapshot) => self.settle(snapshot, now),
            None => Ok(Vec::new()),
        }
    }

    /// Flushes until nothing is pending, including the echo of this
    /// session's own writes.
    pub fn flush_all(&mut self, now: Instant) -> Result<Vec<PassReport>, SyncError> {
        let mut reports = Vec::new();
        for _ in 0..MAX_SETTLE_ROUNDS {
            if !self.debouncer.is_pending() {
                break;
            }
            reports.extend(self.flush(now)?);
        }
        Ok(reports)
    }

    /// Runs one pass immediately on the current store state, bypassing the
    /// debounce stage and the origin trackers.
    pub fn sync_now(
        &mut self,
        target: SyncTarget,
        direction: SyncOrigin,
        now: Instant,
    ) -> Result<PassReport, SyncError> {
        let snapshot = self.store.watch();
        let report = run_pass(target, direction, &snapshot, &mut self.store, &self.logger)?;
        self.stats.passes += 1;
        if report.wrote() {
            self.stats.writes += 1;
            self.gate.complete(direction, self.store.watch());
            self.observe(now);
        }
        Ok(report)
    }

    fn settle(&mut self, snapshot: Snapshot, now: Instant) -> Result<Vec<PassReport>, SyncError> {
        let in_flight = self.gate.in_flight();
        if !self.gate.admit(&snapshot) {
            self.stats.echoes_refused += 1;
            self.query.settled(snapshot.clone());
            self.path.settled(snapshot);
            self.logger.debug(
                "echo of own write settled, no pass",
                Some(&serde_json::json!({"writer": in_flight})),
            );
            return Ok(Vec::new());
        }
        self.stats.settles += 1;

        let mut reports = Vec::new();
        let mut first_writer: Option<SyncOrigin> = None;
        for target in SyncTarget::ALL {
            let Self {
                store,
                logger,
                query,
                path,
                stats,
                ..
            } = &mut *self;
            let lane = match target {
                SyncTarget::QueryParameters => query,
                SyncTarget::PathVariables => path,
            };
            if lane.is_settled(&snapshot) {
                stats.skipped_unchanged += 1;
                continue;
            }
            lane.settled(snapshot.clone());

            let direction = lane.tracker.current();
            let report = match run_pass(target, direction, &snapshot, store, logger) {
                Ok(report) => report,
                Err(err) => {
                    logger.error(
                        "synchronization pass aborted",
                        Some(&serde_json::json!({
                            "target": target.to_string(),
                            "direction": direction.as_str(),
                            "error": err.message,
                        })),
                    );
                    return Err(err);
                }
            };
            stats.passes += 1;
            if report.wrote() {
                stats.writes += 1;
                first_writer.get_or_insert(direction);
                logger.debug(
                    "pass wrote",
                    Some(&serde_json::json!({
                        "target": target.to_string(),
                        "direction": direction.as_str(),
                        "changes": report.changes,
                    })),
                );
            }
            reports.push(report);
        }

        if let Some(direction) = first_writer {
            self.gate.complete(direction, self.store.watch());
            self.observe(now);
        }
        Ok(reports)
    }
}
