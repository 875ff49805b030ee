//! Engine driver: runs due policy groups on a fixed tick.
//!
//! Each tick, for every due group and every rule in document order:
//! parse the expression, check the threshold, fetch samples for the left
//! operand from the [`SampleStore`], evaluate, and hand the result to the
//! [`ReportSink`]. A failing rule is logged and counted; it never aborts the
//! tick or affects its siblings.

mod shutdown;
mod signal;


use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use policy_core::config::DEFAULT_TICK;
use policy_core::ResourceLabel;
use policy_store::{SampleStore, StoreError};

use crate::evaluator::ThresholdEvaluator;
use crate::expr::{self, ExprError};
use crate::loader::{LoadError, PolicyLoader};
use crate::report::ReportSink;
use crate::scheduler::GroupScheduler;
use crate::schema::{PolicyDocument, PolicyGroup, PolicyRule};
use crate::validation::{validate_document, ValidationResult};

pub use self::shutdown::Shutdown;
pub use self::signal::run_until_signal;

// ── Reports ─────────────────────────────────────────────────────────

/// Outcome of one successfully evaluated rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleReport {
    pub group: String,
    /// Position of the rule within its group.
    pub index: usize,
    pub record: String,
    pub annotations: BTreeSet<String>,
    /// Resources whose samples satisfied the condition.
    pub labels: BTreeSet<ResourceLabel>,
    pub evaluated_at: DateTime<Utc>,
}

/// Counters for a single tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSummary {
    pub at: DateTime<Utc>,
    /// Groups that were due and evaluated.
    pub groups: usize,
    /// Rules evaluated successfully.
    pub evaluated: usize,
    /// Rules whose label set was non-empty.
    pub fired: usize,
    /// Rules that failed to parse, resolve or fetch.
    pub failed: usize,
}

/// Why a single rule produced no report this tick.
#[derive(Debug, thiserror::Error)]
pub enum RuleFailure {
    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error("left operand {0} is not a variable")]
    NotAVariable(String),

    #[error("sample store error: {0}")]
    Store(#[from] StoreError),
}

// ── Engine ──────────────────────────────────────────────────────────

/// Drives policy evaluation.
///
/// Shared behind an `Arc` between the tick loop and the signal task, so the
/// document and the scheduler use interior mutability. Neither lock is held
/// across an await point.
pub struct PolicyEngine {
    loader: Option<PolicyLoader>,
    document: RwLock<Arc<PolicyDocument>>,
    scheduler: Mutex<GroupScheduler>,
    store: Arc<dyn SampleStore>,
    sink: Arc<dyn ReportSink>,
    tick: Duration,
}

impl PolicyEngine {
    /// Engine over a fixed document. [`reload`](Self::reload) is a no-op.
    pub fn new(
        document: PolicyDocument,
        store: Arc<dyn SampleStore>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        let mut scheduler = GroupScheduler::new();
        scheduler.sync_groups(&document.groups);
        Self {
            loader: None,
            document: RwLock::new(Arc::new(document)),
            scheduler: Mutex::new(scheduler),
            store,
            sink,
            tick: DEFAULT_TICK,
        }
    }

    /// Engine backed by a policy file. The initial load must succeed.
    pub fn from_loader(
        loader: PolicyLoader,
        store: Arc<dyn SampleStore>,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self, LoadError> {
        let document = loader.load()?;
        log_findings(&validate_document(&document));
        let mut engine = Self::new(document, store, sink);
        engine.loader = Some(loader);
        Ok(engine)
    }

    /// Set the base tick period.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Current document snapshot.
    pub fn document(&self) -> Arc<PolicyDocument> {
        Arc::clone(&self.document.read().expect("document lock poisoned"))
    }

    /// Re-read the policy file.
    ///
    /// On failure the previous document stays active and the error is
    /// returned after being logged.
    pub fn reload(&self) -> Result<(), LoadError> {
        let Some(loader) = &self.loader else {
            debug!("no policy file configured, nothing to reload");
            return Ok(());
        };

        match loader.load() {
            Ok(document) => {
                log_findings(&validate_document(&document));
                self.scheduler
                    .lock()
                    .expect("scheduler lock poisoned")
                    .sync_groups(&document.groups);
                *self.document.write().expect("document lock poisoned") = Arc::new(document);
                info!(path = %loader.path().display(), "policy reloaded");
                Ok(())
            }
            Err(e) => {
                warn!(path = %loader.path().display(), error = %e, "policy reload failed, keeping previous document");
                Err(e)
            }
        }
    }

    /// Evaluate every group due at `now`.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> TickSummary {
        let document = self.document();
        let due: Vec<String> = self
            .scheduler
            .lock()
            .expect("scheduler lock poisoned")
            .due_groups(now)
            .into_iter()
            .map(String::from)
            .collect();

        let mut summary = TickSummary {
            at: now,
            groups: 0,
            evaluated: 0,
            fired: 0,
            failed: 0,
        };

        for name in &due {
            let Some(group) = document.group(name) else {
                continue;
            };
            self.run_group(group, now, &mut summary).await;
            self.scheduler
                .lock()
                .expect("scheduler lock poisoned")
                .record_run(name, now);
            summary.groups += 1;
        }

        debug!(
            groups = summary.groups,
            evaluated = summary.evaluated,
            fired = summary.fired,
            failed = summary.failed,
            "tick complete"
        );
        self.sink.tick_complete(&summary);
        summary
    }

    async fn run_group(&self, group: &PolicyGroup, now: DateTime<Utc>, summary: &mut TickSummary) {
        for (index, rule) in group.rules.iter().enumerate() {
            match self.evaluate_rule(group, index, rule, now).await {
                Ok(report) => {
                    summary.evaluated += 1;
                    if !report.labels.is_empty() {
                        summary.fired += 1;
                    }
                    self.sink.report(&report);
                }
                Err(RuleFailure::Expr(ExprError::Syntax(e))) => {
                    summary.failed += 1;
                    warn!(
                        group = %group.name,
                        index,
                        record = %rule.record,
                        expr = %rule.expr,
                        position = e.position,
                        rule = %e.rule,
                        "expression syntax error"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        group = %group.name,
                        index,
                        record = %rule.record,
                        error = %e,
                        "rule evaluation failed"
                    );
                }
            }
        }
    }

    /// Parse, fetch and evaluate a single rule.
    ///
    /// The threshold is checked before the store is touched, so a malformed
    /// rule costs no I/O.
    pub async fn evaluate_rule(
        &self,
        group: &PolicyGroup,
        index: usize,
        rule: &PolicyRule,
        now: DateTime<Utc>,
    ) -> Result<RuleReport, RuleFailure> {
        let cond = expr::parse(&rule.expr)?;
        ThresholdEvaluator::threshold(&cond).map_err(ExprError::from)?;

        let variable = cond
            .left
            .as_variable()
            .ok_or_else(|| RuleFailure::NotAVariable(cond.left.to_string()))?;
        let series = self.store.fetch(variable).await?;
        let labels = ThresholdEvaluator::evaluate(&cond, &series).map_err(ExprError::from)?;

        Ok(RuleReport {
            group: group.name.clone(),
            index,
            record: rule.record.clone(),
            annotations: group.annotations.clone(),
            labels,
            evaluated_at: now,
        })
    }

    /// Tick until `shutdown` is triggered.
    ///
    /// Shutdown is observed only between ticks; a tick in progress runs to
    /// completion.
    pub async fn run(&self, shutdown: Shutdown) {
        let origin = Instant::now();
        let wall_origin = Utc::now();
        let mut ticker = tokio::time::interval_at(origin, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(tick_ms = self.tick.as_millis() as u64, "policy engine started");

        loop {
            let scheduled = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                scheduled = ticker.tick() => scheduled,
            };
            self.run_tick(tick_time(wall_origin, origin, scheduled)).await;
        }

        info!("policy engine stopped");
    }
}

/// Wall-clock time of a scheduled tick.
///
/// Derived from the ticker's deadline rather than the wake-up time, so
/// consecutive ticks are never closer together than the tick period.
pub(crate) fn tick_time(wall_origin: DateTime<Utc>, origin: Instant, scheduled: Instant) -> DateTime<Utc> {
    chrono::Duration::from_std(scheduled.saturating_duration_since(origin))
        .ok()
        .and_then(|offset| wall_origin.checked_add_signed(offset))
        .unwrap_or_else(Utc::now)
}

/// Log validation findings. Rules with errors stay loaded and fail per tick.
pub(crate) fn log_findings(result: &ValidationResult) {
    for e in &result.errors {
        warn!(path = %e.path, "{}", e.message);
    }
    for w in &result.warnings {
        match &w.suggestion {
            Some(s) => info!(path = %w.path, suggestion = %s, "{}", w.message),
            None => info!(path = %w.path, "{}", w.message),
        }
    }
}
