//! Daily expansion of recurrence patterns into concrete todos.
//!
//! The expander runs independently of any interactive client: it reads the
//! active patterns, creates today's instance for every pattern whose day set
//! contains today's day code, and stamps the pattern's `last_created_date`.
//! A pattern already stamped with today is left alone, so running the job
//! twice on one day does not duplicate instances.

use crate::clock::Clock;
use crate::error::CoreError;
use crate::models::{DayCode, NewTodo, PatternWithTemplate, Todo, UpdatePatternData};
use crate::repository::Repository;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// A pattern that matched today but could not be expanded.
#[derive(Debug, Clone, Serialize)]
pub struct ExpansionFailure {
    pub pattern_id: Uuid,
    pub parent_id: Uuid,
    pub reason: String,
}

/// Outcome of one expander run
#[derive(Debug, Clone, Serialize)]
pub struct ExpansionReport {
    pub date: NaiveDate,
    pub day: DayCode,
    /// Active patterns looked at
    pub patterns_checked: usize,
    /// Patterns whose day set contains today
    pub patterns_due: usize,
    /// Instances created in this run
    pub created: Vec<Todo>,
    /// Due patterns already expanded today
    pub skipped_already_expanded: usize,
    pub failures: Vec<ExpansionFailure>,
    /// Time taken for the run
    pub duration_ms: u64,
}

impl ExpansionReport {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            day: DayCode::of(date),
            patterns_checked: 0,
            patterns_due: 0,
            created: Vec::new(),
            skipped_already_expanded: 0,
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

enum PatternOutcome {
    NotDue,
    AlreadyExpanded,
    Created(Todo),
}

pub struct InstanceExpander<R: Repository + ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: Repository + ?Sized> InstanceExpander<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Expands patterns for the clock's today.
    pub async fn run(&self) -> Result<ExpansionReport, CoreError> {
        self.run_for(self.clock.today()).await
    }

    /// Expands patterns for `today`.
    ///
    /// Only the initial pattern fetch can fail the run; per-pattern failures
    /// are logged, recorded in the report and skipped.
    pub async fn run_for(&self, today: NaiveDate) -> Result<ExpansionReport, CoreError> {
        let started = Instant::now();
        let mut report = ExpansionReport::new(today);
        tracing::info!(date = %today, day = %report.day, "expanding recurring todos");

        let patterns = self.repo.find_active_patterns().await.map_err(|e| {
            tracing::error!(error = %e, "failed to fetch recurrence patterns");
            e
        })?;
        report.patterns_checked = patterns.len();

        for entry in patterns {
            let pattern_id = entry.pattern.id;
            let parent_id = entry.pattern.parent_id;

            match self.expand_one(entry, today).await {
                Ok(PatternOutcome::NotDue) => {}
                Ok(PatternOutcome::AlreadyExpanded) => {
                    report.patterns_due += 1;
                    report.skipped_already_expanded += 1;
                    tracing::debug!(%pattern_id, "already expanded today");
                }
                Ok(PatternOutcome::Created(todo)) => {
                    report.patterns_due += 1;
                    tracing::info!(%pattern_id, todo_id = %todo.id, "created scheduled todo");
                    report.created.push(todo);
                }
                Err(e) => {
                    report.patterns_due += 1;
                    tracing::error!(%pattern_id, error = %e, "error creating scheduled todo");
                    report.failures.push(ExpansionFailure {
                        pattern_id,
                        parent_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            created = report.created.len(),
            skipped = report.skipped_already_expanded,
            failed = report.failures.len(),
            "expansion finished"
        );
        Ok(report)
    }

    async fn expand_one(
        &self,
        entry: PatternWithTemplate,
        today: NaiveDate,
    ) -> Result<PatternOutcome, CoreError> {
        let PatternWithTemplate { pattern, template } = entry;

        if !pattern.fires_on(today) {
            return Ok(PatternOutcome::NotDue);
        }
        if pattern.last_created_date == Some(today) {
            return Ok(PatternOutcome::AlreadyExpanded);
        }

        let template = template.ok_or_else(|| {
            CoreError::NotFound(format!("template todo {} for pattern {}", pattern.parent_id, pattern.id))
        })?;

        let instance = NewTodo {
            user_id: template.user_id,
            text: template.text,
            date: today,
            completed: false,
            scheduled_days: None,
            parent_todo_id: Some(pattern.parent_id),
        };
        let created = self.repo.insert_todo(instance).await?;

        // The instance exists now; a failed stamp is reported but not undone.
        let stamp = UpdatePatternData {
            last_created_date: Some(Some(today)),
            ..Default::default()
        };
        if let Err(e) = self.repo.update_pattern(pattern.id, stamp).await {
            tracing::warn!(pattern_id = %pattern.id, error = %e, "failed to stamp pattern");
        }

        Ok(PatternOutcome::Created(created))
    }
}
