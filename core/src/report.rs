//! Assembles [`TaskResult`] from a task's accumulated counters.

use std::time::Duration;

use chrono::{DateTime, Utc};

use till_types::{TaskDetails, TaskResult};

#[derive(Debug, Clone)]
pub struct ReportBuilder {
    subtask_id: String,
    started_at: DateTime<Utc>,
    elapsed: Duration,
    errors: u32,
    independence: u8,
    quality: u8,
    process: u8,
    success: bool,
    abandoned: bool,
}

impl ReportBuilder {
    #[must_use]
    pub fn new(subtask_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            subtask_id: subtask_id.into(),
            started_at,
            elapsed: Duration::ZERO,
            errors: 0,
            independence: 0,
            quality: 0,
            process: 0,
            success: false,
            abandoned: false,
        }
    }

    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn errors(mut self, errors: u32) -> Self {
        self.errors = errors;
        self
    }

    pub fn scores(mut self, independence: u8, quality: u8, process: u8) -> Self {
        self.independence = independence;
        self.quality = quality;
        self.process = process;
        self
    }

    pub fn success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    pub fn abandoned(mut self, abandoned: bool) -> Self {
        self.abandoned = abandoned;
        self
    }

    /// Finalize. The end timestamp is taken now.
    #[must_use]
    pub fn build(self, details: TaskDetails) -> TaskResult {
        let ended_at = Utc::now();
        let result = TaskResult {
            subtask_id: self.subtask_id,
            start_time: epoch_seconds(self.started_at),
            end_time: epoch_seconds(ended_at),
            duration_sec: round_centi(self.elapsed.as_secs_f64()),
            errors: self.errors,
            independence_score: self.independence,
            quality_score: self.quality,
            process_score: self.process,
            success: self.success,
            abandoned: self.abandoned,
            details,
        };
        tracing::info!(
            subtask = %result.subtask_id,
            success = result.success,
            abandoned = result.abandoned,
            independence = result.independence_score,
            quality = result.quality_score,
            process = result.process_score,
            errors = result.errors,
            "Task finalized"
        );
        result
    }
}

fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

fn round_centi(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
