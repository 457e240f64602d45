//! Per-call validation context and the metrics returned with each outcome.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::rules::ValidationOutcome;
use crate::error::CoreError;
use crate::order::OrderDraft;
use crate::types::{Date, Timestamp};

/// Inputs to one pipeline run that do not come from the draft.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Correlates log lines and metrics of one run.
    pub operation_id: Uuid,
    /// Reference date for "not in the future" and the daily intake cap.
    pub today: Date,
    pub started_at: Timestamp,
}

impl ValidationContext {
    /// Context for a run starting now, with `today` taken from the UTC clock.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            operation_id: Uuid::new_v4(),
            today: now.date_naive(),
            started_at: now,
        }
    }

    /// Context for a run evaluated as of `today`.
    pub fn for_date(today: Date) -> Self {
        Self {
            today,
            ..Self::new()
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// What one pipeline run cost and concluded.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationMetrics {
    pub operation_id: Uuid,
    pub title: String,
    pub isbn: String,
    pub category: String,
    pub validation_ms: u64,
    /// Queries issued to the existence oracle.
    pub oracle_queries: u32,
    pub violation_count: usize,
    pub success: bool,
    pub started_at: Timestamp,
}

impl ValidationMetrics {
    pub(crate) fn record(
        ctx: &ValidationContext,
        draft: &OrderDraft,
        outcome: &ValidationOutcome,
        elapsed: Duration,
        oracle_queries: u32,
    ) -> Self {
        Self {
            operation_id: ctx.operation_id,
            title: draft.title.clone(),
            isbn: draft.isbn.clone(),
            category: draft.category.as_str().to_string(),
            validation_ms: elapsed.as_millis() as u64,
            oracle_queries,
            violation_count: outcome.violations().len(),
            success: outcome.is_accepted(),
            started_at: ctx.started_at,
        }
    }
}

/// Outcome of a pipeline run together with its metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub outcome: ValidationOutcome,
    pub metrics: ValidationMetrics,
}

impl ValidationReport {
    pub fn is_accepted(&self) -> bool {
        self.outcome.is_accepted()
    }

    /// Turn a rejection into [`CoreError::Rejected`] for `?`-style callers.
    pub fn into_result(self) -> Result<ValidationMetrics, CoreError> {
        match self.outcome {
            ValidationOutcome::Accepted => Ok(self.metrics),
            ValidationOutcome::Rejected(violations) => Err(CoreError::Rejected(violations)),
        }
    }
}
