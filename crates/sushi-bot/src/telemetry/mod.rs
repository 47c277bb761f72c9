//! Per-decision diagnostic records and the sinks that persist them.
//!
//! Sinks are plain owned values handed to a planner; nothing here is global.
//! A sink failure is reported to the caller of [`DecisionLogger::record`] and
//! the planners swallow it after counting it.

mod memory;
mod ndjson;
mod trace;

pub use trace::CsvDecisionLog;
pub use memory::MemoryDecisionLog;
pub use ndjson::NdjsonDecisionLog;

use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode decision record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write csv row: {0}")]
    Csv(#[from] csv::Error),
}

impl TelemetryError {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| TelemetryError::Io { context, source }
    }
}

/// Receives one record per decision. Must not block for long.
pub trait DecisionLogger {
    fn record(&self, record: &DecisionRecord) -> Result<(), TelemetryError>;

    fn flush(&self) -> Result<(), TelemetryError> {
        Ok(())
    }
}

impl<T> DecisionLogger for Arc<T>
where
    T: DecisionLogger + ?Sized,
{
    fn record(&self, record: &DecisionRecord) -> Result<(), TelemetryError> {
        (**self).record(record)
    }

    fn flush(&self) -> Result<(), TelemetryError> {
        (**self).flush()
    }
}

impl<T> DecisionLogger for Box<T>
where
    T: DecisionLogger + ?Sized,
{
    fn record(&self, record: &DecisionRecord) -> Result<(), TelemetryError> {
        (**self).record(record)
    }

    fn flush(&self) -> Result<(), TelemetryError> {
        (**self).flush()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub action: String,
    /// Ensemble mean; `None` when no sample contributed.
    pub mean_value: Option<f64>,
    /// Heuristic value of the state after the action, when a scorer is attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<f64>,
}

impl CandidateScore {
    /// Score shown in traces: the heuristic when present, else the mean.
    pub fn score(&self) -> Option<f64> {
        self.heuristic.or(self.mean_value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub timestamp_ms: u128,
    pub decision_index: u64,
    pub agent: String,
    pub round: u32,
    pub turn: u32,
    pub player_count: usize,
    pub chosen: String,
    pub candidates: Vec<CandidateScore>,
    pub completed_samples: usize,
    pub failed_samples: usize,
    pub timed_out: bool,
    pub fallback: bool,
    pub elapsed_ms: u64,
}

impl DecisionRecord {
    pub fn best_score(&self) -> Option<f64> {
        self.candidates
            .iter()
            .filter_map(CandidateScore::score)
            .reduce(f64::max)
    }

    pub fn chosen_score(&self) -> Option<f64> {
        self.candidates
            .iter()
            .find(|candidate| candidate.action == self.chosen)
            .and_then(CandidateScore::score)
    }

    /// Chosen score minus the best candidate score (zero or negative).
    pub fn regret(&self) -> Option<f64> {
        Some(self.chosen_score()? - self.best_score()?)
    }
}

pub(crate) fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) fn sample_record(index: u64) -> DecisionRecord {
    DecisionRecord {
        timestamp_ms: 1_700_000_000_000,
        decision_index: index,
        agent: "Agent1".to_string(),
        round: 2,
        turn: 4,
        player_count: 3,
        chosen: "Sashimi".to_string(),
        candidates: vec![
            CandidateScore {
                action: "Tempura".to_string(),
                mean_value: Some(0.25),
                heuristic: Some(0.41),
            },
            CandidateScore {
                action: "Sashimi".to_string(),
                mean_value: Some(0.5),
                heuristic: Some(0.38),
            },
            CandidateScore {
                action: "Pudding".to_string(),
                mean_value: None,
                heuristic: None,
            },
        ],
        completed_samples: 8,
        failed_samples: 1,
        timed_out: false,
        fallback: false,
        elapsed_ms: 412,
    }
}
