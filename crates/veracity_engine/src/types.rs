use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use veracity_core::{AnalysisKind, ValidationError, ValidationLimits};

#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Interval between progress animation steps.
    pub tick_interval: Duration,
    /// Upper bound of one random progress step, in percent.
    pub max_increment: u8,
    /// How long to wait for the service before failing the job.
    pub timeout: Duration,
    pub limits: ValidationLimits,
    /// Seed for the progress animation; random when unset.
    pub seed: Option<u64>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            max_increment: 15,
            timeout: Duration::from_secs(30),
            limits: ValidationLimits::default(),
            seed: None,
        }
    }
}

impl WorkflowSettings {
    /// Defaults with the progress cadence of `kind`'s panel.
    pub fn for_kind(kind: AnalysisKind) -> Self {
        let (tick_ms, max_increment) = match kind {
            AnalysisKind::MediaCheck => (200, 15),
            AnalysisKind::ClaimCheck => (300, 20),
            AnalysisKind::NewsCheck => (250, 15),
        };
        Self {
            tick_interval: Duration::from_millis(tick_ms),
            max_increment,
            ..Self::default()
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("the analysis workflow has shut down")]
    Closed,
}

/// Source of job start timestamps.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant, for deterministic records.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
