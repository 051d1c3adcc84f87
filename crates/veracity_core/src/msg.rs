use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{AnalysisResult, JobId, ServiceError, ValidatedRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted a validated request; replaces any current job.
    Submitted {
        job_id: JobId,
        request: ValidatedRequest,
        started_at: DateTime<Utc>,
    },
    /// Progress timer fired for a job.
    ProgressTick { job_id: JobId, increment: u8 },
    /// The analysis service delivered its single terminal answer.
    ServiceResponded {
        job_id: JobId,
        outcome: Result<AnalysisResult, ServiceError>,
    },
    /// The service did not answer within the configured bound.
    TimedOut { job_id: JobId, after: Duration },
    /// User cancelled a job.
    CancelRequested { job_id: JobId },
    /// User reset the panel.
    ResetRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
