use crate::{AnalysisJob, JobId, ValidatedRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Dispatch the request to the analysis service and start the progress timer.
    StartAnalysis {
        job_id: JobId,
        request: ValidatedRequest,
    },
    /// Stop the progress timer and release the pending service call.
    AbortAnalysis { job_id: JobId },
    ProgressChanged { job_id: JobId, percent: u8 },
    /// A job left `Running`; carries its final, immutable record.
    JobFinished(Box<AnalysisJob>),
    /// The panel went back to `Idle`.
    Cleared,
}
