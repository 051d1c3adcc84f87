use chrono::{DateTime, Utc};

use crate::view_model::{ResultView, WorkflowView};
use crate::{AnalysisKind, AnalysisResult, ErrorInfo, ValidatedRequest};

pub type JobId = u64;

/// Highest value the progress animation may reach on its own; 100 is
/// reserved for the transition out of `Running`.
pub const PROGRESS_CEILING: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Cancelled | JobStatus::Failed
        )
    }
}

/// One submitted request and its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisJob {
    pub id: JobId,
    pub request: ValidatedRequest,
    pub status: JobStatus,
    pub progress_percent: u8,
    pub started_at: DateTime<Utc>,
    pub result: Option<AnalysisResult>,
    pub error: Option<ErrorInfo>,
}

impl AnalysisJob {
    /// A freshly submitted job: `Running` at 0%.
    pub fn running(id: JobId, request: ValidatedRequest, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            request,
            status: JobStatus::Running,
            progress_percent: 0,
            started_at,
            result: None,
            error: None,
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        self.request.kind()
    }

    pub(crate) fn is_active(&self, job_id: JobId) -> bool {
        self.id == job_id && self.status == JobStatus::Running
    }

    /// Advances the animation, capped below 100. Returns the new value if it moved.
    pub(crate) fn advance(&mut self, increment: u8) -> Option<u8> {
        let next = self
            .progress_percent
            .saturating_add(increment)
            .min(PROGRESS_CEILING);
        if next > self.progress_percent {
            self.progress_percent = next;
            Some(next)
        } else {
            None
        }
    }

    pub(crate) fn complete(&mut self, result: AnalysisResult) {
        self.finish(JobStatus::Completed);
        self.result = Some(result);
    }

    pub(crate) fn fail(&mut self, error: ErrorInfo) {
        self.finish(JobStatus::Failed);
        self.error = Some(error);
    }

    pub(crate) fn cancel(&mut self) {
        self.finish(JobStatus::Cancelled);
    }

    fn finish(&mut self, status: JobStatus) {
        debug_assert_eq!(self.status, JobStatus::Running);
        self.status = status;
        self.progress_percent = 100;
    }
}

/// State of one panel's workflow. At most one job is held at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    kind: AnalysisKind,
    job: Option<AnalysisJob>,
    dirty: bool,
}

impl WorkflowState {
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            job: None,
            dirty: false,
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn job(&self) -> Option<&AnalysisJob> {
        self.job.as_ref()
    }

    pub fn status(&self) -> JobStatus {
        self.job.as_ref().map_or(JobStatus::Idle, |job| job.status)
    }

    pub fn progress_percent(&self) -> u8 {
        self.job.as_ref().map_or(0, |job| job.progress_percent)
    }

    pub fn view(&self) -> WorkflowView {
        let job = self.job.as_ref();
        WorkflowView {
            kind: self.kind,
            status: self.status(),
            job_id: job.map(|job| job.id),
            progress_percent: self.progress_percent(),
            result: job
                .and_then(|job| job.result.as_ref())
                .map(ResultView::from_result),
            error_message: job
                .and_then(|job| job.error.as_ref())
                .map(ToString::to_string),
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The running job with id `job_id`, if there is one.
    pub(crate) fn active_job_mut(&mut self, job_id: JobId) -> Option<&mut AnalysisJob> {
        self.job.as_mut().filter(|job| job.is_active(job_id))
    }

    pub(crate) fn running_job_mut(&mut self) -> Option<&mut AnalysisJob> {
        self.job
            .as_mut()
            .filter(|job| job.status == JobStatus::Running)
    }

    pub(crate) fn replace_job(&mut self, job: Option<AnalysisJob>) -> Option<AnalysisJob> {
        self.mark_dirty();
        std::mem::replace(&mut self.job, job)
    }
}
