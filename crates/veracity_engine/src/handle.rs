use futures_util::{stream, Stream};
use tokio::sync::watch;
use veracity_core::{AnalysisJob, AnalysisKind, JobId, JobStatus};
use veracity_logging::veracity_debug;

/// Caller's view of one submitted job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    job_id: JobId,
    kind: AnalysisKind,
    rx: watch::Receiver<AnalysisJob>,
}

impl JobHandle {
    pub(crate) fn new(job_id: JobId, kind: AnalysisKind, rx: watch::Receiver<AnalysisJob>) -> Self {
        Self { job_id, kind, rx }
    }

    pub fn id(&self) -> JobId {
        self.job_id
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn snapshot(&self) -> AnalysisJob {
        self.rx.borrow().clone()
    }

    pub fn status(&self) -> JobStatus {
        self.rx.borrow().status
    }

    pub fn progress_percent(&self) -> u8 {
        self.rx.borrow().progress_percent
    }

    /// Waits for the job to leave `Running` and returns its final record.
    ///
    /// If the workflow shuts down first, the last known record is returned.
    pub async fn wait(&self) -> AnalysisJob {
        let mut rx = self.rx.clone();
        if rx.wait_for(|job| job.status.is_terminal()).await.is_err() {
            veracity_debug!("Job {} reporter closed early", self.job_id);
        }
        let job = rx.borrow().clone();
        job
    }

    /// Strictly increasing progress percentages, ending with 100 when the
    /// job finishes. Ends early if the workflow goes away first.
    pub fn progress(&self) -> impl Stream<Item = u8> + Send + 'static {
        let rx = self.rx.clone();
        stream::unfold(Some((rx, 0u8)), |cursor| async move {
            let Some((mut rx, last)) = cursor else {
                return None;
            };
            loop {
                let (status, percent) = {
                    let job = rx.borrow_and_update();
                    (job.status, job.progress_percent)
                };
                if status.is_terminal() {
                    return Some((100, None));
                }
                if percent > last {
                    return Some((percent, Some((rx, percent))));
                }
                if rx.changed().await.is_err() {
                    let finished = rx.borrow().status.is_terminal();
                    return finished.then_some((100, None));
                }
            }
        })
    }
}
