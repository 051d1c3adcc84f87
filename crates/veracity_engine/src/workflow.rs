use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle as TaskHandle;
use tokio_util::sync::CancellationToken;
use veracity_core::{
    update, AnalysisJob, AnalysisKind, AnalysisRequest, Effect, JobId, JobStatus, Msg,
    ValidatedRequest, ValidationLimits, WorkflowState, WorkflowView,
};
use veracity_logging::{veracity_debug, veracity_warn};

use crate::{AnalysisService, Clock, JobHandle, SubmitError, SystemClock, WorkflowSettings};

enum DriverInput {
    Submit {
        job_id: JobId,
        request: ValidatedRequest,
        started_at: DateTime<Utc>,
        reporter: watch::Sender<AnalysisJob>,
    },
    Msg(Msg),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// One panel's analysis workflow.
///
/// Commands are forwarded to a driver task that owns the [`WorkflowState`]
/// and applies every message serially. Must be created inside a tokio
/// runtime.
pub struct AnalysisWorkflow {
    kind: AnalysisKind,
    inbox_tx: mpsc::UnboundedSender<DriverInput>,
    view_rx: watch::Receiver<WorkflowView>,
    next_job_id: AtomicU64,
    clock: Arc<dyn Clock>,
    limits: ValidationLimits,
    driver: Option<TaskHandle<()>>,
}

impl AnalysisWorkflow {
    pub fn spawn(
        kind: AnalysisKind,
        service: Arc<dyn AnalysisService>,
        settings: WorkflowSettings,
    ) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(WorkflowView::idle(kind));
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let limits = settings.limits;

        let driver = Driver {
            state: WorkflowState::new(kind),
            service,
            settings,
            inbox_tx: inbox_tx.clone(),
            view_tx,
            jobs: HashMap::new(),
            rng,
        };
        let driver = tokio::spawn(driver.run(inbox_rx));
        veracity_debug!("{} workflow started", kind);

        Self {
            kind,
            inbox_tx,
            view_rx,
            next_job_id: AtomicU64::new(1),
            clock: Arc::new(SystemClock),
            limits,
            driver: Some(driver),
        }
    }

    /// Replaces the clock used to stamp job start times.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    /// Validates `request` and starts a job for it, cancelling any job still
    /// running on this panel. Invalid requests never reach the driver.
    pub fn submit(&self, request: AnalysisRequest) -> Result<JobHandle, SubmitError> {
        let request = request.validate(self.kind, &self.limits).map_err(|err| {
            veracity_warn!("{} request rejected: {}", self.kind, err);
            err
        })?;
        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        let started_at = self.clock.now_utc();
        let (reporter, rx) =
            watch::channel(AnalysisJob::running(job_id, request.clone(), started_at));

        self.inbox_tx
            .send(DriverInput::Submit {
                job_id,
                request,
                started_at,
                reporter,
            })
            .map_err(|_| SubmitError::Closed)?;
        Ok(JobHandle::new(job_id, self.kind, rx))
    }

    /// Cancels the job behind `handle` if it is still the running one.
    pub fn cancel(&self, handle: &JobHandle) {
        self.send(Msg::CancelRequested {
            job_id: handle.id(),
        });
    }

    /// Clears the panel back to `Idle`, cancelling a running job first.
    pub fn reset(&self) {
        self.send(Msg::ResetRequested);
    }

    pub fn view(&self) -> WorkflowView {
        self.view_rx.borrow().clone()
    }

    /// Receiver notified whenever the panel's view changes.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowView> {
        self.view_rx.clone()
    }

    /// Resolves once every command sent before it has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.inbox_tx.send(DriverInput::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Stops the driver, cancelling a running job.
    pub async fn shutdown(mut self) {
        let _ = self.inbox_tx.send(DriverInput::Shutdown);
        if let Some(driver) = self.driver.take() {
            if let Err(err) = driver.await {
                veracity_warn!("{} workflow driver ended abnormally: {}", self.kind, err);
            }
        }
    }

    fn send(&self, msg: Msg) {
        if self.inbox_tx.send(DriverInput::Msg(msg)).is_err() {
            veracity_debug!("{} workflow is closed; command dropped", self.kind);
        }
    }
}

impl Drop for AnalysisWorkflow {
    fn drop(&mut self) {
        let _ = self.inbox_tx.send(DriverInput::Shutdown);
    }
}

struct JobSlot {
    token: CancellationToken,
    reporter: watch::Sender<AnalysisJob>,
}

struct Driver {
    state: WorkflowState,
    service: Arc<dyn AnalysisService>,
    settings: WorkflowSettings,
    inbox_tx: mpsc::UnboundedSender<DriverInput>,
    view_tx: watch::Sender<WorkflowView>,
    jobs: HashMap<JobId, JobSlot>,
    rng: StdRng,
}

impl Driver {
    async fn run(mut self, mut inbox_rx: mpsc::UnboundedReceiver<DriverInput>) {
        while let Some(input) = inbox_rx.recv().await {
            match input {
                DriverInput::Submit {
                    job_id,
                    request,
                    started_at,
                    reporter,
                } => {
                    self.jobs.insert(
                        job_id,
                        JobSlot {
                            token: CancellationToken::new(),
                            reporter,
                        },
                    );
                    self.apply(Msg::Submitted {
                        job_id,
                        request,
                        started_at,
                    });
                    if !self.state.job().is_some_and(|job| job.id == job_id) {
                        veracity_warn!("Job {} was not started", job_id);
                        self.jobs.remove(&job_id);
                    }
                }
                DriverInput::Msg(msg) => self.apply(msg),
                DriverInput::Flush(done) => {
                    let _ = done.send(());
                }
                DriverInput::Shutdown => break,
            }
        }

        let running = self
            .state
            .job()
            .filter(|job| job.status == JobStatus::Running)
            .map(|job| job.id);
        if let Some(job_id) = running {
            self.apply(Msg::CancelRequested { job_id });
        }
        for (_, slot) in self.jobs.drain() {
            slot.token.cancel();
        }
        veracity_debug!("{} workflow stopped", self.state.kind());
    }

    fn apply(&mut self, msg: Msg) {
        let kind = self.state.kind();
        let state = std::mem::replace(&mut self.state, WorkflowState::new(kind));
        let (next, effects) = update(state, msg);
        self.state = next;

        for effect in effects {
            self.execute(effect);
        }

        if self.state.consume_dirty() {
            self.view_tx.send_replace(self.state.view());
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::StartAnalysis { job_id, request } => self.start(job_id, request),
            Effect::AbortAnalysis { job_id } => {
                if let Some(slot) = self.jobs.get(&job_id) {
                    slot.token.cancel();
                }
            }
            Effect::ProgressChanged { job_id, percent } => {
                // 100 is published together with the terminal record.
                if percent < 100 {
                    if let Some(slot) = self.jobs.get(&job_id) {
                        slot.reporter
                            .send_modify(|job| job.progress_percent = percent);
                    }
                }
            }
            Effect::JobFinished(job) => {
                if let Some(slot) = self.jobs.remove(&job.id) {
                    slot.token.cancel();
                    slot.reporter.send_replace(*job);
                }
            }
            Effect::Cleared => veracity_debug!("{} view cleared", self.state.kind()),
        }
    }

    fn start(&mut self, job_id: JobId, request: ValidatedRequest) {
        let Some(slot) = self.jobs.get(&job_id) else {
            veracity_warn!("No slot for job {}; analysis not dispatched", job_id);
            return;
        };
        let token = slot.token.clone();

        let service = Arc::clone(&self.service);
        let inbox_tx = self.inbox_tx.clone();
        let timeout = self.settings.timeout;
        let service_token = token.clone();
        tokio::spawn(async move {
            let kind = request.kind();
            let msg = tokio::select! {
                _ = service_token.cancelled() => return,
                outcome = tokio::time::timeout(timeout, service.analyze(request.request(), kind)) => {
                    match outcome {
                        Ok(outcome) => Msg::ServiceResponded { job_id, outcome },
                        Err(_) => Msg::TimedOut { job_id, after: timeout },
                    }
                }
            };
            let _ = inbox_tx.send(DriverInput::Msg(msg));
        });

        let mut rng = StdRng::seed_from_u64(self.rng.gen());
        let max_increment = self.settings.max_increment.max(1);
        let tick_interval = self.settings.tick_interval.max(Duration::from_millis(1));
        let inbox_tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            // First tick completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let increment = rng.gen_range(1..=max_increment);
                        let tick = Msg::ProgressTick { job_id, increment };
                        if inbox_tx.send(DriverInput::Msg(tick)).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }
}
