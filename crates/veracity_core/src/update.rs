use veracity_logging::{veracity_debug, veracity_info, veracity_warn};

use crate::{AnalysisJob, Effect, ErrorInfo, JobId, Msg, WorkflowState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages addressed to a job that is not the running one (late ticks, a
/// service answer after cancel, a timeout after completion) are ignored.
pub fn update(mut state: WorkflowState, msg: Msg) -> (WorkflowState, Vec<Effect>) {
    let effects = match msg {
        Msg::Submitted {
            job_id,
            request,
            started_at,
        } => {
            if request.kind() != state.kind() {
                veracity_warn!(
                    "Ignoring {} request submitted to the {} panel",
                    request.kind(),
                    state.kind()
                );
                return (state, Vec::new());
            }
            if state.job().is_some_and(|job| job.id == job_id) {
                return (state, Vec::new());
            }

            let mut effects = cancel_running(&mut state);
            let job = AnalysisJob::running(job_id, request.clone(), started_at);
            state.replace_job(Some(job));
            veracity_info!("{} job {} started", state.kind(), job_id);
            effects.push(Effect::StartAnalysis { job_id, request });
            effects
        }
        Msg::ProgressTick { job_id, increment } => {
            let Some(job) = state.active_job_mut(job_id) else {
                return (state, Vec::new());
            };
            match job.advance(increment) {
                Some(percent) => {
                    state.mark_dirty();
                    vec![Effect::ProgressChanged { job_id, percent }]
                }
                None => Vec::new(),
            }
        }
        Msg::ServiceResponded { job_id, outcome } => {
            let kind = state.kind();
            let Some(job) = state.active_job_mut(job_id) else {
                veracity_debug!("Discarding service response for inactive job {}", job_id);
                return (state, Vec::new());
            };
            match outcome.map_err(ErrorInfo::from).and_then(|result| {
                result
                    .validate(kind)
                    .map(|()| result)
                    .map_err(ErrorInfo::from)
            }) {
                Ok(result) => {
                    veracity_info!(
                        "{} job {} completed: score {:.1}, verdict {}",
                        kind,
                        job_id,
                        result.score(),
                        result.verdict()
                    );
                    job.complete(result);
                }
                Err(error) => {
                    veracity_warn!("{} job {} failed: {}", kind, job_id, error);
                    job.fail(error);
                }
            }
            finished(&mut state, job_id)
        }
        Msg::TimedOut { job_id, after } => {
            let kind = state.kind();
            let Some(job) = state.active_job_mut(job_id) else {
                return (state, Vec::new());
            };
            let error = ErrorInfo::Timeout { after };
            veracity_warn!("{} job {} failed: {}", kind, job_id, error);
            job.fail(error);
            let mut effects = vec![Effect::AbortAnalysis { job_id }];
            effects.extend(finished(&mut state, job_id));
            effects
        }
        Msg::CancelRequested { job_id } => {
            if state.active_job_mut(job_id).is_none() {
                veracity_debug!("Cancel for job {} ignored; not running", job_id);
                return (state, Vec::new());
            }
            cancel_running(&mut state)
        }
        Msg::ResetRequested => {
            let mut effects = cancel_running(&mut state);
            if state.job().is_some() {
                state.replace_job(None);
                veracity_debug!("{} panel reset", state.kind());
                effects.push(Effect::Cleared);
            }
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Cancels the running job, if any, leaving it in place as a terminal record.
fn cancel_running(state: &mut WorkflowState) -> Vec<Effect> {
    let Some(job) = state.running_job_mut() else {
        return Vec::new();
    };
    job.cancel();
    let job_id = job.id;
    veracity_info!("{} job {} cancelled", state.kind(), job_id);
    let mut effects = vec![Effect::AbortAnalysis { job_id }];
    effects.extend(finished(state, job_id));
    effects
}

fn finished(state: &mut WorkflowState, job_id: JobId) -> Vec<Effect> {
    state.mark_dirty();
    state
        .job()
        .filter(|job| job.id == job_id)
        .map(|job| {
            vec![
                Effect::ProgressChanged {
                    job_id,
                    percent: job.progress_percent,
                },
                Effect::JobFinished(Box::new(job.clone())),
            ]
        })
        .unwrap_or_default()
}
