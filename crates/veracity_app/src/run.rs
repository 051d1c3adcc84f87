use std::pin::pin;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use veracity_core::{AnalysisKind, AnalysisRequest, JobStatus};
use veracity_engine::{
    AnalysisService, AnalysisWorkflow, HttpAnalysisService, SimulatedAnalysisService, SubmitError,
    WorkflowSettings,
};
use veracity_logging::{veracity_info, veracity_warn};

use crate::cli::Cli;
use crate::input::build_request;
use crate::render::render_view;
use crate::settings::AppSettings;

const TEMPLATE_PROGRESS: &str = "{spinner} {msg} [{bar:40}] {pos:>3}%";

/// How a run ended, as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The job failed or was cancelled.
    Unsuccessful,
    /// The input was rejected before a job started.
    Invalid,
}

impl Outcome {
    fn from_status(status: JobStatus) -> Self {
        match status {
            JobStatus::Completed => Self::Completed,
            _ => Self::Unsuccessful,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Unsuccessful => 1,
            Self::Invalid => 2,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// Runs one analysis to completion and prints its report.
pub async fn execute(cli: &Cli) -> anyhow::Result<Outcome> {
    let settings = AppSettings::load(cli.config.as_deref())?.with_backend(cli.backend.clone());
    let kind = cli.command.kind();
    let request = build_request(&cli.command, settings.max_file_bytes)?;
    let service = build_service(&settings, cli.seed)?;
    analyze(kind, request, service, settings.workflow_settings(kind, cli.seed)).await
}

async fn analyze(
    kind: AnalysisKind,
    request: AnalysisRequest,
    service: Arc<dyn AnalysisService>,
    settings: WorkflowSettings,
) -> anyhow::Result<Outcome> {
    let workflow = AnalysisWorkflow::spawn(kind, service, settings);
    let handle = match workflow.submit(request) {
        Ok(handle) => handle,
        Err(SubmitError::Invalid(err)) => {
            eprintln!("{kind}: {err}");
            return Ok(Outcome::Invalid);
        }
        Err(err) => return Err(err.into()),
    };

    let bar = progress_bar(kind);
    let mut progress = pin!(handle.progress());
    let mut interruptible = true;
    loop {
        tokio::select! {
            next = progress.next() => match next {
                Some(percent) => bar.set_position(u64::from(percent)),
                None => break,
            },
            signal = tokio::signal::ctrl_c(), if interruptible => match signal {
                Ok(()) => {
                    veracity_info!("Interrupted; cancelling job {}", handle.id());
                    workflow.cancel(&handle);
                }
                Err(err) => {
                    veracity_warn!("Cannot listen for Ctrl-C: {}", err);
                    interruptible = false;
                }
            },
        }
    }
    bar.finish_and_clear();

    let job = handle.wait().await;
    workflow.flush().await;
    println!("{}", render_view(&workflow.view()));
    workflow.shutdown().await;

    Ok(Outcome::from_status(job.status))
}

fn build_service(settings: &AppSettings, seed: Option<u64>) -> anyhow::Result<Arc<dyn AnalysisService>> {
    match &settings.backend_url {
        Some(url) => {
            veracity_info!("Using analysis backend at {}", url);
            let service = HttpAnalysisService::new(settings.http_settings(url))
                .context("creating HTTP client")?;
            Ok(Arc::new(service))
        }
        None => {
            veracity_info!("Using simulated analysis service");
            Ok(Arc::new(SimulatedAnalysisService::new(
                settings.simulation_settings(seed),
            )))
        }
    }
}

fn progress_bar(kind: AnalysisKind) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE_PROGRESS)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    let bar = ProgressBar::new(100).with_style(style);
    bar.set_message(format!("Running {kind}"));
    bar
}
