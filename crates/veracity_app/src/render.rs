use veracity_core::{JobStatus, WorkflowView};

/// Plain-text report for a panel's final view.
pub fn render_view(view: &WorkflowView) -> String {
    let mut lines = vec![format!(
        "{}: {}",
        view.kind.to_string().to_uppercase(),
        status_label(view.status)
    )];

    if let Some(result) = &view.result {
        lines.push(result.headline.clone());
        lines.push(format!("{} ({})", result.score_label, result.verdict));
        lines.extend(result.details.iter().map(|detail| format!("  - {detail}")));
    }
    if let Some(message) = &view.error_message {
        lines.push(message.clone());
    }
    if view.status == JobStatus::Cancelled {
        lines.push("Analysis cancelled; no result.".to_string());
    }

    lines.join("\n")
}

fn status_label(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Idle => "idle",
        JobStatus::Running => "running",
        JobStatus::Completed => "completed",
        JobStatus::Cancelled => "cancelled",
        JobStatus::Failed => "failed",
    }
}
