use crate::{AnalysisKind, AnalysisResult, JobId, JobStatus, MediaVerdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowView {
    pub kind: AnalysisKind,
    pub status: JobStatus,
    pub job_id: Option<JobId>,
    pub progress_percent: u8,
    pub result: Option<ResultView>,
    pub error_message: Option<String>,
}

impl WorkflowView {
    pub fn idle(kind: AnalysisKind) -> Self {
        Self {
            kind,
            status: JobStatus::Idle,
            job_id: None,
            progress_percent: 0,
            result: None,
            error_message: None,
        }
    }
}

/// Display-ready rendering of an [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub headline: String,
    pub score_label: String,
    pub verdict: String,
    pub details: Vec<String>,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let verdict = result.verdict();
        match result {
            AnalysisResult::Media(report) => {
                let headline = match report.verdict {
                    MediaVerdict::Manipulated => "Potential Deep Fake Detected",
                    MediaVerdict::Authentic => "Content Appears Authentic",
                };
                let mut details = report.details.clone();
                details.push(format!(
                    "Processing time: {}s",
                    report.processing_time_seconds
                ));
                Self {
                    headline: headline.to_string(),
                    score_label: format!("{:.1}% Confidence", report.confidence_percent),
                    verdict,
                    details,
                }
            }
            AnalysisResult::Claim(report) => {
                let sources = report.sources.iter().map(|source| {
                    format!(
                        "Source: {} ({} reliability, {}% match) {}",
                        source.name, source.reliability, source.match_percent, source.url
                    )
                });
                let claims = report.claims.iter().map(|claim| {
                    format!(
                        "Claim [{}, {:.1}% confidence]: {}",
                        claim.status, claim.confidence_percent, claim.text
                    )
                });
                Self {
                    headline: report.summary.clone(),
                    score_label: format!("{:.1}% Credible", report.credibility_percent),
                    verdict,
                    details: sources.chain(claims).collect(),
                }
            }
            AnalysisResult::News(report) => {
                let metrics = &report.social_metrics;
                let mut details = vec![
                    format!(
                        "Source credibility: {:.0}%",
                        report.source_credibility_percent
                    ),
                    format!("Published: {}", report.publish_date.format("%Y-%m-%d")),
                    format!(
                        "Social: {:.1}K shares, {} engagements, {} sentiment",
                        metrics.shares as f64 / 1000.0,
                        group_thousands(metrics.engagement),
                        metrics.sentiment.to_string().to_uppercase()
                    ),
                ];
                details.extend(report.similar_articles.iter().map(|article| {
                    format!(
                        "Similar: {} ({}, {}% match) {}",
                        article.title, article.source, article.similarity_percent, article.url
                    )
                }));
                details.extend(
                    report
                        .warnings
                        .iter()
                        .map(|warning| format!("Warning: {warning}")),
                );
                Self {
                    headline: format!(
                        "{} bias, {} factuality",
                        capitalize(&report.bias_rating.to_string()),
                        report.factuality_rating
                    ),
                    score_label: format!("{:.0}% Authentic", report.authenticity_percent),
                    verdict,
                    details,
                }
            }
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
