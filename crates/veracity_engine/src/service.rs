use veracity_core::{AnalysisKind, AnalysisRequest, AnalysisResult, ServiceError};

/// Port to whatever performs the actual analysis.
///
/// The workflow calls `analyze` once per submission and awaits exactly one
/// answer. The future may be dropped at any await point when the job is
/// cancelled, times out, or is replaced.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        kind: AnalysisKind,
    ) -> Result<AnalysisResult, ServiceError>;
}
