//! Veracity core: pure analysis workflow state machine and view-model helpers.
mod effect;
mod error;
mod msg;
mod report;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{ErrorInfo, SchemaError, ServiceError, ServiceErrorKind, ValidationError};
pub use msg::Msg;
pub use report::{
    AnalysisResult, BiasRating, ClaimAssessment, ClaimReport, ClaimStatus, FactualityRating,
    MediaReport, MediaVerdict, NewsReport, Reliability, Sentiment, SimilarArticle, SocialMetrics,
    SourceMatch,
};
pub use request::{
    AnalysisInput, AnalysisKind, AnalysisRequest, FileInput, InputShape, TextInput, UrlInput,
    ValidatedRequest, ValidationLimits, DEFAULT_MAX_FILE_BYTES,
};
pub use state::{AnalysisJob, JobId, JobStatus, WorkflowState, PROGRESS_CEILING};
pub use update::update;
pub use view_model::{ResultView, WorkflowView};
