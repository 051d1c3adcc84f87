//! Veracity engine: runs analysis workflows against a pluggable service.
mod handle;
mod http;
mod service;
mod simulated;
mod types;
mod workflow;

pub use handle::JobHandle;
pub use http::{HttpAnalysisService, HttpSettings};
pub use service::AnalysisService;
pub use simulated::{SimulatedAnalysisService, SimulationSettings};
pub use types::{Clock, FixedClock, SubmitError, SystemClock, WorkflowSettings};
pub use workflow::AnalysisWorkflow;
