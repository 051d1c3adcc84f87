use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::{AnalysisKind, InputShape};

/// Why a request was rejected before a job was created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no input provided")]
    EmptyInput,
    #[error("{kind} does not accept {input} input")]
    UnsupportedInput {
        kind: AnalysisKind,
        input: InputShape,
    },
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unsupported media type '{mime_type}' (expected an image or video)")]
    UnsupportedMediaType { mime_type: String },
    #[error("file is too large ({size_bytes} bytes, limit {max_bytes} bytes)")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
}

/// A result payload that does not match the schema its panel expects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("expected a {expected} result, got a {actual} result")]
    KindMismatch {
        expected: AnalysisKind,
        actual: AnalysisKind,
    },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: String, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Unavailable,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Rejected,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceErrorKind::Unavailable => write!(f, "service unavailable"),
            ServiceErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ServiceErrorKind::Timeout => write!(f, "timeout"),
            ServiceErrorKind::Network => write!(f, "network error"),
            ServiceErrorKind::Decode => write!(f, "malformed response"),
            ServiceErrorKind::Rejected => write!(f, "request rejected"),
        }
    }
}

/// Failure reported by an analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// User-displayable reason a job ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorInfo {
    #[error("analysis failed: {message}")]
    Service { message: String },
    #[error("no response from the analysis service within {:.1}s", .after.as_secs_f64())]
    Timeout { after: Duration },
    #[error("analysis service returned an unusable result: {reason}")]
    InvalidResult { reason: String },
}

impl From<ServiceError> for ErrorInfo {
    fn from(err: ServiceError) -> Self {
        ErrorInfo::Service {
            message: err.to_string(),
        }
    }
}

impl From<SchemaError> for ErrorInfo {
    fn from(err: SchemaError) -> Self {
        ErrorInfo::InvalidResult {
            reason: err.to_string(),
        }
    }
}
