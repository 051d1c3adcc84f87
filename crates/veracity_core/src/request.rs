use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Upload limit of the media panel.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// The three analysis panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisKind {
    MediaCheck,
    ClaimCheck,
    NewsCheck,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::MediaCheck,
        AnalysisKind::ClaimCheck,
        AnalysisKind::NewsCheck,
    ];

    /// Short, URL-safe name of the panel.
    pub fn slug(self) -> &'static str {
        match self {
            AnalysisKind::MediaCheck => "media",
            AnalysisKind::ClaimCheck => "claim",
            AnalysisKind::NewsCheck => "news",
        }
    }

    pub fn accepts(self, shape: InputShape) -> bool {
        matches!(
            (self, shape),
            (AnalysisKind::MediaCheck, InputShape::File)
                | (AnalysisKind::ClaimCheck, InputShape::Text)
                | (AnalysisKind::ClaimCheck, InputShape::Url)
                | (AnalysisKind::NewsCheck, InputShape::Url)
        )
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::MediaCheck => write!(f, "media check"),
            AnalysisKind::ClaimCheck => write!(f, "claim check"),
            AnalysisKind::NewsCheck => write!(f, "news check"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    File,
    Url,
    Text,
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputShape::File => write!(f, "file"),
            InputShape::Url => write!(f, "url"),
            InputShape::Text => write!(f, "text"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct FileInput {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileInput {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            bytes,
            filename: filename.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    fn is_media(&self) -> bool {
        let essence = self
            .mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        essence.starts_with("image/") || essence.starts_with("video/")
    }
}

// File contents are elided so logs stay readable.
impl fmt::Debug for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInput")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlInput {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisInput {
    File(FileInput),
    Url(UrlInput),
    Text(TextInput),
}

impl AnalysisInput {
    pub fn file(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        AnalysisInput::File(FileInput::new(filename, mime_type, bytes))
    }

    pub fn url(url: impl Into<String>) -> Self {
        AnalysisInput::Url(UrlInput { url: url.into() })
    }

    pub fn text(content: impl Into<String>) -> Self {
        AnalysisInput::Text(TextInput {
            content: content.into(),
        })
    }

    pub fn shape(&self) -> InputShape {
        match self {
            AnalysisInput::File(_) => InputShape::File,
            AnalysisInput::Url(_) => InputShape::Url,
            AnalysisInput::Text(_) => InputShape::Text,
        }
    }

    /// Whether the input carries anything worth analyzing.
    pub fn is_usable(&self) -> bool {
        match self {
            AnalysisInput::File(file) => !file.filename.trim().is_empty(),
            AnalysisInput::Url(url) => !url.url.trim().is_empty(),
            AnalysisInput::Text(text) => !text.content.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_file_bytes: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// User-supplied input for one panel, possibly combining several fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisRequest {
    inputs: Vec<AnalysisInput>,
}

impl AnalysisRequest {
    pub fn new(inputs: Vec<AnalysisInput>) -> Self {
        Self { inputs }
    }

    pub fn single(input: AnalysisInput) -> Self {
        Self::new(vec![input])
    }

    pub fn with(mut self, input: AnalysisInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn inputs(&self) -> &[AnalysisInput] {
        &self.inputs
    }

    pub fn text(&self) -> Option<&str> {
        self.inputs.iter().find_map(|input| match input {
            AnalysisInput::Text(text) => Some(text.content.as_str()),
            _ => None,
        })
    }

    pub fn url(&self) -> Option<&str> {
        self.inputs.iter().find_map(|input| match input {
            AnalysisInput::Url(url) => Some(url.url.as_str()),
            _ => None,
        })
    }

    pub fn file(&self) -> Option<&FileInput> {
        self.inputs.iter().find_map(|input| match input {
            AnalysisInput::File(file) => Some(file),
            _ => None,
        })
    }

    /// Checks the request against what `kind` accepts.
    ///
    /// Unusable fields (blank text, blank URL, nameless file) are dropped; if
    /// nothing remains the request is rejected with
    /// [`ValidationError::EmptyInput`] before any other check runs.
    pub fn validate(
        self,
        kind: AnalysisKind,
        limits: &ValidationLimits,
    ) -> Result<ValidatedRequest, ValidationError> {
        let inputs: Vec<AnalysisInput> = self
            .inputs
            .into_iter()
            .filter(AnalysisInput::is_usable)
            .map(normalize)
            .collect();
        if inputs.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        for input in &inputs {
            if !kind.accepts(input.shape()) {
                return Err(ValidationError::UnsupportedInput {
                    kind,
                    input: input.shape(),
                });
            }
            match input {
                AnalysisInput::Url(url) => check_url(&url.url)?,
                AnalysisInput::File(file) => check_file(file, limits)?,
                AnalysisInput::Text(_) => {}
            }
        }

        Ok(ValidatedRequest {
            kind,
            request: Arc::new(AnalysisRequest { inputs }),
        })
    }
}

fn normalize(input: AnalysisInput) -> AnalysisInput {
    match input {
        AnalysisInput::Url(url) => AnalysisInput::url(url.url.trim()),
        other => other,
    }
}

fn check_url(raw: &str) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = url::Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

fn check_file(file: &FileInput, limits: &ValidationLimits) -> Result<(), ValidationError> {
    if !file.is_media() {
        return Err(ValidationError::UnsupportedMediaType {
            mime_type: file.mime_type.clone(),
        });
    }
    if file.size_bytes > limits.max_file_bytes {
        return Err(ValidationError::FileTooLarge {
            size_bytes: file.size_bytes,
            max_bytes: limits.max_file_bytes,
        });
    }
    Ok(())
}

/// A request that passed [`AnalysisRequest::validate`] for one panel.
///
/// Cloning is cheap; the inputs are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    kind: AnalysisKind,
    request: Arc<AnalysisRequest>,
}

impl ValidatedRequest {
    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }
}
