use std::fs;
use std::path::Path;

use anyhow::Context;
use veracity_core::{AnalysisInput, AnalysisRequest, FileInput};
use veracity_logging::veracity_debug;

use crate::cli::Command;

/// Builds the request for a subcommand. Files larger than `max_file_bytes`
/// are not read; validation rejects them by their size alone.
pub fn build_request(command: &Command, max_file_bytes: u64) -> anyhow::Result<AnalysisRequest> {
    let request = match command {
        Command::Media { file } => AnalysisRequest::single(read_file(file, max_file_bytes)?),
        Command::Claim { text, url } => {
            let mut inputs = Vec::new();
            if let Some(text) = text {
                inputs.push(AnalysisInput::text(text.as_str()));
            }
            if let Some(url) = url {
                inputs.push(AnalysisInput::url(url.as_str()));
            }
            AnalysisRequest::new(inputs)
        }
        Command::News { url } => AnalysisRequest::single(AnalysisInput::url(url.as_str())),
    };
    Ok(request)
}

fn read_file(path: &Path, max_file_bytes: u64) -> anyhow::Result<AnalysisInput> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = media_type_for(path);
    let size_bytes = fs::metadata(path)
        .with_context(|| format!("reading {}", path.display()))?
        .len();

    if size_bytes > max_file_bytes {
        veracity_debug!("{} is {} bytes; not loading it", path.display(), size_bytes);
        return Ok(AnalysisInput::File(FileInput {
            bytes: Vec::new(),
            filename,
            mime_type: mime_type.to_string(),
            size_bytes,
        }));
    }

    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(AnalysisInput::file(filename, mime_type, bytes))
}

/// Media type from the file extension; unknown extensions are reported as
/// opaque binary data.
pub fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use veracity_core::{AnalysisKind, ValidationError, ValidationLimits};

    #[test]
    fn media_types_follow_extension() {
        assert_eq!(media_type_for(Path::new("clip.MOV")), "video/quicktime");
        assert_eq!(media_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(media_type_for(Path::new("no_extension")), "application/octet-stream");
    }

    #[test]
    fn media_file_is_read_with_its_type() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("frame.png");
        fs::write(&path, [1u8, 2, 3, 4]).expect("write frame");

        let request = build_request(&Command::Media { file: path }, 1024).expect("request");

        let file = request.file().expect("file input");
        assert_eq!(file.filename, "frame.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn oversized_file_fails_validation_without_being_read() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("long.mp4");
        fs::write(&path, vec![0u8; 64]).expect("write clip");
        let limits = ValidationLimits { max_file_bytes: 16 };

        let request = build_request(&Command::Media { file: path }, limits.max_file_bytes)
            .expect("request");
        assert!(request.file().is_some_and(|file| file.bytes.is_empty()));

        let err = request
            .validate(AnalysisKind::MediaCheck, &limits)
            .expect_err("too large");
        assert_eq!(
            err,
            ValidationError::FileTooLarge {
                size_bytes: 64,
                max_bytes: 16
            }
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("absent.png");
        let result = build_request(&Command::Media { file: missing }, 1024);
        assert!(result.is_err());
    }

    #[test]
    fn claim_without_inputs_is_empty() {
        let request = build_request(&Command::Claim { text: None, url: None }, 1024).expect("request");
        let err = request
            .validate(AnalysisKind::ClaimCheck, &ValidationLimits::default())
            .expect_err("empty");
        assert_eq!(err, ValidationError::EmptyInput);
    }
}
