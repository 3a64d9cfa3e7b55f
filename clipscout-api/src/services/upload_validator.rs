//! Upload validation
//!
//! An upload is accepted when it is present, declares an `audio/*` MIME type,
//! and is at most 10 MiB.

use axum::body::Bytes;
use thiserror::Error;

/// Largest accepted upload in bytes (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Upload validation errors (all map to 400)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("File must be an audio file")]
    NotAudio,

    #[error("File size must be less than 10MB")]
    TooLarge,

    #[error("Invalid upload: {0}")]
    Malformed(String),
}

/// A file received in the `file` form field
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_audio(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("audio/"))
            .unwrap_or(false)
    }
}

/// Validate an upload, returning it when acceptable
pub fn validate_upload(upload: Option<UploadedFile>) -> Result<UploadedFile, UploadError> {
    let upload = upload.ok_or(UploadError::MissingFile)?;

    if !upload.is_audio() {
        return Err(UploadError::NotAudio);
    }

    if upload.size() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }

    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: Option<&str>, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: "clip.mp3".to_string(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn test_missing_file() {
        assert_eq!(validate_upload(None).unwrap_err(), UploadError::MissingFile);
    }

    #[test]
    fn test_accepts_audio_types() {
        for ct in ["audio/mpeg", "audio/wav", "audio/x-m4a", "Audio/Ogg"] {
            assert!(validate_upload(Some(upload(Some(ct), 1024))).is_ok(), "{}", ct);
        }
    }

    #[test]
    fn test_rejects_non_audio_types() {
        for ct in [Some("video/mp4"), Some("application/octet-stream"), Some("text/plain"), None] {
            assert_eq!(
                validate_upload(Some(upload(ct, 1024))).unwrap_err(),
                UploadError::NotAudio
            );
        }
    }

    #[test]
    fn test_size_ceiling_is_inclusive() {
        assert!(validate_upload(Some(upload(Some("audio/mpeg"), MAX_UPLOAD_BYTES))).is_ok());
        assert_eq!(
            validate_upload(Some(upload(Some("audio/mpeg"), MAX_UPLOAD_BYTES + 1))).unwrap_err(),
            UploadError::TooLarge
        );
    }

    #[test]
    fn test_type_checked_before_size() {
        assert_eq!(
            validate_upload(Some(upload(Some("image/png"), MAX_UPLOAD_BYTES + 1))).unwrap_err(),
            UploadError::NotAudio
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(UploadError::MissingFile.to_string(), "No file uploaded");
        assert_eq!(UploadError::NotAudio.to_string(), "File must be an audio file");
        assert_eq!(UploadError::TooLarge.to_string(), "File size must be less than 10MB");
    }
}
