//! Upload file storage
//!
//! Accepted uploads are written under `<media root>/audio_searches/`. The
//! path stored on the search row is relative to the media root.

use clipscout_common::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::services::upload_validator::UploadedFile;

/// Namespace for uploaded clips inside the media root
pub const UPLOAD_NAMESPACE: &str = "audio_searches";

/// Writes uploads to the media root
#[derive(Debug, Clone)]
pub struct UploadStore {
    media_root: PathBuf,
}

impl UploadStore {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Store an upload for a search, returning its relative path
    pub async fn save(&self, search_id: Uuid, upload: &UploadedFile) -> Result<String> {
        let relative = format!(
            "{}/{}_{}",
            UPLOAD_NAMESPACE,
            search_id,
            sanitize_file_name(&upload.file_name)
        );

        let target = self.media_root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &upload.bytes).await?;

        tracing::debug!(path = %target.display(), size = upload.size(), "Upload stored");

        Ok(relative)
    }
}

/// Keep ASCII alphanumerics, '.', '-' and '_'; replace everything else
///
/// Path separators never survive, so the name cannot escape the namespace.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
