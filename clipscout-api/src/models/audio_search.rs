//! Audio search request model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One user-submitted recognition request
///
/// Created as soon as an upload is accepted; updated once when processing
/// completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioSearch {
    pub id: Uuid,
    /// Path of the stored upload, relative to the media root
    pub audio_file: String,
    pub is_processed: bool,
    /// Seconds spent processing, set on completion
    pub processing_time: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AudioSearch {
    pub fn new(id: Uuid, audio_file: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            audio_file,
            is_processed: false,
            processing_time: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing row for recent searches
#[derive(Debug, Clone, Serialize)]
pub struct AudioSearchSummary {
    #[serde(flatten)]
    pub search: AudioSearch,
    pub result_count: i64,
}
