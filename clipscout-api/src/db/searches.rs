//! Audio search persistence

use chrono::Utc;
use clipscout_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::models::{AudioSearch, AudioSearchSummary};

/// Insert a newly accepted search
pub async fn insert_search(pool: &SqlitePool, search: &AudioSearch) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audio_searches (id, audio_file, is_processed, processing_time, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(search.id.to_string())
    .bind(&search.audio_file)
    .bind(search.is_processed)
    .bind(search.processing_time)
    .bind(format_timestamp(&search.created_at))
    .bind(format_timestamp(&search.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Mark a search processed and record how long it took
pub async fn mark_processed(pool: &SqlitePool, search_id: Uuid, processing_time: f64) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE audio_searches
        SET is_processed = 1, processing_time = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(processing_time)
    .bind(format_timestamp(&Utc::now()))
    .bind(search_id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one search by id
pub async fn load_search(pool: &SqlitePool, search_id: Uuid) -> Result<Option<AudioSearch>> {
    let row = sqlx::query(
        r#"
        SELECT id, audio_file, is_processed, processing_time, created_at, updated_at
        FROM audio_searches
        WHERE id = ?
        "#,
    )
    .bind(search_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(search_from_row).transpose()
}

/// Most recent searches first, with their result counts
pub async fn list_searches(pool: &SqlitePool, limit: i64) -> Result<Vec<AudioSearchSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.audio_file, s.is_processed, s.processing_time, s.created_at, s.updated_at,
               (SELECT COUNT(*) FROM audio_search_results l WHERE l.search_id = s.id) AS result_count
        FROM audio_searches s
        ORDER BY s.created_at DESC, s.rowid DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(AudioSearchSummary {
                search: search_from_row(row)?,
                result_count: row.get("result_count"),
            })
        })
        .collect()
}

fn search_from_row(row: &SqliteRow) -> Result<AudioSearch> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(AudioSearch {
        id: parse_uuid("id", &id)?,
        audio_file: row.get("audio_file"),
        is_processed: row.get("is_processed"),
        processing_time: row.get("processing_time"),
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}
