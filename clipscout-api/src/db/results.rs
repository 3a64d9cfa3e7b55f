//! Search result persistence and the search/result association

use clipscout_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::models::{SearchResult, StreamingLinks};

/// Insert one result row
pub async fn insert_result(pool: &SqlitePool, result: &SearchResult) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO search_results (
            id, title, platform, url, thumbnail_url, duration, channel_name, view_count,
            netflix_url, prime_url, hulu_url, disney_url, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(result.id.to_string())
    .bind(&result.title)
    .bind(&result.platform)
    .bind(&result.url)
    .bind(&result.thumbnail_url)
    .bind(&result.duration)
    .bind(&result.channel_name)
    .bind(&result.view_count)
    .bind(&result.links.netflix_url)
    .bind(&result.links.prime_url)
    .bind(&result.links.hulu_url)
    .bind(&result.links.disney_url)
    .bind(format_timestamp(&result.created_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Associate a result with a search (idempotent)
pub async fn link_result(pool: &SqlitePool, search_id: Uuid, result_id: Uuid) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO audio_search_results (search_id, result_id) VALUES (?, ?)")
        .bind(search_id.to_string())
        .bind(result_id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

/// Results of one search, newest created first
pub async fn results_for_search(pool: &SqlitePool, search_id: Uuid) -> Result<Vec<SearchResult>> {
    let rows = sqlx::query(
        r#"
        SELECT r.id, r.title, r.platform, r.url, r.thumbnail_url, r.duration, r.channel_name,
               r.view_count, r.netflix_url, r.prime_url, r.hulu_url, r.disney_url, r.created_at
        FROM search_results r
        JOIN audio_search_results l ON l.result_id = r.id
        WHERE l.search_id = ?
        ORDER BY r.created_at DESC, r.rowid DESC
        "#,
    )
    .bind(search_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(result_from_row).collect()
}

fn result_from_row(row: &SqliteRow) -> Result<SearchResult> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");

    Ok(SearchResult {
        id: parse_uuid("id", &id)?,
        title: row.get("title"),
        platform: row.get("platform"),
        url: row.get("url"),
        thumbnail_url: row.get("thumbnail_url"),
        duration: row.get("duration"),
        channel_name: row.get("channel_name"),
        view_count: row.get("view_count"),
        links: StreamingLinks {
            netflix_url: row.get("netflix_url"),
            prime_url: row.get("prime_url"),
            hulu_url: row.get("hulu_url"),
            disney_url: row.get("disney_url"),
        },
        created_at: parse_timestamp("created_at", &created_at)?,
    })
}
