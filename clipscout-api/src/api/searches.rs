//! Read endpoints for past searches
//!
//! GET /api/searches, GET /api/searches/:id

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{AudioSearch, AudioSearchSummary, SearchResult};
use crate::AppState;

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

/// GET /api/searches query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListSearchesQuery {
    pub limit: Option<i64>,
}

impl ListSearchesQuery {
    fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

/// GET /api/searches response
#[derive(Debug, Serialize)]
pub struct ListSearchesResponse {
    pub searches: Vec<AudioSearchSummary>,
}

/// GET /api/searches/:id response
#[derive(Debug, Serialize)]
pub struct SearchDetailResponse {
    pub search: AudioSearch,
    pub results: Vec<SearchResult>,
}

/// GET /api/searches
pub async fn list_searches(
    State(state): State<AppState>,
    Query(query): Query<ListSearchesQuery>,
) -> ApiResult<Json<ListSearchesResponse>> {
    let searches = crate::db::searches::list_searches(&state.db, query.effective_limit()).await?;
    Ok(Json(ListSearchesResponse { searches }))
}

/// GET /api/searches/:id
pub async fn get_search(
    State(state): State<AppState>,
    Path(search_id): Path<Uuid>,
) -> ApiResult<Json<SearchDetailResponse>> {
    let search = crate::db::searches::load_search(&state.db, search_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Search not found: {}", search_id)))?;

    let results = crate::db::results::results_for_search(&state.db, search_id).await?;

    Ok(Json(SearchDetailResponse { search, results }))
}

/// Build search listing routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/api/searches", get(list_searches))
        .route("/api/searches/:id", get(get_search))
}
