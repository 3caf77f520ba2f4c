use axum::extract::{Path, Query, State};
use std::collections::HashMap;
use tracing::debug;

use super::error::ApiError;
use super::params::ListQuery;
use crate::server::AppState;
use crate::tmdb::MoviePayload;

/// `GET /api/movies/:id`: movie detail with credits and external ids.
///
/// Also mounted at `/api/movies/`, where the id is absent.
pub async fn get_movie(
    State(state): State<AppState>,
    id: Option<Path<String>>,
) -> Result<MoviePayload, ApiError> {
    let api_key = state
        .config
        .tmdb
        .credential()
        .ok_or(ApiError::MissingCredential)?;

    let id = id
        .map(|Path(id)| id)
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingIdentifier)?;

    debug!(id = %id, "movie detail");
    let payload = state.movies.movie_detail(api_key, &id).await?;
    Ok(payload)
}

/// `GET /api/movies/popular?category=..&page=..`
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<MoviePayload, ApiError> {
    let api_key = state
        .config
        .tmdb
        .credential()
        .ok_or(ApiError::MissingCredential)?;

    let query = ListQuery::from_params(
        params.get("category").map(String::as_str),
        params.get("page").map(String::as_str),
    );

    debug!(category = %query.category, page = query.page, "movie list");
    let payload = state
        .movies
        .movie_list(api_key, query.category, query.page)
        .await?;
    Ok(payload)
}
