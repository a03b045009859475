use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{MovieRequest, MoviesResponse},
    repo_types::{Movie, MovieFields},
};
use crate::{
    error::{AppError, AppResult, StoreError},
    state::AppState,
    validation::{ApiJson, Checks},
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/movies", get(list_movies))
}

pub fn create_routes() -> Router<AppState> {
    Router::new().route("/movies", post(create_movie))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/movies/:id", put(update_movie).delete(delete_movie))
}

/// Ids that are not UUIDs cannot name a movie.
fn parse_movie_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("movie"))
}

fn validated_fields(state: &AppState, body: MovieRequest) -> AppResult<MovieFields> {
    Checks::new()
        .not_blank(&body.title, "title")
        .not_blank(&body.poster_link, "posterLink")
        .not_blank(&body.watch_link, "watchLink")
        .finish(state)?;
    Ok(MovieFields {
        title: body.title.trim().to_string(),
        poster_link: body.poster_link.trim().to_string(),
        watch_link: body.watch_link.trim().to_string(),
    })
}

fn movie_not_found(e: StoreError, id: Uuid) -> AppError {
    match e {
        StoreError::NotFound => {
            warn!(movie_id = %id, "movie not found");
            AppError::NotFound("movie")
        }
        other => other.into(),
    }
}

#[instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<MoviesResponse>> {
    let movies = state.catalog.list_all().await?;
    Ok(Json(MoviesResponse {
        movies_data: movies,
    }))
}

#[instrument(skip(state, body))]
pub async fn create_movie(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MovieRequest>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let fields = validated_fields(&state, body)?;
    let movie = state.catalog.create(fields).await?;
    info!(movie_id = %movie.movie_id, title = %movie.title, "movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

#[instrument(skip(state, body))]
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<MovieRequest>,
) -> AppResult<Json<Movie>> {
    let id = parse_movie_id(&id)?;
    let fields = validated_fields(&state, body)?;
    let movie = state
        .catalog
        .update(id, fields)
        .await
        .map_err(|e| movie_not_found(e, id))?;
    info!(movie_id = %movie.movie_id, "movie updated");
    Ok(Json(movie))
}

#[instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_movie_id(&id)?;
    state
        .catalog
        .delete(id)
        .await
        .map_err(|e| movie_not_found(e, id))?;
    info!(movie_id = %id, "movie deleted");
    Ok(StatusCode::NO_CONTENT)
}
