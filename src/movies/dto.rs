use serde::{Deserialize, Serialize};

use super::repo_types::Movie;

/// Body of `POST /movies` and `PUT /movies/:id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    pub title: String,
    pub poster_link: String,
    pub watch_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviesResponse {
    pub movies_data: Vec<Movie>,
}
