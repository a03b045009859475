use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A catalog entry. Links are stored as given and never dereferenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    #[serde(rename = "movieID")]
    pub movie_id: Uuid,
    pub title: String,
    #[serde(rename = "posterLink")]
    pub poster_link: String,
    #[serde(rename = "watchLink")]
    pub watch_link: String,
}

/// The mutable fields of a movie, used for create and full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFields {
    pub title: String,
    pub poster_link: String,
    pub watch_link: String,
}
