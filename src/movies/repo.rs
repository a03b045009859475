use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Movie, MovieFields};
use crate::error::StoreError;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create(&self, fields: MovieFields) -> Result<Movie, StoreError>;
    /// Insertion order.
    async fn list_all(&self) -> Result<Vec<Movie>, StoreError>;
    /// Replaces title and both links. [`StoreError::NotFound`] for an unknown id.
    async fn update(&self, id: Uuid, fields: MovieFields) -> Result<Movie, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgCatalogStore {
    db: PgPool,
}

impl PgCatalogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn create(&self, fields: MovieFields) -> Result<Movie, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (movie_id, title, poster_link, watch_link)
            VALUES ($1, $2, $3, $4)
            RETURNING movie_id, title, poster_link, watch_link
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&fields.title)
        .bind(&fields.poster_link)
        .bind(&fields.watch_link)
        .fetch_one(&self.db)
        .await?;
        Ok(movie)
    }

    async fn list_all(&self) -> Result<Vec<Movie>, StoreError> {
        let rows = sqlx::query_as::<_, Movie>(
            r#"
            SELECT movie_id, title, poster_link, watch_link
            FROM movies
            ORDER BY created_at ASC, movie_id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: Uuid, fields: MovieFields) -> Result<Movie, StoreError> {
        sqlx::query_as::<_, Movie>(
            r#"
            UPDATE movies
               SET title = $2, poster_link = $3, watch_link = $4
             WHERE movie_id = $1
            RETURNING movie_id, title, poster_link, watch_link
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.poster_link)
        .bind(&fields.watch_link)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM movies WHERE movie_id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
