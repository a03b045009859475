//! In-memory stores used by the test suite in place of Postgres.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{repo::AccountStore, repo_types::User},
    error::StoreError,
    movies::{
        repo::CatalogStore,
        repo_types::{Movie, MovieFields},
    },
};

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<User, StoreError> {
        // Check and insert under one write lock, like a unique index would.
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    movies: RwLock<Vec<Movie>>,
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn create(&self, fields: MovieFields) -> Result<Movie, StoreError> {
        let movie = Movie {
            movie_id: Uuid::new_v4(),
            title: fields.title,
            poster_link: fields.poster_link,
            watch_link: fields.watch_link,
        };
        self.movies.write().await.push(movie.clone());
        Ok(movie)
    }

    async fn list_all(&self) -> Result<Vec<Movie>, StoreError> {
        Ok(self.movies.read().await.clone())
    }

    async fn update(&self, id: Uuid, fields: MovieFields) -> Result<Movie, StoreError> {
        let mut movies = self.movies.write().await;
        let movie = movies
            .iter_mut()
            .find(|m| m.movie_id == id)
            .ok_or(StoreError::NotFound)?;
        movie.title = fields.title;
        movie.poster_link = fields.poster_link;
        movie.watch_link = fields.watch_link;
        Ok(movie.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut movies = self.movies.write().await;
        let before = movies.len();
        movies.retain(|m| m.movie_id != id);
        if movies.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str) -> MovieFields {
        MovieFields {
            title: title.into(),
            poster_link: "https://img.example/p.jpg".into(),
            watch_link: "https://watch.example/w".into(),
        }
    }

    #[tokio::test]
    async fn accounts_enforce_unique_email() {
        let store = MemoryAccountStore::default();
        let ann = store.create("ann@x.com", "h1", "Ann").await.unwrap();
        assert!(matches!(
            store.create("ann@x.com", "h2", "Other").await,
            Err(StoreError::DuplicateEmail)
        ));
        assert_eq!(store.find_by_id(ann.id).await.unwrap().unwrap().email, "ann@x.com");
        assert!(store.find_by_email("bob@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn accounts_generate_distinct_ids() {
        let store = MemoryAccountStore::default();
        let a = store.create("a@x.com", "h", "A").await.unwrap();
        let b = store.create("b@x.com", "h", "B").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn catalog_update_and_delete_report_missing_ids() {
        let store = MemoryCatalogStore::default();
        assert!(matches!(
            store.update(Uuid::new_v4(), fields("x")).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(store.delete(Uuid::new_v4()).await, Err(StoreError::NotFound)));

        let movie = store.create(fields("Heat")).await.unwrap();
        store.delete(movie.movie_id).await.unwrap();
        assert!(matches!(store.delete(movie.movie_id).await, Err(StoreError::NotFound)));
    }
}
