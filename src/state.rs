use std::sync::Arc;

use crate::{
    auth::{jwt::TokenService, repo::AccountStore},
    config::AppConfig,
    db,
    movies::repo::CatalogStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let accounts = Arc::new(crate::auth::repo::PgAccountStore::new(pool.clone()))
            as Arc<dyn AccountStore>;
        let catalog =
            Arc::new(crate::movies::repo::PgCatalogStore::new(pool)) as Arc<dyn CatalogStore>;

        Ok(Self::from_parts(Arc::new(config), accounts, catalog))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        accounts: Arc<dyn AccountStore>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt);
        Self {
            config,
            accounts,
            catalog,
            tokens,
        }
    }

    #[cfg(test)]
    pub fn in_memory(config: AppConfig) -> Self {
        use crate::memory::{MemoryAccountStore, MemoryCatalogStore};

        Self::from_parts(
            Arc::new(config),
            Arc::new(MemoryAccountStore::default()),
            Arc::new(MemoryCatalogStore::default()),
        )
    }
}
