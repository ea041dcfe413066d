//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::db::DbPool;
use crate::swapi::SwapiClient;

/// Handle passed to every request: pool, token keys and catalog client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: DbPool,
    tokens: TokenKeys,
    swapi: SwapiClient,
}

impl AppState {
    pub fn new(pool: DbPool, tokens: TokenKeys, swapi: SwapiClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pool, tokens, swapi }),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.inner.pool
    }

    pub fn tokens(&self) -> &TokenKeys {
        &self.inner.tokens
    }

    pub fn swapi(&self) -> &SwapiClient {
        &self.inner.swapi
    }
}
