//! Postgres-backed repository implementations.

mod agents;
mod categories;
mod tools;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    Postgres, QueryBuilder,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::{HealthRepo, RepoError};

/// Derives the public slug of a `name` column in SQL, matching `slug_from_name`.
const SLUG_EXPR: &str = r"LOWER(regexp_replace(btrim(name), '\s+', '-', 'g'))";

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    fn push_search<'q>(qb: &mut QueryBuilder<'q, Postgres>, search: Option<&String>) {
        if let Some(search) = search {
            let pattern = format!("%{}%", search.trim());
            qb.push(" AND (name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }

    fn push_limit<'q>(qb: &mut QueryBuilder<'q, Postgres>, limit: Option<u32>) {
        if let Some(limit) = limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }
    }
}

#[async_trait]
impl HealthRepo for PostgresRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(map_sqlx_error)
    }
}
