use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CategoriesRepo, CategoriesWriteRepo, CategoryQueryFilter, RepoError, UpsertCategoryParams,
    },
    domain::entities::{CategoryRecord, CategoryWithCount},
};

use super::{PostgresRepositories, SLUG_EXPR, map_sqlx_error};

const CATEGORY_COLUMNS: &str = "id, name, description, seo_title, seo_description, image_url, image_alt, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: String,
    seo_title: Option<String>,
    seo_description: Option<String>,
    image_url: Option<String>,
    image_alt: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            seo_title: row.seo_title,
            seo_description: row.seo_description,
            image_url: row.image_url,
            image_alt: row.image_alt,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryCountRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    tool_count: i64,
}

#[async_trait]
impl CategoriesRepo for PostgresRepositories {
    async fn list_categories(
        &self,
        filter: &CategoryQueryFilter,
    ) -> Result<Vec<CategoryRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE TRUE"
        ));
        Self::push_search(&mut qb, filter.search.as_ref());
        qb.push(" ORDER BY name");

        let rows = qb
            .build_query_as::<CategoryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }

    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r#"
            SELECT
                c.id, c.name, c.description, c.seo_title, c.seo_description,
                c.image_url, c.image_alt, c.created_at, c.updated_at,
                COUNT(t.id) AS tool_count
            FROM categories c
            LEFT JOIN tools t ON t.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryWithCount {
                category: row.category.into(),
                tool_count: row.tool_count,
            })
            .collect())
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CategoryRecord>, RepoError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE {SLUG_EXPR} = $1 LIMIT 1");
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }

    async fn find_category_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }
}

#[async_trait]
impl CategoriesWriteRepo for PostgresRepositories {
    async fn upsert_category(
        &self,
        params: UpsertCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let UpsertCategoryParams {
            id,
            name,
            description,
            seo_title,
            seo_description,
            image_url,
            image_alt,
        } = params;

        let sql = match id {
            Some(_) => format!(
                "UPDATE categories SET name = $2, description = $3, seo_title = $4, \
                 seo_description = $5, image_url = $6, image_alt = $7, updated_at = now() \
                 WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
            ),
            None => format!(
                "INSERT INTO categories (id, name, description, seo_title, seo_description, image_url, image_alt) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {CATEGORY_COLUMNS}"
            ),
        };

        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id.unwrap_or_else(Uuid::new_v4))
            .bind(name)
            .bind(description)
            .bind(seo_title)
            .bind(seo_description)
            .bind(image_url)
            .bind(image_alt)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }
}
