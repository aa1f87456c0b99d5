use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, types::Json};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{RepoError, ToolQueryFilter, ToolsRepo, ToolsWriteRepo, UpsertToolParams},
    domain::entities::{Feature, PricingPlan, ToolRecord, UseCase},
};

use super::{PostgresRepositories, SLUG_EXPR, map_sqlx_error};

const TOOL_COLUMNS: &str = "id, name, description, url, category_id, image_url, image_alt, \
    favicon_url, rating, seo_title, seo_description, how_to_use, features, use_cases, pricing, \
    created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ToolRow {
    id: Uuid,
    name: String,
    description: String,
    url: String,
    category_id: Uuid,
    image_url: Option<String>,
    image_alt: Option<String>,
    favicon_url: Option<String>,
    rating: Option<f32>,
    seo_title: Option<String>,
    seo_description: Option<String>,
    how_to_use: Option<String>,
    features: Json<Vec<Feature>>,
    use_cases: Json<Vec<UseCase>>,
    pricing: Json<Vec<PricingPlan>>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ToolRow> for ToolRecord {
    fn from(row: ToolRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            url: row.url,
            category_id: row.category_id,
            image_url: row.image_url,
            image_alt: row.image_alt,
            favicon_url: row.favicon_url,
            rating: row.rating,
            seo_title: row.seo_title,
            seo_description: row.seo_description,
            how_to_use: row.how_to_use,
            features: row.features.0,
            use_cases: row.use_cases.0,
            pricing: row.pricing.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ToolsRepo for PostgresRepositories {
    async fn list_tools(&self, filter: &ToolQueryFilter) -> Result<Vec<ToolRecord>, RepoError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {TOOL_COLUMNS} FROM tools WHERE TRUE"));
        if let Some(category_id) = filter.category_id {
            qb.push(" AND category_id = ");
            qb.push_bind(category_id);
        }
        if let Some(exclude_id) = filter.exclude_id {
            qb.push(" AND id <> ");
            qb.push_bind(exclude_id);
        }
        Self::push_search(&mut qb, filter.search.as_ref());
        qb.push(" ORDER BY created_at DESC, id");
        Self::push_limit(&mut qb, filter.limit);

        let rows = qb
            .build_query_as::<ToolRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ToolRecord::from).collect())
    }

    async fn find_tool_by_slug(&self, slug: &str) -> Result<Option<ToolRecord>, RepoError> {
        let sql = format!("SELECT {TOOL_COLUMNS} FROM tools WHERE {SLUG_EXPR} = $1 LIMIT 1");
        let row = sqlx::query_as::<_, ToolRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ToolRecord::from))
    }

    async fn find_tool_by_id(&self, id: Uuid) -> Result<Option<ToolRecord>, RepoError> {
        let sql = format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = $1");
        let row = sqlx::query_as::<_, ToolRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ToolRecord::from))
    }
}

#[async_trait]
impl ToolsWriteRepo for PostgresRepositories {
    async fn upsert_tool(&self, params: UpsertToolParams) -> Result<ToolRecord, RepoError> {
        let UpsertToolParams {
            id,
            name,
            description,
            url,
            category_id,
            image_url,
            image_alt,
            favicon_url,
            rating,
            seo_title,
            seo_description,
            how_to_use,
            features,
            use_cases,
            pricing,
        } = params;

        let sql = match id {
            Some(_) => format!(
                "UPDATE tools SET name = $2, description = $3, url = $4, category_id = $5, \
                 image_url = $6, image_alt = $7, favicon_url = $8, rating = $9, seo_title = $10, \
                 seo_description = $11, how_to_use = $12, features = $13, use_cases = $14, \
                 pricing = $15, updated_at = now() \
                 WHERE id = $1 RETURNING {TOOL_COLUMNS}"
            ),
            None => format!(
                "INSERT INTO tools (id, name, description, url, category_id, image_url, image_alt, \
                 favicon_url, rating, seo_title, seo_description, how_to_use, features, use_cases, pricing) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
                 RETURNING {TOOL_COLUMNS}"
            ),
        };

        let row = sqlx::query_as::<_, ToolRow>(&sql)
            .bind(id.unwrap_or_else(Uuid::new_v4))
            .bind(name)
            .bind(description)
            .bind(url)
            .bind(category_id)
            .bind(image_url)
            .bind(image_alt)
            .bind(favicon_url)
            .bind(rating)
            .bind(seo_title)
            .bind(seo_description)
            .bind(how_to_use)
            .bind(Json(features))
            .bind(Json(use_cases))
            .bind(Json(pricing))
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }
}
