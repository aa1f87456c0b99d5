use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        AgentQueryFilter, AgentsRepo, AgentsWriteRepo, RepoError, UpsertAgentParams,
    },
    domain::entities::AgentRecord,
    domain::types::{AgentStatus, PricingType},
};

use super::{PostgresRepositories, SLUG_EXPR, map_sqlx_error};

const AGENT_COLUMNS: &str = "id, name, description, image_url, image_alt, seo_title, \
    seo_description, capabilities, agent_features, api_endpoint, pricing_type, status, \
    is_featured, is_verified, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    name: String,
    description: String,
    image_url: Option<String>,
    image_alt: Option<String>,
    seo_title: Option<String>,
    seo_description: Option<String>,
    capabilities: Vec<String>,
    agent_features: Vec<String>,
    api_endpoint: Option<String>,
    pricing_type: String,
    status: String,
    is_featured: bool,
    is_verified: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<AgentRow> for AgentRecord {
    type Error = RepoError;

    fn try_from(row: AgentRow) -> Result<Self, Self::Error> {
        let pricing_type = row
            .pricing_type
            .parse::<PricingType>()
            .map_err(|err| RepoError::Integrity {
                message: err.to_string(),
            })?;
        let status = row
            .status
            .parse::<AgentStatus>()
            .map_err(|err| RepoError::Integrity {
                message: err.to_string(),
            })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            image_alt: row.image_alt,
            seo_title: row.seo_title,
            seo_description: row.seo_description,
            capabilities: row.capabilities,
            agent_features: row.agent_features,
            api_endpoint: row.api_endpoint,
            pricing_type,
            status,
            is_featured: row.is_featured,
            is_verified: row.is_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl AgentsRepo for PostgresRepositories {
    async fn list_agents(&self, filter: &AgentQueryFilter) -> Result<Vec<AgentRecord>, RepoError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {AGENT_COLUMNS} FROM agents WHERE TRUE"));
        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status.as_str());
        }
        if let Some(exclude_id) = filter.exclude_id {
            qb.push(" AND id <> ");
            qb.push_bind(exclude_id);
        }
        Self::push_search(&mut qb, filter.search.as_ref());
        qb.push(" ORDER BY created_at DESC, id");
        Self::push_limit(&mut qb, filter.limit);

        let rows = qb
            .build_query_as::<AgentRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(AgentRecord::try_from).collect()
    }

    async fn find_agent_by_slug(&self, slug: &str) -> Result<Option<AgentRecord>, RepoError> {
        let sql = format!("SELECT {AGENT_COLUMNS} FROM agents WHERE {SLUG_EXPR} = $1 LIMIT 1");
        let row = sqlx::query_as::<_, AgentRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(AgentRecord::try_from).transpose()
    }

    async fn find_agent_by_id(&self, id: Uuid) -> Result<Option<AgentRecord>, RepoError> {
        let sql = format!("SELECT {AGENT_COLUMNS} FROM agents WHERE id = $1");
        let row = sqlx::query_as::<_, AgentRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(AgentRecord::try_from).transpose()
    }
}

#[async_trait]
impl AgentsWriteRepo for PostgresRepositories {
    async fn upsert_agent(&self, params: UpsertAgentParams) -> Result<AgentRecord, RepoError> {
        let UpsertAgentParams {
            id,
            name,
            description,
            image_url,
            image_alt,
            seo_title,
            seo_description,
            capabilities,
            agent_features,
            api_endpoint,
            pricing_type,
            status,
            is_featured,
            is_verified,
        } = params;

        let sql = match id {
            Some(_) => format!(
                "UPDATE agents SET name = $2, description = $3, image_url = $4, image_alt = $5, \
                 seo_title = $6, seo_description = $7, capabilities = $8, agent_features = $9, \
                 api_endpoint = $10, pricing_type = $11, status = $12, is_featured = $13, \
                 is_verified = $14, updated_at = now() \
                 WHERE id = $1 RETURNING {AGENT_COLUMNS}"
            ),
            None => format!(
                "INSERT INTO agents (id, name, description, image_url, image_alt, seo_title, \
                 seo_description, capabilities, agent_features, api_endpoint, pricing_type, status, \
                 is_featured, is_verified) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
                 RETURNING {AGENT_COLUMNS}"
            ),
        };

        let row = sqlx::query_as::<_, AgentRow>(&sql)
            .bind(id.unwrap_or_else(Uuid::new_v4))
            .bind(name)
            .bind(description)
            .bind(image_url)
            .bind(image_alt)
            .bind(seo_title)
            .bind(seo_description)
            .bind(capabilities)
            .bind(agent_features)
            .bind(api_endpoint)
            .bind(pricing_type.as_str())
            .bind(status.as_str())
            .bind(is_featured)
            .bind(is_verified)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        row.try_into()
    }
}
