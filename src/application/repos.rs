//! Repository traits describing the content store.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{
    AgentRecord, CategoryRecord, CategoryWithCount, Feature, PricingPlan, ToolRecord, UseCase,
};
use crate::domain::types::{AgentStatus, PricingType};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToolQueryFilter {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub exclude_id: Option<Uuid>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct AgentQueryFilter {
    pub status: Option<AgentStatus>,
    pub search: Option<String>,
    pub exclude_id: Option<Uuid>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryQueryFilter {
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpsertCategoryParams {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpsertToolParams {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub url: String,
    pub category_id: Uuid,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub favicon_url: Option<String>,
    pub rating: Option<f32>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub how_to_use: Option<String>,
    pub features: Vec<Feature>,
    pub use_cases: Vec<UseCase>,
    pub pricing: Vec<PricingPlan>,
}

#[derive(Debug, Clone)]
pub struct UpsertAgentParams {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub capabilities: Vec<String>,
    pub agent_features: Vec<String>,
    pub api_endpoint: Option<String>,
    pub pricing_type: PricingType,
    pub status: AgentStatus,
    pub is_featured: bool,
    pub is_verified: bool,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(
        &self,
        filter: &CategoryQueryFilter,
    ) -> Result<Vec<CategoryRecord>, RepoError>;

    /// Categories with the number of tools filed under each, ordered by name.
    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;

    async fn find_category_by_slug(&self, slug: &str)
    -> Result<Option<CategoryRecord>, RepoError>;

    async fn find_category_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn upsert_category(
        &self,
        params: UpsertCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;
}

#[async_trait]
pub trait ToolsRepo: Send + Sync {
    /// Tools matching the filter, newest first.
    async fn list_tools(&self, filter: &ToolQueryFilter) -> Result<Vec<ToolRecord>, RepoError>;

    async fn find_tool_by_slug(&self, slug: &str) -> Result<Option<ToolRecord>, RepoError>;

    async fn find_tool_by_id(&self, id: Uuid) -> Result<Option<ToolRecord>, RepoError>;
}

#[async_trait]
pub trait ToolsWriteRepo: Send + Sync {
    async fn upsert_tool(&self, params: UpsertToolParams) -> Result<ToolRecord, RepoError>;
}

#[async_trait]
pub trait AgentsRepo: Send + Sync {
    /// Agents matching the filter, newest first.
    async fn list_agents(&self, filter: &AgentQueryFilter) -> Result<Vec<AgentRecord>, RepoError>;

    async fn find_agent_by_slug(&self, slug: &str) -> Result<Option<AgentRecord>, RepoError>;

    async fn find_agent_by_id(&self, id: Uuid) -> Result<Option<AgentRecord>, RepoError>;
}

#[async_trait]
pub trait AgentsWriteRepo: Send + Sync {
    async fn upsert_agent(&self, params: UpsertAgentParams) -> Result<AgentRecord, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
