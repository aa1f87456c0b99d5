//! Application services for the administrative surface.

pub mod form;

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    AgentQueryFilter, AgentsRepo, AgentsWriteRepo, CategoriesRepo, CategoriesWriteRepo,
    CategoryQueryFilter, RepoError, ToolQueryFilter, ToolsRepo, ToolsWriteRepo,
    UpsertAgentParams, UpsertCategoryParams, UpsertToolParams,
};
use crate::domain::entities::{AgentRecord, CategoryRecord, ToolRecord};
use crate::domain::types::{AgentStatus, PricingType};

use form::{FieldErrors, checkbox, clean, parse_lines, required};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid submission: {0}")]
    Invalid(FieldErrors),
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Which catalog table an admin page manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Tools,
    Categories,
    Agents,
}

impl AdminSection {
    pub const ALL: [AdminSection; 3] = [
        AdminSection::Tools,
        AdminSection::Categories,
        AdminSection::Agents,
    ];

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "tools" => Some(AdminSection::Tools),
            "categories" => Some(AdminSection::Categories),
            "agents" => Some(AdminSection::Agents),
            _ => None,
        }
    }

    pub fn segment(self) -> &'static str {
        match self {
            AdminSection::Tools => "tools",
            AdminSection::Categories => "categories",
            AdminSection::Agents => "agents",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdminSection::Tools => "Tools",
            AdminSection::Categories => "Categories",
            AdminSection::Agents => "Agents",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            AdminSection::Tools => "tool",
            AdminSection::Categories => "category",
            AdminSection::Agents => "agent",
        }
    }

    pub fn list_path(self) -> String {
        format!("/admin/{}", self.segment())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub seo_title: String,
    pub seo_description: String,
    pub image_url: String,
    pub image_alt: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub category_id: String,
    pub image_url: String,
    pub image_alt: String,
    pub favicon_url: String,
    pub rating: String,
    pub seo_title: String,
    pub seo_description: String,
    pub how_to_use: String,
    pub features: String,
    pub use_cases: String,
    pub pricing: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub image_alt: String,
    pub seo_title: String,
    pub seo_description: String,
    pub capabilities: String,
    pub agent_features: String,
    pub api_endpoint: String,
    pub pricing_type: String,
    pub status: String,
    pub is_featured: Option<String>,
    pub is_verified: Option<String>,
}

impl CategoryForm {
    pub fn from_record(record: &CategoryRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            description: record.description.clone(),
            seo_title: record.seo_title.clone().unwrap_or_default(),
            seo_description: record.seo_description.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            image_alt: record.image_alt.clone().unwrap_or_default(),
        }
    }

    pub fn into_params(self) -> Result<UpsertCategoryParams, FieldErrors> {
        let mut errors = FieldErrors::default();
        let id = parse_id(&self.id, &mut errors);
        let name = required(&self.name, "name", "Name is required", &mut errors);
        let description = required(
            &self.description,
            "description",
            "Description is required",
            &mut errors,
        );
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpsertCategoryParams {
            id,
            name,
            description,
            seo_title: clean(&self.seo_title),
            seo_description: clean(&self.seo_description),
            image_url: clean(&self.image_url),
            image_alt: clean(&self.image_alt),
        })
    }
}

impl ToolForm {
    pub fn from_record(record: &ToolRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            description: record.description.clone(),
            url: record.url.clone(),
            category_id: record.category_id.to_string(),
            image_url: record.image_url.clone().unwrap_or_default(),
            image_alt: record.image_alt.clone().unwrap_or_default(),
            favicon_url: record.favicon_url.clone().unwrap_or_default(),
            rating: record.rating.map(|r| r.to_string()).unwrap_or_default(),
            seo_title: record.seo_title.clone().unwrap_or_default(),
            seo_description: record.seo_description.clone().unwrap_or_default(),
            how_to_use: record.how_to_use.clone().unwrap_or_default(),
            features: form::format_features(&record.features),
            use_cases: form::format_use_cases(&record.use_cases),
            pricing: form::format_pricing(&record.pricing),
        }
    }

    pub fn into_params(self) -> Result<UpsertToolParams, FieldErrors> {
        let mut errors = FieldErrors::default();
        let id = parse_id(&self.id, &mut errors);
        let name = required(&self.name, "name", "Name is required", &mut errors);
        let description = required(
            &self.description,
            "description",
            "Description is required",
            &mut errors,
        );
        let url = required(&self.url, "url", "Tool URL is required", &mut errors);
        let category_id = match clean(&self.category_id) {
            None => {
                errors.push("category_id", "Category is required");
                None
            }
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push("category_id", "Category is invalid");
                    None
                }
            },
        };
        let rating = match clean(&self.rating) {
            None => None,
            Some(raw) => match raw.parse::<f32>() {
                Ok(value) if (0.0..=5.0).contains(&value) => Some(value),
                _ => {
                    errors.push("rating", "Rating must be a number between 0 and 5");
                    None
                }
            },
        };

        let Some(category_id) = category_id.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };

        Ok(UpsertToolParams {
            id,
            name,
            description,
            url,
            category_id,
            image_url: clean(&self.image_url),
            image_alt: clean(&self.image_alt),
            favicon_url: clean(&self.favicon_url),
            rating,
            seo_title: clean(&self.seo_title),
            seo_description: clean(&self.seo_description),
            how_to_use: clean(&self.how_to_use),
            features: form::parse_features(&self.features),
            use_cases: form::parse_use_cases(&self.use_cases),
            pricing: form::parse_pricing(&self.pricing),
        })
    }
}

impl AgentForm {
    pub fn from_record(record: &AgentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name.clone(),
            description: record.description.clone(),
            image_url: record.image_url.clone().unwrap_or_default(),
            image_alt: record.image_alt.clone().unwrap_or_default(),
            seo_title: record.seo_title.clone().unwrap_or_default(),
            seo_description: record.seo_description.clone().unwrap_or_default(),
            capabilities: record.capabilities.join("\n"),
            agent_features: record.agent_features.join("\n"),
            api_endpoint: record.api_endpoint.clone().unwrap_or_default(),
            pricing_type: record.pricing_type.as_str().to_string(),
            status: record.status.as_str().to_string(),
            is_featured: record.is_featured.then(|| "on".to_string()),
            is_verified: record.is_verified.then(|| "on".to_string()),
        }
    }

    pub fn into_params(self) -> Result<UpsertAgentParams, FieldErrors> {
        let mut errors = FieldErrors::default();
        let id = parse_id(&self.id, &mut errors);
        let name = required(&self.name, "name", "Name is required", &mut errors);
        let description = required(
            &self.description,
            "description",
            "Description is required",
            &mut errors,
        );
        let pricing_type = self.pricing_type.parse::<PricingType>().unwrap_or_else(|_| {
            errors.push("pricing_type", "Unknown pricing type");
            PricingType::default()
        });
        let status = match clean(&self.status) {
            None => AgentStatus::Active,
            Some(raw) => raw.parse::<AgentStatus>().unwrap_or_else(|_| {
                errors.push("status", "Unknown status");
                AgentStatus::Active
            }),
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpsertAgentParams {
            id,
            name,
            description,
            image_url: clean(&self.image_url),
            image_alt: clean(&self.image_alt),
            seo_title: clean(&self.seo_title),
            seo_description: clean(&self.seo_description),
            capabilities: parse_lines(&self.capabilities),
            agent_features: parse_lines(&self.agent_features),
            api_endpoint: clean(&self.api_endpoint),
            pricing_type,
            status,
            is_featured: checkbox(self.is_featured.as_deref()),
            is_verified: checkbox(self.is_verified.as_deref()),
        })
    }
}

fn parse_id(raw: &str, errors: &mut FieldErrors) -> Option<Uuid> {
    let raw = clean(raw)?;
    match Uuid::parse_str(&raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push("id", "Record id is invalid");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminCounts {
    pub tools: usize,
    pub categories: usize,
    pub agents: usize,
}

#[derive(Clone)]
pub struct AdminCatalogService {
    categories: Arc<dyn CategoriesRepo>,
    tools: Arc<dyn ToolsRepo>,
    agents: Arc<dyn AgentsRepo>,
    categories_writer: Arc<dyn CategoriesWriteRepo>,
    tools_writer: Arc<dyn ToolsWriteRepo>,
    agents_writer: Arc<dyn AgentsWriteRepo>,
}

impl AdminCatalogService {
    pub fn new(
        categories: Arc<dyn CategoriesRepo>,
        tools: Arc<dyn ToolsRepo>,
        agents: Arc<dyn AgentsRepo>,
        categories_writer: Arc<dyn CategoriesWriteRepo>,
        tools_writer: Arc<dyn ToolsWriteRepo>,
        agents_writer: Arc<dyn AgentsWriteRepo>,
    ) -> Self {
        Self {
            categories,
            tools,
            agents,
            categories_writer,
            tools_writer,
            agents_writer,
        }
    }

    pub async fn counts(&self) -> Result<AdminCounts, AdminError> {
        let tools = self.list_tools(None).await?.len();
        let categories = self.list_categories(None).await?.len();
        let agents = self.list_agents(None).await?.len();
        Ok(AdminCounts {
            tools,
            categories,
            agents,
        })
    }

    pub async fn list_tools(&self, search: Option<&str>) -> Result<Vec<ToolRecord>, AdminError> {
        let filter = ToolQueryFilter {
            search: search.and_then(clean),
            ..ToolQueryFilter::default()
        };
        Ok(self.tools.list_tools(&filter).await?)
    }

    pub async fn list_categories(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<CategoryRecord>, AdminError> {
        let filter = CategoryQueryFilter {
            search: search.and_then(clean),
        };
        Ok(self.categories.list_categories(&filter).await?)
    }

    pub async fn list_agents(&self, search: Option<&str>) -> Result<Vec<AgentRecord>, AdminError> {
        let filter = AgentQueryFilter {
            search: search.and_then(clean),
            ..AgentQueryFilter::default()
        };
        Ok(self.agents.list_agents(&filter).await?)
    }

    pub async fn find_tool(&self, id: Uuid) -> Result<ToolRecord, AdminError> {
        self.tools
            .find_tool_by_id(id)
            .await?
            .ok_or(AdminError::NotFound { entity: "tool" })
    }

    pub async fn find_category(&self, id: Uuid) -> Result<CategoryRecord, AdminError> {
        self.categories
            .find_category_by_id(id)
            .await?
            .ok_or(AdminError::NotFound { entity: "category" })
    }

    pub async fn find_agent(&self, id: Uuid) -> Result<AgentRecord, AdminError> {
        self.agents
            .find_agent_by_id(id)
            .await?
            .ok_or(AdminError::NotFound { entity: "agent" })
    }

    pub async fn save_category(&self, form: CategoryForm) -> Result<CategoryRecord, AdminError> {
        let params = form.into_params().map_err(AdminError::Invalid)?;
        let record = self
            .categories_writer
            .upsert_category(params)
            .await
            .map_err(|err| map_write_error(err, "category"))?;
        info!(
            target = "aitoonic::application::admin",
            entity = "category",
            id = %record.id,
            name = %record.name,
            "catalog entry saved"
        );
        Ok(record)
    }

    pub async fn save_tool(&self, form: ToolForm) -> Result<ToolRecord, AdminError> {
        let params = form.into_params().map_err(AdminError::Invalid)?;
        if self
            .categories
            .find_category_by_id(params.category_id)
            .await?
            .is_none()
        {
            return Err(AdminError::Invalid(FieldErrors::single(
                "category_id",
                "Category is required",
            )));
        }

        let record = self
            .tools_writer
            .upsert_tool(params)
            .await
            .map_err(|err| map_write_error(err, "tool"))?;
        info!(
            target = "aitoonic::application::admin",
            entity = "tool",
            id = %record.id,
            name = %record.name,
            "catalog entry saved"
        );
        Ok(record)
    }

    pub async fn save_agent(&self, form: AgentForm) -> Result<AgentRecord, AdminError> {
        let params = form.into_params().map_err(AdminError::Invalid)?;
        let record = self
            .agents_writer
            .upsert_agent(params)
            .await
            .map_err(|err| map_write_error(err, "agent"))?;
        info!(
            target = "aitoonic::application::admin",
            entity = "agent",
            id = %record.id,
            name = %record.name,
            "catalog entry saved"
        );
        Ok(record)
    }
}

fn map_write_error(err: RepoError, entity: &'static str) -> AdminError {
    match err {
        RepoError::Duplicate { .. } => AdminError::Invalid(FieldErrors::single(
            "name",
            format!("A {entity} with this name already exists"),
        )),
        RepoError::NotFound => AdminError::NotFound { entity },
        other => AdminError::Repo(other),
    }
}
