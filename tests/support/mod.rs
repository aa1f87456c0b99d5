//! In-memory content store shared by the integration tests.

#![allow(dead_code)]

use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use aitoonic::application::repos::{
    AgentQueryFilter, AgentsRepo, AgentsWriteRepo, CategoriesRepo, CategoriesWriteRepo,
    CategoryQueryFilter, HealthRepo, RepoError, ToolQueryFilter, ToolsRepo, ToolsWriteRepo,
    UpsertAgentParams, UpsertCategoryParams, UpsertToolParams,
};
use aitoonic::domain::entities::{
    AgentRecord, CategoryRecord, CategoryWithCount, Feature, PricingPlan, ToolRecord,
};
use aitoonic::domain::slug::slug_from_name;
use aitoonic::domain::types::{AgentStatus, PricingType};
use async_trait::async_trait;
use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

const BASE_TIME: OffsetDateTime = datetime!(2025-01-01 00:00 UTC);

#[derive(Default)]
pub struct MemoryStore {
    categories: Mutex<Vec<CategoryRecord>>,
    tools: Mutex<Vec<ToolRecord>>,
    agents: Mutex<Vec<AgentRecord>>,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Two categories, three tools and two agents (one inactive).
    pub fn seeded() -> Self {
        let store = Self::default();
        let writing = store.add_category("Writing");
        let images = store.add_category("Image Generation");
        store.add_tool("Chat GPT", writing.id, 3);
        store.add_tool("Copy AI", writing.id, 2);
        store.add_tool("Mid Journey", images.id, 1);
        store.add_agent("Auto GPT", AgentStatus::Active);
        store.add_agent("Dormant Bot", AgentStatus::Inactive);
        store
    }

    /// Make every subsequent store call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn category_named(&self, name: &str) -> Option<CategoryRecord> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|category| category.name == name)
            .cloned()
    }

    pub fn add_category(&self, name: &str) -> CategoryRecord {
        let record = CategoryRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} tools"),
            seo_title: None,
            seo_description: None,
            image_url: None,
            image_alt: None,
            created_at: BASE_TIME,
            updated_at: BASE_TIME,
        };
        self.categories.lock().unwrap().push(record.clone());
        record
    }

    pub fn add_tool(&self, name: &str, category_id: Uuid, age_rank: i64) -> ToolRecord {
        let created_at = BASE_TIME + Duration::days(10 - age_rank);
        let record = ToolRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} helps you work faster"),
            url: format!("https://{}.example", slug_from_name(name)),
            category_id,
            image_url: None,
            image_alt: None,
            favicon_url: None,
            rating: Some(4.5),
            seo_title: None,
            seo_description: None,
            how_to_use: Some("Sign up and start typing.".to_string()),
            features: vec![Feature {
                title: "Fast drafts".to_string(),
                description: "Drafts in seconds".to_string(),
            }],
            use_cases: Vec::new(),
            pricing: vec![PricingPlan {
                plan: "Pro".to_string(),
                price: "$20".to_string(),
                features: vec!["Priority access".to_string()],
            }],
            created_at,
            updated_at: created_at,
        };
        self.tools.lock().unwrap().push(record.clone());
        record
    }

    pub fn add_agent(&self, name: &str, status: AgentStatus) -> AgentRecord {
        let record = AgentRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} runs tasks for you"),
            image_url: None,
            image_alt: None,
            seo_title: None,
            seo_description: None,
            capabilities: vec!["Planning".to_string()],
            agent_features: vec!["Memory".to_string()],
            api_endpoint: None,
            pricing_type: PricingType::Freemium,
            status,
            is_featured: false,
            is_verified: true,
            created_at: BASE_TIME,
            updated_at: BASE_TIME,
        };
        self.agents.lock().unwrap().push(record.clone());
        record
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RepoError::from_persistence("store offline"))
        } else {
            Ok(())
        }
    }
}

fn matches_search(search: Option<&String>, name: &str, description: &str) -> bool {
    match search {
        Some(term) => {
            let term = term.trim().to_lowercase();
            name.to_lowercase().contains(&term) || description.to_lowercase().contains(&term)
        }
        None => true,
    }
}

fn apply_limit<T>(mut rows: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(limit as usize);
    }
    rows
}

fn duplicate(names: impl Iterator<Item = (Uuid, String)>, id: Option<Uuid>, name: &str) -> bool {
    names
        .filter(|(existing, _)| Some(*existing) != id)
        .any(|(_, existing)| existing.eq_ignore_ascii_case(name))
}

#[async_trait]
impl CategoriesRepo for MemoryStore {
    async fn list_categories(
        &self,
        filter: &CategoryQueryFilter,
    ) -> Result<Vec<CategoryRecord>, RepoError> {
        self.check()?;
        let mut rows: Vec<CategoryRecord> = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches_search(filter.search.as_ref(), &c.name, &c.description))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let categories = self.list_categories(&CategoryQueryFilter::default()).await?;
        let tools = self.tools.lock().unwrap();
        Ok(categories
            .into_iter()
            .map(|category| CategoryWithCount {
                tool_count: tools
                    .iter()
                    .filter(|tool| tool.category_id == category.id)
                    .count() as i64,
                category,
            })
            .collect())
    }

    async fn find_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CategoryRecord>, RepoError> {
        self.check()?;
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| slug_from_name(&c.name) == slug)
            .cloned())
    }

    async fn find_category_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        self.check()?;
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }
}

#[async_trait]
impl CategoriesWriteRepo for MemoryStore {
    async fn upsert_category(
        &self,
        params: UpsertCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        self.check()?;
        let mut categories = self.categories.lock().unwrap();
        if duplicate(
            categories.iter().map(|c| (c.id, c.name.clone())),
            params.id,
            &params.name,
        ) {
            return Err(RepoError::Duplicate {
                constraint: "categories_name_lower_idx".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        match params.id {
            Some(id) => {
                let existing = categories
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or(RepoError::NotFound)?;
                existing.name = params.name;
                existing.description = params.description;
                existing.seo_title = params.seo_title;
                existing.seo_description = params.seo_description;
                existing.image_url = params.image_url;
                existing.image_alt = params.image_alt;
                existing.updated_at = now;
                Ok(existing.clone())
            }
            None => {
                let record = CategoryRecord {
                    id: Uuid::new_v4(),
                    name: params.name,
                    description: params.description,
                    seo_title: params.seo_title,
                    seo_description: params.seo_description,
                    image_url: params.image_url,
                    image_alt: params.image_alt,
                    created_at: now,
                    updated_at: now,
                };
                categories.push(record.clone());
                Ok(record)
            }
        }
    }
}

#[async_trait]
impl ToolsRepo for MemoryStore {
    async fn list_tools(&self, filter: &ToolQueryFilter) -> Result<Vec<ToolRecord>, RepoError> {
        self.check()?;
        let mut rows: Vec<ToolRecord> = self
            .tools
            .lock()
            .unwrap()
            .iter()
            .filter(|t| filter.category_id.is_none_or(|id| t.category_id == id))
            .filter(|t| filter.exclude_id.is_none_or(|id| t.id != id))
            .filter(|t| matches_search(filter.search.as_ref(), &t.name, &t.description))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apply_limit(rows, filter.limit))
    }

    async fn find_tool_by_slug(&self, slug: &str) -> Result<Option<ToolRecord>, RepoError> {
        self.check()?;
        Ok(self
            .tools
            .lock()
            .unwrap()
            .iter()
            .find(|t| slug_from_name(&t.name) == slug)
            .cloned())
    }

    async fn find_tool_by_id(&self, id: Uuid) -> Result<Option<ToolRecord>, RepoError> {
        self.check()?;
        Ok(self
            .tools
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }
}

#[async_trait]
impl ToolsWriteRepo for MemoryStore {
    async fn upsert_tool(&self, params: UpsertToolParams) -> Result<ToolRecord, RepoError> {
        self.check()?;
        let mut tools = self.tools.lock().unwrap();
        if duplicate(
            tools.iter().map(|t| (t.id, t.name.clone())),
            params.id,
            &params.name,
        ) {
            return Err(RepoError::Duplicate {
                constraint: "tools_name_lower_idx".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let record = ToolRecord {
            id: params.id.unwrap_or_else(Uuid::new_v4),
            name: params.name,
            description: params.description,
            url: params.url,
            category_id: params.category_id,
            image_url: params.image_url,
            image_alt: params.image_alt,
            favicon_url: params.favicon_url,
            rating: params.rating,
            seo_title: params.seo_title,
            seo_description: params.seo_description,
            how_to_use: params.how_to_use,
            features: params.features,
            use_cases: params.use_cases,
            pricing: params.pricing,
            created_at: now,
            updated_at: now,
        };

        match params.id {
            Some(id) => {
                let existing = tools
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or(RepoError::NotFound)?;
                let created_at = existing.created_at;
                *existing = ToolRecord {
                    created_at,
                    ..record
                };
                Ok(existing.clone())
            }
            None => {
                tools.push(record.clone());
                Ok(record)
            }
        }
    }
}

#[async_trait]
impl AgentsRepo for MemoryStore {
    async fn list_agents(&self, filter: &AgentQueryFilter) -> Result<Vec<AgentRecord>, RepoError> {
        self.check()?;
        let mut rows: Vec<AgentRecord> = self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.status.is_none_or(|status| a.status == status))
            .filter(|a| filter.exclude_id.is_none_or(|id| a.id != id))
            .filter(|a| matches_search(filter.search.as_ref(), &a.name, &a.description))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apply_limit(rows, filter.limit))
    }

    async fn find_agent_by_slug(&self, slug: &str) -> Result<Option<AgentRecord>, RepoError> {
        self.check()?;
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .find(|a| slug_from_name(&a.name) == slug)
            .cloned())
    }

    async fn find_agent_by_id(&self, id: Uuid) -> Result<Option<AgentRecord>, RepoError> {
        self.check()?;
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }
}

#[async_trait]
impl AgentsWriteRepo for MemoryStore {
    async fn upsert_agent(&self, params: UpsertAgentParams) -> Result<AgentRecord, RepoError> {
        self.check()?;
        let mut agents = self.agents.lock().unwrap();
        if duplicate(
            agents.iter().map(|a| (a.id, a.name.clone())),
            params.id,
            &params.name,
        ) {
            return Err(RepoError::Duplicate {
                constraint: "agents_name_lower_idx".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let record = AgentRecord {
            id: params.id.unwrap_or_else(Uuid::new_v4),
            name: params.name,
            description: params.description,
            image_url: params.image_url,
            image_alt: params.image_alt,
            seo_title: params.seo_title,
            seo_description: params.seo_description,
            capabilities: params.capabilities,
            agent_features: params.agent_features,
            api_endpoint: params.api_endpoint,
            pricing_type: params.pricing_type,
            status: params.status,
            is_featured: params.is_featured,
            is_verified: params.is_verified,
            created_at: now,
            updated_at: now,
        };

        match params.id {
            Some(id) => {
                let existing = agents
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or(RepoError::NotFound)?;
                let created_at = existing.created_at;
                *existing = AgentRecord {
                    created_at,
                    ..record
                };
                Ok(existing.clone())
            }
            None => {
                agents.push(record.clone());
                Ok(record)
            }
        }
    }
}

#[async_trait]
impl HealthRepo for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        self.check()
    }
}
