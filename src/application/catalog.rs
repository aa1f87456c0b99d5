//! Read-side catalog queries used by page renderers.
//!
//! Store failures never surface to visitors: every query degrades to an empty
//! or missing result, logs at `warn` and bumps `aitoonic_store_degraded_total`
//! so operators can tell "no data" apart from "store unavailable".

use std::{fmt::Display, sync::Arc};

use tracing::warn;

use crate::application::repos::{
    AgentQueryFilter, AgentsRepo, CategoriesRepo, CategoryQueryFilter, ToolQueryFilter, ToolsRepo,
};
use crate::domain::entities::{AgentRecord, CategoryRecord, CategoryWithCount, ToolRecord};
use crate::domain::slug::normalize_slug;
use crate::domain::types::AgentStatus;

const HOME_CATEGORY_WINDOW: usize = 10;
const HOME_LATEST_TOOLS: u32 = 50;
const HOME_FEATURED_TOOLS: usize = 12;
const SIMILAR_TOOLS: u32 = 4;
const SIMILAR_AGENTS: u32 = 3;

#[derive(Debug, Clone, Default)]
pub struct HomeCatalog {
    /// Categories that have tools, busiest first.
    pub categories: Vec<CategoryWithCount>,
    pub latest_tools: Vec<ToolRecord>,
    pub featured_tools: Vec<ToolRecord>,
}

#[derive(Debug, Clone)]
pub struct CategoryDetail {
    pub category: CategoryRecord,
    pub tools: Vec<ToolRecord>,
}

#[derive(Debug, Clone)]
pub struct ToolDetail {
    pub tool: ToolRecord,
    pub category: Option<CategoryRecord>,
    pub similar: Vec<ToolRecord>,
}

#[derive(Debug, Clone)]
pub struct AgentDetail {
    pub agent: AgentRecord,
    pub others: Vec<AgentRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub tools: Vec<ToolRecord>,
    pub categories: Vec<CategoryRecord>,
    pub agents: Vec<AgentRecord>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.categories.is_empty() && self.agents.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub tools: Vec<ToolRecord>,
    pub categories: Vec<CategoryRecord>,
    pub agents: Vec<AgentRecord>,
}

#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn CategoriesRepo>,
    tools: Arc<dyn ToolsRepo>,
    agents: Arc<dyn AgentsRepo>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoriesRepo>,
        tools: Arc<dyn ToolsRepo>,
        agents: Arc<dyn AgentsRepo>,
    ) -> Self {
        Self {
            categories,
            tools,
            agents,
        }
    }

    pub async fn home(&self) -> HomeCatalog {
        let counts = degrade(
            "home.categories",
            self.categories.list_categories_with_counts().await,
        );
        let mut categories: Vec<_> = counts
            .into_iter()
            .take(HOME_CATEGORY_WINDOW)
            .filter(|entry| entry.tool_count > 0)
            .collect();
        categories.sort_by(|a, b| b.tool_count.cmp(&a.tool_count));

        let filter = ToolQueryFilter {
            limit: Some(HOME_LATEST_TOOLS),
            ..ToolQueryFilter::default()
        };
        let latest_tools = degrade("home.tools", self.tools.list_tools(&filter).await);
        let featured_tools = latest_tools
            .iter()
            .take(HOME_FEATURED_TOOLS)
            .cloned()
            .collect();

        HomeCatalog {
            categories,
            latest_tools,
            featured_tools,
        }
    }

    pub async fn categories_with_counts(&self) -> Vec<CategoryWithCount> {
        degrade(
            "categories.with_counts",
            self.categories.list_categories_with_counts().await,
        )
    }

    pub async fn all_categories(&self) -> Vec<CategoryRecord> {
        degrade(
            "categories.list",
            self.categories
                .list_categories(&CategoryQueryFilter::default())
                .await,
        )
    }

    pub async fn category(&self, slug: &str) -> Option<CategoryDetail> {
        let slug = normalize_slug(slug);
        let category = degrade(
            "category.find",
            self.categories.find_category_by_slug(&slug).await,
        )?;

        let filter = ToolQueryFilter {
            category_id: Some(category.id),
            ..ToolQueryFilter::default()
        };
        let tools = degrade("category.tools", self.tools.list_tools(&filter).await);

        Some(CategoryDetail { category, tools })
    }

    pub async fn tool(&self, slug: &str) -> Option<ToolDetail> {
        let slug = normalize_slug(slug);
        let tool = degrade("tool.find", self.tools.find_tool_by_slug(&slug).await)?;

        let category = degrade(
            "tool.category",
            self.categories.find_category_by_id(tool.category_id).await,
        );
        let filter = ToolQueryFilter {
            category_id: Some(tool.category_id),
            exclude_id: Some(tool.id),
            limit: Some(SIMILAR_TOOLS),
            ..ToolQueryFilter::default()
        };
        let similar = degrade("tool.similar", self.tools.list_tools(&filter).await);

        Some(ToolDetail {
            tool,
            category,
            similar,
        })
    }

    pub async fn active_agents(&self) -> Vec<AgentRecord> {
        let filter = AgentQueryFilter {
            status: Some(AgentStatus::Active),
            ..AgentQueryFilter::default()
        };
        degrade("agents.active", self.agents.list_agents(&filter).await)
    }

    pub async fn agent(&self, slug: &str) -> Option<AgentDetail> {
        let slug = normalize_slug(slug);
        let agent = degrade("agent.find", self.agents.find_agent_by_slug(&slug).await)?;

        let filter = AgentQueryFilter {
            status: Some(AgentStatus::Active),
            exclude_id: Some(agent.id),
            limit: Some(SIMILAR_AGENTS),
            ..AgentQueryFilter::default()
        };
        let others = degrade("agent.others", self.agents.list_agents(&filter).await);

        Some(AgentDetail { agent, others })
    }

    pub async fn search(&self, query: &str) -> SearchResults {
        let query = query.trim();
        if query.is_empty() {
            return SearchResults::default();
        }
        let search = Some(query.to_string());

        let tools = degrade(
            "search.tools",
            self.tools
                .list_tools(&ToolQueryFilter {
                    search: search.clone(),
                    ..ToolQueryFilter::default()
                })
                .await,
        );
        let categories = degrade(
            "search.categories",
            self.categories
                .list_categories(&CategoryQueryFilter {
                    search: search.clone(),
                })
                .await,
        );
        let agents = degrade(
            "search.agents",
            self.agents
                .list_agents(&AgentQueryFilter {
                    status: Some(AgentStatus::Active),
                    search,
                    ..AgentQueryFilter::default()
                })
                .await,
        );

        SearchResults {
            tools,
            categories,
            agents,
        }
    }

    pub async fn compare(&self, left: &str, right: &str) -> (Option<ToolRecord>, Option<ToolRecord>) {
        let left = degrade(
            "compare.left",
            self.tools.find_tool_by_slug(&normalize_slug(left)).await,
        );
        let right = degrade(
            "compare.right",
            self.tools.find_tool_by_slug(&normalize_slug(right)).await,
        );
        (left, right)
    }

    /// Everything a sitemap or static export enumerates.
    pub async fn snapshot(&self) -> CatalogSnapshot {
        let tools = degrade(
            "snapshot.tools",
            self.tools.list_tools(&ToolQueryFilter::default()).await,
        );
        let categories = self.all_categories().await;
        let agents = self.active_agents().await;

        CatalogSnapshot {
            tools,
            categories,
            agents,
        }
    }
}

pub(crate) fn degrade<T: Default, E: Display>(operation: &'static str, result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            metrics::counter!("aitoonic_store_degraded_total", "operation" => operation)
                .increment(1);
            warn!(
                target = "aitoonic::application::catalog",
                operation,
                error = %err,
                "content store query failed; serving empty result"
            );
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::application::repos::RepoError;
    use crate::domain::slug::slug_from_name;
    use crate::domain::types::PricingType;

    #[derive(Default)]
    struct StubStore {
        failing: bool,
        categories: Vec<CategoryWithCount>,
        tools: Vec<ToolRecord>,
        agents: Vec<AgentRecord>,
    }

    impl StubStore {
        fn check(&self) -> Result<(), RepoError> {
            if self.failing {
                Err(RepoError::Timeout)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CategoriesRepo for StubStore {
        async fn list_categories(
            &self,
            _filter: &CategoryQueryFilter,
        ) -> Result<Vec<CategoryRecord>, RepoError> {
            self.check()?;
            Ok(self.categories.iter().map(|c| c.category.clone()).collect())
        }

        async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
            self.check()?;
            Ok(self.categories.clone())
        }

        async fn find_category_by_slug(
            &self,
            slug: &str,
        ) -> Result<Option<CategoryRecord>, RepoError> {
            self.check()?;
            Ok(self
                .categories
                .iter()
                .map(|c| &c.category)
                .find(|c| slug_from_name(&c.name) == slug)
                .cloned())
        }

        async fn find_category_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
            self.check()?;
            Ok(self
                .categories
                .iter()
                .map(|c| &c.category)
                .find(|c| c.id == id)
                .cloned())
        }
    }

    #[async_trait]
    impl ToolsRepo for StubStore {
        async fn list_tools(&self, filter: &ToolQueryFilter) -> Result<Vec<ToolRecord>, RepoError> {
            self.check()?;
            let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
            Ok(self
                .tools
                .iter()
                .filter(|t| filter.category_id.is_none_or(|id| t.category_id == id))
                .filter(|t| filter.exclude_id != Some(t.id))
                .take(limit)
                .cloned()
                .collect())
        }

        async fn find_tool_by_slug(&self, slug: &str) -> Result<Option<ToolRecord>, RepoError> {
            self.check()?;
            Ok(self
                .tools
                .iter()
                .find(|t| slug_from_name(&t.name) == slug)
                .cloned())
        }

        async fn find_tool_by_id(&self, id: Uuid) -> Result<Option<ToolRecord>, RepoError> {
            self.check()?;
            Ok(self.tools.iter().find(|t| t.id == id).cloned())
        }
    }

    #[async_trait]
    impl AgentsRepo for StubStore {
        async fn list_agents(
            &self,
            filter: &AgentQueryFilter,
        ) -> Result<Vec<AgentRecord>, RepoError> {
            self.check()?;
            let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
            Ok(self
                .agents
                .iter()
                .filter(|a| filter.status.is_none_or(|s| a.status == s))
                .filter(|a| filter.exclude_id != Some(a.id))
                .take(limit)
                .cloned()
                .collect())
        }

        async fn find_agent_by_slug(&self, slug: &str) -> Result<Option<AgentRecord>, RepoError> {
            self.check()?;
            Ok(self
                .agents
                .iter()
                .find(|a| slug_from_name(&a.name) == slug)
                .cloned())
        }

        async fn find_agent_by_id(&self, id: Uuid) -> Result<Option<AgentRecord>, RepoError> {
            self.check()?;
            Ok(self.agents.iter().find(|a| a.id == id).cloned())
        }
    }

    fn service(store: StubStore) -> CatalogService {
        let store = Arc::new(store);
        CatalogService::new(store.clone(), store.clone(), store)
    }

    fn category(name: &str, tool_count: i64) -> CategoryWithCount {
        let now = OffsetDateTime::now_utc();
        CategoryWithCount {
            category: CategoryRecord {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: format!("{name} tools"),
                seo_title: None,
                seo_description: None,
                image_url: None,
                image_alt: None,
                created_at: now,
                updated_at: now,
            },
            tool_count,
        }
    }

    fn tool(name: &str, category_id: Uuid) -> ToolRecord {
        let now = OffsetDateTime::now_utc();
        ToolRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} does things"),
            url: "https://example.com".to_string(),
            category_id,
            image_url: None,
            image_alt: None,
            favicon_url: None,
            rating: None,
            seo_title: None,
            seo_description: None,
            how_to_use: None,
            features: Vec::new(),
            use_cases: Vec::new(),
            pricing: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn agent(name: &str, status: AgentStatus) -> AgentRecord {
        let now = OffsetDateTime::now_utc();
        AgentRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            image_url: None,
            image_alt: None,
            seo_title: None,
            seo_description: None,
            capabilities: Vec::new(),
            agent_features: Vec::new(),
            api_endpoint: None,
            pricing_type: PricingType::Free,
            status,
            is_featured: false,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn home_orders_categories_by_count_and_drops_empty_ones() {
        let store = StubStore {
            categories: vec![category("Audio", 2), category("Code", 0), category("Video", 7)],
            ..StubStore::default()
        };

        let home = service(store).home().await;
        let names: Vec<_> = home
            .categories
            .iter()
            .map(|c| c.category.name.as_str())
            .collect();
        assert_eq!(names, ["Video", "Audio"]);
    }

    #[tokio::test]
    async fn tool_detail_lists_similar_tools_from_same_category() {
        let writing = category("Writing", 6);
        let other = category("Other", 1);
        let mut tools: Vec<_> = (0..6)
            .map(|i| tool(&format!("Writer {i}"), writing.category.id))
            .collect();
        tools.push(tool("Elsewhere", other.category.id));
        let store = StubStore {
            categories: vec![writing.clone(), other],
            tools,
            ..StubStore::default()
        };

        let detail = service(store)
            .tool("writer-0")
            .await
            .expect("tool should resolve");

        assert_eq!(detail.tool.name, "Writer 0");
        assert_eq!(detail.category.map(|c| c.name), Some("Writing".into()));
        assert_eq!(detail.similar.len(), 4);
        assert!(detail.similar.iter().all(|t| t.id != detail.tool.id));
        assert!(detail
            .similar
            .iter()
            .all(|t| t.category_id == writing.category.id));
    }

    #[tokio::test]
    async fn agent_detail_only_suggests_other_active_agents() {
        let store = StubStore {
            agents: vec![
                agent("Scout", AgentStatus::Active),
                agent("Dormant", AgentStatus::Inactive),
                agent("Helper", AgentStatus::Active),
            ],
            ..StubStore::default()
        };

        let detail = service(store).agent("Scout").await.expect("agent");
        let names: Vec<_> = detail.others.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Helper"]);
    }

    #[tokio::test]
    async fn store_failure_degrades_to_empty_results() {
        let store = StubStore {
            failing: true,
            categories: vec![category("Audio", 3)],
            ..StubStore::default()
        };
        let catalog = service(store);

        let home = catalog.home().await;
        assert!(home.categories.is_empty());
        assert!(home.latest_tools.is_empty());
        assert!(catalog.category("audio").await.is_none());
        assert!(catalog.search("audio").await.is_empty());
    }

    #[tokio::test]
    async fn blank_search_skips_the_store() {
        let store = StubStore {
            failing: true,
            ..StubStore::default()
        };
        assert!(service(store).search("   ").await.is_empty());
    }
}
