//! Wiring of the content store into the read and write services.

use std::sync::Arc;

use crate::application::admin::AdminCatalogService;
use crate::application::catalog::CatalogService;
use crate::application::repos::{
    AgentsRepo, AgentsWriteRepo, CategoriesRepo, CategoriesWriteRepo, HealthRepo, ToolsRepo,
    ToolsWriteRepo,
};
use crate::application::sitemap::SitemapService;

/// Every store capability the site needs, held as trait objects.
#[derive(Clone)]
pub struct CatalogStores {
    pub categories: Arc<dyn CategoriesRepo>,
    pub categories_writer: Arc<dyn CategoriesWriteRepo>,
    pub tools: Arc<dyn ToolsRepo>,
    pub tools_writer: Arc<dyn ToolsWriteRepo>,
    pub agents: Arc<dyn AgentsRepo>,
    pub agents_writer: Arc<dyn AgentsWriteRepo>,
    pub health: Arc<dyn HealthRepo>,
}

impl CatalogStores {
    /// Use one backing store for every capability.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CategoriesRepo
            + CategoriesWriteRepo
            + ToolsRepo
            + ToolsWriteRepo
            + AgentsRepo
            + AgentsWriteRepo
            + HealthRepo
            + 'static,
    {
        Self {
            categories: store.clone(),
            categories_writer: store.clone(),
            tools: store.clone(),
            tools_writer: store.clone(),
            agents: store.clone(),
            agents_writer: store.clone(),
            health: store,
        }
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(
            self.categories.clone(),
            self.tools.clone(),
            self.agents.clone(),
        )
    }

    pub fn admin(&self) -> AdminCatalogService {
        AdminCatalogService::new(
            self.categories.clone(),
            self.tools.clone(),
            self.agents.clone(),
            self.categories_writer.clone(),
            self.tools_writer.clone(),
            self.agents_writer.clone(),
        )
    }

    pub fn sitemap(&self, public_url: &str) -> SitemapService {
        SitemapService::new(
            self.tools.clone(),
            self.categories.clone(),
            self.agents.clone(),
            public_url,
        )
    }
}
