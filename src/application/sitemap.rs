//! Sitemap service for sitemap.xml and robots.txt generation.
//!
//! This service encapsulates the business logic for generating the sitemaps and
//! robots.txt, keeping the HTTP layer focused on request/response handling.

use std::{str::FromStr, sync::Arc};

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::repos::{
    AgentQueryFilter, AgentsRepo, CategoriesRepo, CategoryQueryFilter, RepoError,
    ToolQueryFilter, ToolsRepo,
};
use crate::domain::slug::slug_from_name;
use crate::domain::types::AgentStatus;

const URLSET_OPEN: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n";
const URLSET_CLOSE: &str = "</urlset>\n";

/// Static pages listed in every full sitemap: path, change frequency, priority,
/// and whether the entry carries the generation time as `lastmod`.
const STATIC_PAGES: &[(&str, &str, &str, bool)] = &[
    ("/", "daily", "1.0", true),
    ("/categories", "daily", "0.9", true),
    ("/ai-agent", "daily", "0.9", true),
    ("/about", "monthly", "0.7", false),
    ("/contact", "monthly", "0.7", false),
    ("/terms", "monthly", "0.5", false),
    ("/privacy", "monthly", "0.5", false),
    ("/advertise", "monthly", "0.7", false),
    ("/affiliate", "monthly", "0.5", false),
];

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to list tools: {0}")]
    Tools(#[source] RepoError),
    #[error("failed to list categories: {0}")]
    Categories(#[source] RepoError),
    #[error("failed to list agents: {0}")]
    Agents(#[source] RepoError),
}

/// One of the per-type sitemaps served under `/api/sitemap/{section}.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapSection {
    Main,
    Tools,
    Categories,
    Agents,
}

impl SitemapSection {
    pub fn as_str(self) -> &'static str {
        match self {
            SitemapSection::Main => "main",
            SitemapSection::Tools => "tools",
            SitemapSection::Categories => "categories",
            SitemapSection::Agents => "agents",
        }
    }

    /// Parse a file name such as `tools.xml`.
    pub fn from_file_name(file: &str) -> Option<Self> {
        file.strip_suffix(".xml")?.parse().ok()
    }
}

impl FromStr for SitemapSection {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "main" => Ok(SitemapSection::Main),
            "tools" => Ok(SitemapSection::Tools),
            "categories" => Ok(SitemapSection::Categories),
            "agents" => Ok(SitemapSection::Agents),
            _ => Err(()),
        }
    }
}

/// Service for generating sitemap.xml and robots.txt.
#[derive(Clone)]
pub struct SitemapService {
    tools: Arc<dyn ToolsRepo>,
    categories: Arc<dyn CategoriesRepo>,
    agents: Arc<dyn AgentsRepo>,
    base: String,
}

impl SitemapService {
    pub fn new(
        tools: Arc<dyn ToolsRepo>,
        categories: Arc<dyn CategoriesRepo>,
        agents: Arc<dyn AgentsRepo>,
        public_url: &str,
    ) -> Self {
        Self {
            tools,
            categories,
            agents,
            base: normalize_public_site_url(public_url),
        }
    }

    /// Full sitemap: static pages, then every tool, category and active agent.
    pub async fn sitemap_xml(&self, generated_at: OffsetDateTime) -> Result<String, SitemapError> {
        let mut xml = String::from(URLSET_OPEN);
        xml.push_str(&self.static_entries(Some(generated_at)));
        xml.push_str(&self.tool_entries().await?);
        xml.push_str(&self.category_entries().await?);
        xml.push_str(&self.agent_entries().await?);
        xml.push_str(URLSET_CLOSE);
        Ok(xml)
    }

    pub async fn section_xml(&self, section: SitemapSection) -> Result<String, SitemapError> {
        let body = match section {
            SitemapSection::Main => self.static_entries(None),
            SitemapSection::Tools => self.tool_entries().await?,
            SitemapSection::Categories => self.category_entries().await?,
            SitemapSection::Agents => self.agent_entries().await?,
        };
        Ok(format!("{URLSET_OPEN}{body}{URLSET_CLOSE}"))
    }

    pub fn robots_txt(&self) -> String {
        let sitemap_url = format!("{}sitemap.xml", self.base);
        format!(
            "# Allow all crawlers\n\
             User-agent: *\n\
             Allow: /\n\
             \n\
             # Sitemap location\n\
             Sitemap: {sitemap_url}\n\
             \n\
             # Disallow admin area\n\
             Disallow: /admin\n\
             \n\
             # Crawl-delay\n\
             Crawl-delay: 10\n\
             \n\
             # Additional rules\n\
             Allow: /*.js\n\
             Allow: /*.css\n\
             Allow: /*.png\n\
             Allow: /*.jpg\n\
             Allow: /*.gif\n\
             Allow: /*.svg\n\
             Allow: /*.ico\n\
             \n\
             # Prevent duplicate content\n\
             Disallow: /*?*\n\
             Disallow: /*?\n"
        )
    }

    fn static_entries(&self, generated_at: Option<OffsetDateTime>) -> String {
        STATIC_PAGES
            .iter()
            .map(|(path, changefreq, priority, daily)| {
                let lastmod = if *daily { generated_at } else { None };
                sitemap_entry(&self.base, path, lastmod, changefreq, priority)
            })
            .collect()
    }

    async fn tool_entries(&self) -> Result<String, SitemapError> {
        let tools = self
            .tools
            .list_tools(&ToolQueryFilter::default())
            .await
            .map_err(SitemapError::Tools)?;
        Ok(tools
            .iter()
            .map(|tool| self.detail_entry("/ai", &tool.name, tool.updated_at))
            .collect())
    }

    async fn category_entries(&self) -> Result<String, SitemapError> {
        let categories = self
            .categories
            .list_categories(&CategoryQueryFilter::default())
            .await
            .map_err(SitemapError::Categories)?;
        Ok(categories
            .iter()
            .map(|category| self.detail_entry("/category", &category.name, category.updated_at))
            .collect())
    }

    async fn agent_entries(&self) -> Result<String, SitemapError> {
        let filter = AgentQueryFilter {
            status: Some(AgentStatus::Active),
            ..AgentQueryFilter::default()
        };
        let agents = self
            .agents
            .list_agents(&filter)
            .await
            .map_err(SitemapError::Agents)?;
        Ok(agents
            .iter()
            .map(|agent| self.detail_entry("/ai-agent", &agent.name, agent.updated_at))
            .collect())
    }

    fn detail_entry(&self, prefix: &str, name: &str, lastmod: OffsetDateTime) -> String {
        let path = format!("{prefix}/{}", slug_from_name(name));
        sitemap_entry(&self.base, &path, Some(lastmod), "weekly", "0.8")
    }
}

pub(crate) fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}

fn sitemap_entry(
    base: &str,
    path: &str,
    lastmod: Option<OffsetDateTime>,
    changefreq: &str,
    priority: &str,
) -> String {
    let loc = xml_escape(&canonical_url(base, path));
    let lastmod = lastmod
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .map(|value| format!("<lastmod>{value}</lastmod>"))
        .unwrap_or_default();
    format!(
        "  <url><loc>{loc}</loc>{lastmod}<changefreq>{changefreq}</changefreq><priority>{priority}</priority></url>\n"
    )
}

pub(crate) fn canonical_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    format!("{base}{path}")
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_parses_file_names() {
        assert_eq!(
            SitemapSection::from_file_name("tools.xml"),
            Some(SitemapSection::Tools)
        );
        assert_eq!(SitemapSection::from_file_name("tools"), None);
        assert_eq!(SitemapSection::from_file_name("posts.xml"), None);
    }

    #[test]
    fn canonical_url_keeps_root_slash() {
        assert_eq!(canonical_url("https://a.example/", "/"), "https://a.example/");
        assert_eq!(
            canonical_url("https://a.example/", "/ai/x"),
            "https://a.example/ai/x"
        );
    }

    #[test]
    fn entry_escapes_markup_in_location() {
        let entry = sitemap_entry("https://a.example/", "/ai/r&d", None, "weekly", "0.8");
        assert!(entry.contains("<loc>https://a.example/ai/r&amp;d</loc>"));
        assert!(!entry.contains("<lastmod>"));
    }

    #[test]
    fn public_url_gains_single_trailing_slash() {
        assert_eq!(normalize_public_site_url("https://x.test//"), "https://x.test/");
    }
}
