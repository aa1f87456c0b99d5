use crate::application::error::HttpError;
use crate::domain::entities::{AgentRecord, CategoryRecord, CategoryWithCount, ToolRecord};
use crate::domain::slug::slug_from_name;
use crate::presentation::head::HeadMetadata;
use askama::{Error as AskamaError, Template};
use axum::http::StatusCode;
use thiserror::Error;

/// Image shown for entries that have none of their own.
pub const PLACEHOLDER_IMAGE: &str = "https://images.unsplash.com/photo-1676277791608-ac54783d753b?auto=format&fit=crop&q=80&w=400";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: String,
    pub navigation: Vec<NavigationLinkView>,
    pub footer: Vec<NavigationLinkView>,
    pub year: i32,
}

impl LayoutChrome {
    pub fn new(brand: impl Into<String>, year: i32) -> Self {
        Self {
            brand: brand.into(),
            navigation: vec![
                NavigationLinkView {
                    label: "Home",
                    href: "/",
                },
                NavigationLinkView {
                    label: "Categories",
                    href: "/categories",
                },
                NavigationLinkView {
                    label: "AI Agents",
                    href: "/ai-agent",
                },
                NavigationLinkView {
                    label: "Search",
                    href: "/search",
                },
            ],
            footer: vec![
                NavigationLinkView {
                    label: "About",
                    href: "/about",
                },
                NavigationLinkView {
                    label: "Contact",
                    href: "/contact",
                },
                NavigationLinkView {
                    label: "Advertise",
                    href: "/advertise",
                },
                NavigationLinkView {
                    label: "Affiliate",
                    href: "/affiliate",
                },
                NavigationLinkView {
                    label: "Terms",
                    href: "/terms",
                },
                NavigationLinkView {
                    label: "Privacy",
                    href: "/privacy",
                },
                NavigationLinkView {
                    label: "Sitemap",
                    href: "/sitemap",
                },
            ],
            year,
        }
    }
}

/// Full HTML document wrapping a rendered page body.
#[derive(Template)]
#[template(path = "document.html")]
pub struct DocumentTemplate<'a> {
    pub head: &'a HeadMetadata,
    pub chrome: &'a LayoutChrome,
    pub body: &'a str,
}

pub fn render_document(
    head: &HeadMetadata,
    chrome: &LayoutChrome,
    body: &str,
) -> Result<String, TemplateRenderError> {
    DocumentTemplate { head, chrome, body }
        .render()
        .map_err(|err| {
            TemplateRenderError::new(
                "presentation::views::render_document",
                "Template rendering failed",
                err,
            )
        })
}

pub fn tool_href(name: &str) -> String {
    format!("/ai/{}", slug_from_name(name))
}

pub fn category_href(name: &str) -> String {
    format!("/category/{}", slug_from_name(name))
}

pub fn agent_href(name: &str) -> String {
    format!("/ai-agent/{}", slug_from_name(name))
}

#[derive(Clone)]
pub struct ToolCard {
    pub name: String,
    pub href: String,
    pub description: String,
    pub image_url: String,
    pub image_alt: String,
}

impl From<&ToolRecord> for ToolCard {
    fn from(tool: &ToolRecord) -> Self {
        Self {
            name: tool.name.clone(),
            href: tool_href(&tool.name),
            description: tool.description.clone(),
            image_url: tool
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            image_alt: tool.image_alt.clone().unwrap_or_else(|| tool.name.clone()),
        }
    }
}

#[derive(Clone)]
pub struct CategoryCard {
    pub name: String,
    pub href: String,
    pub description: String,
    pub tool_count: Option<i64>,
}

impl From<&CategoryRecord> for CategoryCard {
    fn from(category: &CategoryRecord) -> Self {
        Self {
            name: category.name.clone(),
            href: category_href(&category.name),
            description: category.description.clone(),
            tool_count: None,
        }
    }
}

impl From<&CategoryWithCount> for CategoryCard {
    fn from(entry: &CategoryWithCount) -> Self {
        Self {
            tool_count: Some(entry.tool_count),
            ..CategoryCard::from(&entry.category)
        }
    }
}

#[derive(Clone)]
pub struct AgentCard {
    pub name: String,
    pub href: String,
    pub description: String,
    pub image_url: String,
    pub pricing: &'static str,
    pub is_featured: bool,
    pub is_verified: bool,
}

impl From<&AgentRecord> for AgentCard {
    fn from(agent: &AgentRecord) -> Self {
        Self {
            name: agent.name.clone(),
            href: agent_href(&agent.name),
            description: agent.description.clone(),
            image_url: agent
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            pricing: agent.pricing_type.label(),
            is_featured: agent.is_featured,
            is_verified: agent.is_verified,
        }
    }
}

pub struct CategorySection {
    pub category: CategoryCard,
    pub tools: Vec<ToolCard>,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub brand: String,
    pub featured: Vec<ToolCard>,
    pub sections: Vec<CategorySection>,
    pub tool_count: usize,
    pub category_count: usize,
}

#[derive(Template)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate {
    pub categories: Vec<CategoryCard>,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub category: CategoryCard,
    pub tools: Vec<ToolCard>,
}

pub struct PricingPlanView {
    pub plan: String,
    pub price: String,
    pub features: Vec<String>,
}

pub struct TitledItemView {
    pub title: String,
    pub description: String,
}

#[derive(Template)]
#[template(path = "tool.html")]
pub struct ToolTemplate {
    pub tool: ToolCard,
    pub url: String,
    pub favicon_url: Option<String>,
    pub rating: Option<String>,
    pub category: Option<CategoryCard>,
    pub how_to_use: Option<String>,
    pub features: Vec<TitledItemView>,
    pub use_cases: Vec<TitledItemView>,
    pub pricing: Vec<PricingPlanView>,
    pub similar: Vec<ToolCard>,
}

#[derive(Template)]
#[template(path = "agents.html")]
pub struct AgentsTemplate {
    pub agents: Vec<AgentCard>,
}

#[derive(Template)]
#[template(path = "agent.html")]
pub struct AgentTemplate {
    pub agent: AgentCard,
    pub capabilities: Vec<String>,
    pub features: Vec<String>,
    pub api_endpoint: Option<String>,
    pub others: Vec<AgentCard>,
}

#[derive(Template)]
#[template(path = "info.html")]
pub struct InfoTemplate {
    pub heading: &'static str,
    pub paragraphs: &'static [&'static str],
}

pub struct SitemapLink {
    pub label: String,
    pub href: String,
}

#[derive(Template)]
#[template(path = "sitemap.html")]
pub struct SitemapTemplate {
    pub pages: Vec<SitemapLink>,
    pub categories: Vec<SitemapLink>,
    pub tools: Vec<SitemapLink>,
    pub agents: Vec<SitemapLink>,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub query: String,
    pub tools: Vec<ToolCard>,
    pub categories: Vec<CategoryCard>,
    pub agents: Vec<AgentCard>,
}

impl SearchTemplate {
    pub fn has_results(&self) -> bool {
        !(self.tools.is_empty() && self.categories.is_empty() && self.agents.is_empty())
    }
}

pub struct CompareColumn {
    pub tool: ToolCard,
    pub url: String,
    pub rating: String,
    pub entry_price: String,
    pub feature_titles: Vec<String>,
}

#[derive(Template)]
#[template(path = "compare.html")]
pub struct CompareTemplate {
    pub left: CompareColumn,
    pub right: CompareColumn,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub brand: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub title: String,
    pub message: String,
}

pub struct AdminNavItem {
    pub label: &'static str,
    pub href: String,
    pub count: Option<usize>,
    pub is_active: bool,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub nav: Vec<AdminNavItem>,
}

pub struct AdminRow {
    pub name: String,
    pub description: String,
    pub public_href: String,
    pub edit_href: String,
    pub badge: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/list.html")]
pub struct AdminListTemplate {
    pub nav: Vec<AdminNavItem>,
    pub heading: &'static str,
    pub singular: &'static str,
    pub list_path: String,
    pub query: String,
    pub rows: Vec<AdminRow>,
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct AdminFormChrome {
    pub nav: Vec<AdminNavItem>,
    pub is_new: bool,
    pub action: String,
    pub cancel_href: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin/tool_form.html")]
pub struct AdminToolFormTemplate {
    pub chrome: AdminFormChrome,
    pub form: crate::application::admin::ToolForm,
    pub categories: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "admin/category_form.html")]
pub struct AdminCategoryFormTemplate {
    pub chrome: AdminFormChrome,
    pub form: crate::application::admin::CategoryForm,
}

#[derive(Template)]
#[template(path = "admin/agent_form.html")]
pub struct AdminAgentFormTemplate {
    pub chrome: AdminFormChrome,
    pub form: crate::application::admin::AgentForm,
    pub pricing_types: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub is_featured: bool,
    pub is_verified: bool,
}

pub fn title_case(value: &str) -> String {
    value
        .split(['-', '_', ' '])
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.eq_ignore_ascii_case("ai") {
                return "AI".to_string();
            }
            let mut chars = segment.chars();
            let mut word = String::new();
            if let Some(first) = chars.next() {
                word.extend(first.to_uppercase());
                word.extend(chars.flat_map(char::to_lowercase));
            }
            word
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_uppercases_ai() {
        assert_eq!(title_case("ai-writing_tools"), "AI Writing Tools");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn hrefs_use_name_slugs() {
        assert_eq!(tool_href("Chat GPT"), "/ai/chat-gpt");
        assert_eq!(category_href("Image  Editing"), "/category/image-editing");
        assert_eq!(agent_href("Scout"), "/ai-agent/scout");
    }

    #[test]
    fn document_embeds_head_and_body() {
        let head = HeadMetadata::new("Hello", "World").with_canonical("https://x.test/");
        let chrome = LayoutChrome::new("Aitoonic", 2026);
        let html = render_document(&head, &chrome, "<main>body</main>").expect("render");

        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains("<main>body</main>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://x.test/">"#));
        assert!(html.contains(r#"content="index, follow""#));
    }
}
