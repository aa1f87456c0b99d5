//! Server-side renderer for every public and admin page.

use async_trait::async_trait;
use askama::Template;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::{RenderError, RenderedPage, Renderer};
use crate::application::admin::form::FieldErrors;
use crate::application::admin::{
    AdminCatalogService, AdminCounts, AdminSection, AgentForm, CategoryForm, ToolForm,
};
use crate::application::catalog::{CatalogService, degrade};
use crate::cache::canonical_path;
use crate::domain::types::{AgentStatus, PricingType};
use crate::presentation::head::HeadMetadata;
use crate::presentation::views::{
    AdminAgentFormTemplate, AdminCategoryFormTemplate, AdminDashboardTemplate, AdminFormChrome,
    AdminListTemplate, AdminNavItem, AdminRow, AdminToolFormTemplate, AgentCard, AgentTemplate,
    AgentsTemplate, CategoriesTemplate, CategoryCard, CategorySection, CategoryTemplate,
    CompareColumn, CompareTemplate, HomeTemplate, InfoTemplate, LoginTemplate, NotFoundTemplate,
    PricingPlanView, SearchTemplate, SelectOption, SitemapLink, SitemapTemplate, TitledItemView,
    ToolCard, ToolTemplate, agent_href, category_href, title_case, tool_href,
};

const HOME_SECTIONS: usize = 5;
const HOME_SECTION_TOOLS: usize = 6;

/// Public identity of the site used for titles and canonical URLs.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    brand: String,
    public_url: String,
}

impl SiteProfile {
    pub fn new(brand: impl Into<String>, public_url: &str) -> Self {
        Self {
            brand: brand.into(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.public_url, path)
    }

    fn title(&self, page: &str) -> String {
        format!("{page} | {}", self.brand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPage {
    About,
    Contact,
    Terms,
    Privacy,
    Advertise,
    Affiliate,
}

impl InfoPage {
    pub const ALL: [InfoPage; 6] = [
        InfoPage::About,
        InfoPage::Contact,
        InfoPage::Terms,
        InfoPage::Privacy,
        InfoPage::Advertise,
        InfoPage::Affiliate,
    ];

    pub fn path(self) -> &'static str {
        match self {
            InfoPage::About => "/about",
            InfoPage::Contact => "/contact",
            InfoPage::Terms => "/terms",
            InfoPage::Privacy => "/privacy",
            InfoPage::Advertise => "/advertise",
            InfoPage::Affiliate => "/affiliate",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            InfoPage::About => "About Us",
            InfoPage::Contact => "Contact Us",
            InfoPage::Terms => "Terms of Service",
            InfoPage::Privacy => "Privacy Policy",
            InfoPage::Advertise => "Advertise With Us",
            InfoPage::Affiliate => "Affiliate Program",
        }
    }

    fn description(self) -> &'static str {
        match self {
            InfoPage::About => "Learn about our mission to help everyone find the right AI tools.",
            InfoPage::Contact => "Get in touch with the team behind the AI tools directory.",
            InfoPage::Terms => "The terms that govern use of the AI tools directory.",
            InfoPage::Privacy => "How we collect, use and protect your information.",
            InfoPage::Advertise => "Reach people actively searching for AI tools.",
            InfoPage::Affiliate => "Earn commissions by recommending AI tools.",
        }
    }

    fn paragraphs(self) -> &'static [&'static str] {
        match self {
            InfoPage::About => &[
                "We curate AI tools, agents and categories so you can find the right solution without wading through marketing pages.",
                "Every listing is reviewed before it is published and kept up to date as products change.",
            ],
            InfoPage::Contact => &[
                "Questions, corrections or listing requests are welcome.",
                "Write to hello@aitoonic.com and we will get back to you within two business days.",
            ],
            InfoPage::Terms => &[
                "By using this site you agree to use the listings for informational purposes only.",
                "Third-party tools are governed by their own terms; we are not responsible for their availability or content.",
            ],
            InfoPage::Privacy => &[
                "We collect only the data needed to operate the site, such as anonymous usage statistics.",
                "We never sell personal information. Contact us to request removal of any data associated with you.",
            ],
            InfoPage::Advertise => &[
                "Featured placements put your product in front of an audience evaluating AI tools.",
                "Contact ads@aitoonic.com for current availability and pricing.",
            ],
            InfoPage::Affiliate => &[
                "Partners earn a commission for every qualified referral to listed tools that run affiliate programs.",
                "Apply by writing to partners@aitoonic.com with a short description of your audience.",
            ],
        }
    }
}

/// A request target resolved to the page it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRoute {
    Home,
    Categories,
    Category(String),
    Tool(String),
    Agents,
    Agent(String),
    Info(InfoPage),
    Sitemap,
    Search { query: String },
    Compare { left: String, right: String },
    Login,
    AdminDashboard,
    AdminList { section: AdminSection, query: String },
    AdminNew(AdminSection),
    AdminEdit { section: AdminSection, id: Uuid },
    NotFound,
}

impl SiteRoute {
    pub fn parse(target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        let path = canonical_path(path);
        let segments: Vec<&str> = match &*path {
            "/" => Vec::new(),
            other => other.split('/').skip(1).collect(),
        };

        match segments.as_slice() {
            [] => SiteRoute::Home,
            ["categories"] => SiteRoute::Categories,
            ["category", slug] if !slug.is_empty() => SiteRoute::Category(slug.to_string()),
            ["ai", slug] if !slug.is_empty() => SiteRoute::Tool(slug.to_string()),
            ["ai-agent"] => SiteRoute::Agents,
            ["ai-agent", slug] if !slug.is_empty() => SiteRoute::Agent(slug.to_string()),
            ["sitemap"] => SiteRoute::Sitemap,
            ["search"] => SiteRoute::Search {
                query: query_param(query, "q"),
            },
            ["compare", pair] => match pair.split_once("-vs-") {
                Some((left, right)) if !left.is_empty() && !right.is_empty() => {
                    SiteRoute::Compare {
                        left: left.to_string(),
                        right: right.to_string(),
                    }
                }
                _ => SiteRoute::NotFound,
            },
            ["login"] => SiteRoute::Login,
            ["admin"] => SiteRoute::AdminDashboard,
            ["admin", section] => match AdminSection::from_segment(section) {
                Some(section) => SiteRoute::AdminList {
                    section,
                    query: query_param(query, "q"),
                },
                None => SiteRoute::NotFound,
            },
            ["admin", section, "new"] => AdminSection::from_segment(section)
                .map(SiteRoute::AdminNew)
                .unwrap_or(SiteRoute::NotFound),
            ["admin", section, id, "edit"] => {
                match (AdminSection::from_segment(section), Uuid::parse_str(id)) {
                    (Some(section), Ok(id)) => SiteRoute::AdminEdit { section, id },
                    _ => SiteRoute::NotFound,
                }
            }
            [page] => InfoPage::ALL
                .into_iter()
                .find(|info| info.path()[1..] == **page)
                .map(SiteRoute::Info)
                .unwrap_or(SiteRoute::NotFound),
            _ => SiteRoute::NotFound,
        }
    }
}

fn query_param(query: &str, name: &str) -> String {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

fn render_body<T: Template>(name: &'static str, template: &T) -> Result<String, RenderError> {
    template
        .render()
        .map_err(|err| RenderError::template(name, err))
}

#[derive(Clone)]
pub struct SiteRenderer {
    catalog: CatalogService,
    admin: AdminCatalogService,
    profile: SiteProfile,
}

#[async_trait]
impl Renderer for SiteRenderer {
    async fn render(&self, target: &str) -> Result<RenderedPage, RenderError> {
        match SiteRoute::parse(target) {
            SiteRoute::Home => self.home().await,
            SiteRoute::Categories => self.categories().await,
            SiteRoute::Category(slug) => self.category(&slug).await,
            SiteRoute::Tool(slug) => self.tool(&slug).await,
            SiteRoute::Agents => self.agents().await,
            SiteRoute::Agent(slug) => self.agent(&slug).await,
            SiteRoute::Info(page) => self.info(page),
            SiteRoute::Sitemap => self.html_sitemap().await,
            SiteRoute::Search { query } => self.search(&query).await,
            SiteRoute::Compare { left, right } => self.compare(&left, &right).await,
            SiteRoute::Login => self.login(),
            SiteRoute::AdminDashboard => self.admin_dashboard().await,
            SiteRoute::AdminList { section, query } => self.admin_list(section, &query).await,
            SiteRoute::AdminNew(section) => self.admin_new(section).await,
            SiteRoute::AdminEdit { section, id } => self.admin_edit(section, id).await,
            SiteRoute::NotFound => self.not_found("Page Not Found"),
        }
    }
}

impl SiteRenderer {
    pub fn new(catalog: CatalogService, admin: AdminCatalogService, profile: SiteProfile) -> Self {
        Self {
            catalog,
            admin,
            profile,
        }
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    async fn home(&self) -> Result<RenderedPage, RenderError> {
        let home = self.catalog.home().await;

        let sections = home
            .categories
            .iter()
            .take(HOME_SECTIONS)
            .filter_map(|entry| {
                let tools: Vec<ToolCard> = home
                    .latest_tools
                    .iter()
                    .filter(|tool| tool.category_id == entry.category.id)
                    .take(HOME_SECTION_TOOLS)
                    .map(ToolCard::from)
                    .collect();
                (!tools.is_empty()).then(|| CategorySection {
                    category: CategoryCard::from(entry),
                    tools,
                })
            })
            .collect();

        let template = HomeTemplate {
            brand: self.profile.brand.clone(),
            featured: home.featured_tools.iter().map(ToolCard::from).collect(),
            sections,
            tool_count: home.latest_tools.len(),
            category_count: home.categories.len(),
        };
        let head = HeadMetadata::new(
            self.profile.title("Discover The Best AI Websites & Tools"),
            format!(
                "Discover the best AI tools and websites. Browse {}+ AI tools across {}+ categories. Find the perfect AI solution for your needs.",
                template.tool_count, template.category_count
            ),
        )
        .with_canonical(self.profile.url("/"))
        .with_image(Some(self.profile.url("/og-image.jpg")), None)
        .with_json_ld(&json!({
            "@context": "https://schema.org",
            "@type": "WebSite",
            "name": self.profile.brand,
            "url": self.profile.url("/"),
            "potentialAction": {
                "@type": "SearchAction",
                "target": format!("{}?q={{search_term_string}}", self.profile.url("/search")),
                "query-input": "required name=search_term_string"
            }
        }));

        Ok(RenderedPage::ok(render_body("home.html", &template)?, head))
    }

    async fn categories(&self) -> Result<RenderedPage, RenderError> {
        let categories: Vec<CategoryCard> = self
            .catalog
            .categories_with_counts()
            .await
            .iter()
            .map(CategoryCard::from)
            .collect();

        let description = "Browse our comprehensive collection of AI tools by category. Find the perfect tools for your needs.";
        let has_part: Vec<_> = categories
            .iter()
            .map(|category| {
                json!({
                    "@type": "Thing",
                    "name": category.name,
                    "description": category.description,
                    "url": self.profile.url(&category.href),
                })
            })
            .collect();
        let head = HeadMetadata::new(self.profile.title("AI Tool Categories"), description)
            .with_canonical(self.profile.url("/categories"))
            .with_json_ld(&json!({
                "@context": "https://schema.org",
                "@type": "CollectionPage",
                "name": "AI Tool Categories",
                "description": description,
                "url": self.profile.url("/categories"),
                "hasPart": has_part,
            }));

        let body = render_body("categories.html", &CategoriesTemplate { categories })?;
        Ok(RenderedPage::ok(body, head))
    }

    async fn category(&self, slug: &str) -> Result<RenderedPage, RenderError> {
        let Some(detail) = self.catalog.category(slug).await else {
            return self.not_found("Category Not Found");
        };

        let category = CategoryCard::from(&detail.category);
        let tools: Vec<ToolCard> = detail.tools.iter().map(ToolCard::from).collect();
        let title = detail
            .category
            .seo_title
            .clone()
            .unwrap_or_else(|| format!("{} AI Tools", category.name));
        let description = detail
            .category
            .seo_description
            .clone()
            .unwrap_or_else(|| category.description.clone());
        let has_part: Vec<_> = tools
            .iter()
            .map(|tool| {
                json!({
                    "@type": "SoftwareApplication",
                    "name": tool.name,
                    "description": tool.description,
                    "url": self.profile.url(&tool.href),
                })
            })
            .collect();

        let head = HeadMetadata::new(self.profile.title(&title), description)
            .with_canonical(self.profile.url(&category.href))
            .with_image(
                detail.category.image_url.clone(),
                detail.category.image_alt.clone(),
            )
            .with_json_ld(&json!({
                "@context": "https://schema.org",
                "@type": "CollectionPage",
                "name": category.name,
                "description": category.description,
                "url": self.profile.url(&category.href),
                "hasPart": has_part,
            }));

        let body = render_body("category.html", &CategoryTemplate { category, tools })?;
        Ok(RenderedPage::ok(body, head))
    }

    async fn tool(&self, slug: &str) -> Result<RenderedPage, RenderError> {
        let Some(detail) = self.catalog.tool(slug).await else {
            return self.not_found("Tool Not Found");
        };
        let tool = &detail.tool;
        let card = ToolCard::from(tool);

        let head = HeadMetadata::new(
            self.profile
                .title(tool.seo_title.as_deref().unwrap_or(&tool.name)),
            tool.seo_description
                .clone()
                .unwrap_or_else(|| tool.description.clone()),
        )
        .with_canonical(self.profile.url(&card.href))
        .with_og_type("product")
        .with_image(tool.image_url.clone(), tool.image_alt.clone())
        .with_json_ld(&json!({
            "@context": "https://schema.org",
            "@type": "SoftwareApplication",
            "name": tool.name,
            "description": tool.description,
            "applicationCategory": "AIApplication",
            "operatingSystem": "Web",
            "url": self.profile.url(&card.href),
            "image": tool.image_url,
            "offers": {
                "@type": "Offer",
                "price": tool.entry_price(),
                "priceCurrency": "USD",
                "availability": "https://schema.org/OnlineOnly"
            }
        }));

        let template = ToolTemplate {
            url: tool.url.clone(),
            favicon_url: tool.favicon_url.clone(),
            rating: tool.rating.map(|rating| format!("{rating:.1}")),
            category: detail.category.as_ref().map(CategoryCard::from),
            how_to_use: tool.how_to_use.clone(),
            features: tool
                .features
                .iter()
                .map(|f| TitledItemView {
                    title: f.title.clone(),
                    description: f.description.clone(),
                })
                .collect(),
            use_cases: tool
                .use_cases
                .iter()
                .map(|u| TitledItemView {
                    title: u.title.clone(),
                    description: u.description.clone(),
                })
                .collect(),
            pricing: tool
                .pricing
                .iter()
                .map(|p| PricingPlanView {
                    plan: p.plan.clone(),
                    price: p.price.clone(),
                    features: p.features.clone(),
                })
                .collect(),
            similar: detail.similar.iter().map(ToolCard::from).collect(),
            tool: card,
        };

        Ok(RenderedPage::ok(render_body("tool.html", &template)?, head))
    }

    async fn agents(&self) -> Result<RenderedPage, RenderError> {
        let agents: Vec<AgentCard> = self
            .catalog
            .active_agents()
            .await
            .iter()
            .map(AgentCard::from)
            .collect();

        let description =
            "Discover powerful AI agents that can automate your workflows and enhance productivity";
        let has_part: Vec<_> = agents
            .iter()
            .map(|agent| {
                json!({
                    "@type": "Product",
                    "name": agent.name,
                    "description": agent.description,
                    "url": self.profile.url(&agent.href),
                })
            })
            .collect();
        let head = HeadMetadata::new(self.profile.title("AI Agents Marketplace"), description)
            .with_canonical(self.profile.url("/ai-agent"))
            .with_json_ld(&json!({
                "@context": "https://schema.org",
                "@type": "CollectionPage",
                "name": "AI Agents Marketplace",
                "description": description,
                "url": self.profile.url("/ai-agent"),
                "hasPart": has_part,
            }));

        let body = render_body("agents.html", &AgentsTemplate { agents })?;
        Ok(RenderedPage::ok(body, head))
    }

    async fn agent(&self, slug: &str) -> Result<RenderedPage, RenderError> {
        let Some(detail) = self.catalog.agent(slug).await else {
            return self.not_found("Agent Not Found");
        };
        let agent = &detail.agent;
        let card = AgentCard::from(agent);

        let head = HeadMetadata::new(
            self.profile.title(
                agent
                    .seo_title
                    .as_deref()
                    .unwrap_or(&format!("{} - AI Agent", agent.name)),
            ),
            agent
                .seo_description
                .clone()
                .unwrap_or_else(|| agent.description.clone()),
        )
        .with_canonical(self.profile.url(&card.href))
        .with_og_type("product")
        .with_image(agent.image_url.clone(), agent.image_alt.clone())
        .with_json_ld(&json!({
            "@context": "https://schema.org",
            "@type": "Product",
            "name": agent.name,
            "description": agent.description,
            "url": self.profile.url(&card.href),
            "image": agent.image_url,
            "offers": {
                "@type": "Offer",
                "price": "0",
                "priceCurrency": "USD",
                "availability": "https://schema.org/OnlineOnly"
            }
        }));

        let template = AgentTemplate {
            capabilities: agent.capabilities.clone(),
            features: agent.agent_features.clone(),
            api_endpoint: agent.api_endpoint.clone(),
            others: detail.others.iter().map(AgentCard::from).collect(),
            agent: card,
        };

        Ok(RenderedPage::ok(render_body("agent.html", &template)?, head))
    }

    fn info(&self, page: InfoPage) -> Result<RenderedPage, RenderError> {
        let head = HeadMetadata::new(self.profile.title(page.heading()), page.description())
            .with_canonical(self.profile.url(page.path()));
        let template = InfoTemplate {
            heading: page.heading(),
            paragraphs: page.paragraphs(),
        };
        Ok(RenderedPage::ok(render_body("info.html", &template)?, head))
    }

    async fn html_sitemap(&self) -> Result<RenderedPage, RenderError> {
        let snapshot = self.catalog.snapshot().await;

        let mut pages = vec![
            SitemapLink {
                label: "Home".to_string(),
                href: "/".to_string(),
            },
            SitemapLink {
                label: "Categories".to_string(),
                href: "/categories".to_string(),
            },
            SitemapLink {
                label: "AI Agents".to_string(),
                href: "/ai-agent".to_string(),
            },
        ];
        pages.extend(InfoPage::ALL.into_iter().map(|page| SitemapLink {
            label: title_case(&page.path()[1..]),
            href: page.path().to_string(),
        }));

        let template = SitemapTemplate {
            pages,
            categories: snapshot
                .categories
                .iter()
                .map(|c| SitemapLink {
                    label: c.name.clone(),
                    href: category_href(&c.name),
                })
                .collect(),
            tools: snapshot
                .tools
                .iter()
                .map(|t| SitemapLink {
                    label: t.name.clone(),
                    href: tool_href(&t.name),
                })
                .collect(),
            agents: snapshot
                .agents
                .iter()
                .map(|a| SitemapLink {
                    label: a.name.clone(),
                    href: agent_href(&a.name),
                })
                .collect(),
        };
        let head = HeadMetadata::new(
            self.profile.title("Sitemap"),
            "Every AI tool, category and agent listed in the directory.",
        )
        .with_canonical(self.profile.url("/sitemap"));

        Ok(RenderedPage::ok(render_body("sitemap.html", &template)?, head))
    }

    async fn search(&self, query: &str) -> Result<RenderedPage, RenderError> {
        let results = self.catalog.search(query).await;
        let template = SearchTemplate {
            query: query.to_string(),
            tools: results.tools.iter().map(ToolCard::from).collect(),
            categories: results.categories.iter().map(CategoryCard::from).collect(),
            agents: results.agents.iter().map(AgentCard::from).collect(),
        };

        let title = if query.is_empty() {
            self.profile.title("Search AI Tools")
        } else {
            self.profile.title(&format!("Search results for \"{query}\""))
        };
        let head = HeadMetadata::new(title, "Search the AI tools directory.").noindex();

        Ok(RenderedPage::ok(render_body("search.html", &template)?, head))
    }

    async fn compare(&self, left: &str, right: &str) -> Result<RenderedPage, RenderError> {
        let (Some(left), Some(right)) = self.catalog.compare(left, right).await else {
            return self.not_found("Comparison Not Found");
        };

        let column = |tool: &crate::domain::entities::ToolRecord| CompareColumn {
            tool: ToolCard::from(tool),
            url: tool.url.clone(),
            rating: tool
                .rating
                .map(|rating| format!("{rating:.1} / 5"))
                .unwrap_or_else(|| "Not rated".to_string()),
            entry_price: tool.entry_price(),
            feature_titles: tool.features.iter().map(|f| f.title.clone()).collect(),
        };
        let template = CompareTemplate {
            left: column(&left),
            right: column(&right),
        };

        let head = HeadMetadata::new(
            self.profile
                .title(&format!("{} vs {}", left.name, right.name)),
            format!(
                "Compare {} and {} side by side: features, pricing and ratings.",
                left.name, right.name
            ),
        );

        Ok(RenderedPage::ok(render_body("compare.html", &template)?, head))
    }

    fn login(&self) -> Result<RenderedPage, RenderError> {
        let head = HeadMetadata::new(self.profile.title("Sign In"), "Administrator sign-in.").noindex();
        let template = LoginTemplate {
            brand: self.profile.brand.clone(),
        };
        Ok(RenderedPage::ok(render_body("login.html", &template)?, head))
    }

    fn not_found(&self, title: &str) -> Result<RenderedPage, RenderError> {
        let template = NotFoundTemplate {
            title: title.to_string(),
            message: "The page you requested does not exist. Try returning to the homepage to continue exploring.".to_string(),
        };
        let head = HeadMetadata::new(self.profile.title(title), "The requested page could not be found.");
        Ok(RenderedPage::not_found(
            render_body("not_found.html", &template)?,
            head,
        ))
    }

    fn admin_head(&self, title: &str) -> HeadMetadata {
        HeadMetadata::new(self.profile.title(title), "Catalog administration.").noindex()
    }

    async fn admin_dashboard(&self) -> Result<RenderedPage, RenderError> {
        let counts = degrade("admin.counts", self.admin.counts().await.map(Some));
        let template = AdminDashboardTemplate {
            nav: admin_nav(None, counts),
        };
        Ok(RenderedPage::ok(
            render_body("admin/dashboard.html", &template)?,
            self.admin_head("Admin Panel"),
        ))
    }

    async fn admin_list(
        &self,
        section: AdminSection,
        query: &str,
    ) -> Result<RenderedPage, RenderError> {
        let search = Some(query);
        let edit_href = |id: Uuid| format!("{}/{id}/edit", section.list_path());

        let rows: Vec<AdminRow> = match section {
            AdminSection::Tools => degrade("admin.tools", self.admin.list_tools(search).await)
                .iter()
                .map(|tool| AdminRow {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    public_href: tool_href(&tool.name),
                    edit_href: edit_href(tool.id),
                    badge: tool.rating.map(|rating| format!("{rating:.1}")),
                })
                .collect(),
            AdminSection::Categories => {
                degrade("admin.categories", self.admin.list_categories(search).await)
                    .iter()
                    .map(|category| AdminRow {
                        name: category.name.clone(),
                        description: category.description.clone(),
                        public_href: category_href(&category.name),
                        edit_href: edit_href(category.id),
                        badge: None,
                    })
                    .collect()
            }
            AdminSection::Agents => degrade("admin.agents", self.admin.list_agents(search).await)
                .iter()
                .map(|agent| AdminRow {
                    name: agent.name.clone(),
                    description: agent.description.clone(),
                    public_href: agent_href(&agent.name),
                    edit_href: edit_href(agent.id),
                    badge: (agent.status == AgentStatus::Inactive)
                        .then(|| agent.status.as_str().to_string()),
                })
                .collect(),
        };

        let template = AdminListTemplate {
            nav: admin_nav(Some(section), None),
            heading: section.label(),
            singular: section.singular(),
            list_path: section.list_path(),
            query: query.to_string(),
            rows,
        };
        Ok(RenderedPage::ok(
            render_body("admin/list.html", &template)?,
            self.admin_head(section.label()),
        ))
    }

    async fn admin_new(&self, section: AdminSection) -> Result<RenderedPage, RenderError> {
        let errors = FieldErrors::default();
        match section {
            AdminSection::Tools => self.tool_form(ToolForm::default(), &errors).await,
            AdminSection::Categories => self.category_form(CategoryForm::default(), &errors),
            AdminSection::Agents => self.agent_form(AgentForm::default(), &errors),
        }
    }

    async fn admin_edit(&self, section: AdminSection, id: Uuid) -> Result<RenderedPage, RenderError> {
        let errors = FieldErrors::default();
        let operation = "admin.find";
        match section {
            AdminSection::Tools => match degrade(operation, self.admin.find_tool(id).await.map(Some)) {
                Some(tool) => self.tool_form(ToolForm::from_record(&tool), &errors).await,
                None => self.not_found("Tool Not Found"),
            },
            AdminSection::Categories => {
                match degrade(operation, self.admin.find_category(id).await.map(Some)) {
                    Some(category) => {
                        self.category_form(CategoryForm::from_record(&category), &errors)
                    }
                    None => self.not_found("Category Not Found"),
                }
            }
            AdminSection::Agents => match degrade(operation, self.admin.find_agent(id).await.map(Some)) {
                Some(agent) => self.agent_form(AgentForm::from_record(&agent), &errors),
                None => self.not_found("Agent Not Found"),
            },
        }
    }

    fn form_chrome(&self, section: AdminSection, is_new: bool, errors: &FieldErrors) -> AdminFormChrome {
        AdminFormChrome {
            nav: admin_nav(Some(section), None),
            is_new,
            action: section.list_path(),
            cancel_href: section.list_path(),
            errors: errors.iter().map(|err| err.message.clone()).collect(),
        }
    }

    /// Tool editor, optionally showing validation errors from a rejected submission.
    pub async fn tool_form(
        &self,
        form: ToolForm,
        errors: &FieldErrors,
    ) -> Result<RenderedPage, RenderError> {
        let categories = self
            .catalog
            .all_categories()
            .await
            .into_iter()
            .map(|category| SelectOption {
                selected: category.id.to_string() == form.category_id,
                value: category.id.to_string(),
                label: category.name,
            })
            .collect();
        let template = AdminToolFormTemplate {
            chrome: self.form_chrome(AdminSection::Tools, form.id.is_empty(), errors),
            form,
            categories,
        };
        Ok(form_page(
            render_body("admin/tool_form.html", &template)?,
            self.admin_head("Edit Tool"),
            errors,
        ))
    }

    pub fn category_form(
        &self,
        form: CategoryForm,
        errors: &FieldErrors,
    ) -> Result<RenderedPage, RenderError> {
        let template = AdminCategoryFormTemplate {
            chrome: self.form_chrome(AdminSection::Categories, form.id.is_empty(), errors),
            form,
        };
        Ok(form_page(
            render_body("admin/category_form.html", &template)?,
            self.admin_head("Edit Category"),
            errors,
        ))
    }

    pub fn agent_form(
        &self,
        form: AgentForm,
        errors: &FieldErrors,
    ) -> Result<RenderedPage, RenderError> {
        let pricing = form.pricing_type.parse::<PricingType>().unwrap_or_default();
        let status = form.status.parse::<AgentStatus>().unwrap_or(AgentStatus::Active);
        let template = AdminAgentFormTemplate {
            chrome: self.form_chrome(AdminSection::Agents, form.id.is_empty(), errors),
            pricing_types: PricingType::ALL
                .into_iter()
                .map(|option| SelectOption {
                    value: option.as_str().to_string(),
                    label: option.label().to_string(),
                    selected: option == pricing,
                })
                .collect(),
            statuses: [AgentStatus::Active, AgentStatus::Inactive]
                .into_iter()
                .map(|option| SelectOption {
                    value: option.as_str().to_string(),
                    label: title_case(option.as_str()),
                    selected: option == status,
                })
                .collect(),
            is_featured: form.is_featured.as_deref().is_some_and(|v| !v.is_empty()),
            is_verified: form.is_verified.as_deref().is_some_and(|v| !v.is_empty()),
            form,
        };
        Ok(form_page(
            render_body("admin/agent_form.html", &template)?,
            self.admin_head("Edit Agent"),
            errors,
        ))
    }
}

fn form_page(body: String, head: HeadMetadata, errors: &FieldErrors) -> RenderedPage {
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    RenderedPage { status, body, head }
}

fn admin_nav(active: Option<AdminSection>, counts: Option<AdminCounts>) -> Vec<AdminNavItem> {
    AdminSection::ALL
        .into_iter()
        .map(|section| AdminNavItem {
            label: section.label(),
            href: section.list_path(),
            count: counts.map(|counts| match section {
                AdminSection::Tools => counts.tools,
                AdminSection::Categories => counts.categories,
                AdminSection::Agents => counts.agents,
            }),
            is_active: active == Some(section),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_public_routes() {
        assert_eq!(SiteRoute::parse("/"), SiteRoute::Home);
        assert_eq!(SiteRoute::parse("/categories/"), SiteRoute::Categories);
        assert_eq!(
            SiteRoute::parse("/ai/chat%20bot"),
            SiteRoute::Tool("chat bot".into())
        );
        assert_eq!(
            SiteRoute::parse("/category/image-editing?ref=x"),
            SiteRoute::Category("image-editing".into())
        );
        assert_eq!(SiteRoute::parse("/ai-agent"), SiteRoute::Agents);
        assert_eq!(SiteRoute::parse("/terms"), SiteRoute::Info(InfoPage::Terms));
        assert_eq!(SiteRoute::parse("/nope"), SiteRoute::NotFound);
        assert_eq!(SiteRoute::parse("/ai"), SiteRoute::NotFound);
    }

    #[test]
    fn parses_search_and_compare() {
        assert_eq!(
            SiteRoute::parse("/search?q=image+tools"),
            SiteRoute::Search {
                query: "image tools".into()
            }
        );
        assert_eq!(
            SiteRoute::parse("/compare/chatgpt-vs-claude"),
            SiteRoute::Compare {
                left: "chatgpt".into(),
                right: "claude".into()
            }
        );
        assert_eq!(SiteRoute::parse("/compare/chatgpt"), SiteRoute::NotFound);
    }

    #[test]
    fn parses_admin_routes() {
        let id = Uuid::new_v4();
        assert_eq!(SiteRoute::parse("/admin"), SiteRoute::AdminDashboard);
        assert_eq!(
            SiteRoute::parse("/admin/tools?q=gpt"),
            SiteRoute::AdminList {
                section: AdminSection::Tools,
                query: "gpt".into()
            }
        );
        assert_eq!(
            SiteRoute::parse("/admin/agents/new"),
            SiteRoute::AdminNew(AdminSection::Agents)
        );
        assert_eq!(
            SiteRoute::parse(&format!("/admin/categories/{id}/edit")),
            SiteRoute::AdminEdit {
                section: AdminSection::Categories,
                id
            }
        );
        assert_eq!(SiteRoute::parse("/admin/posts"), SiteRoute::NotFound);
        assert_eq!(SiteRoute::parse("/admin/tools/not-a-uuid/edit"), SiteRoute::NotFound);
    }

    #[test]
    fn pages_that_read_live_state_classify_as_fresh() {
        let table = crate::cache::RouteTable::default();
        for target in [
            "/admin",
            "/admin/",
            "/%61dmin/tools",
            "/admin%2Fagents/new",
            "/%6Cogin",
            "/search/?q=chat",
            "/compare/a-vs-b/",
        ] {
            let live = matches!(
                SiteRoute::parse(target),
                SiteRoute::AdminDashboard
                    | SiteRoute::AdminList { .. }
                    | SiteRoute::AdminNew(_)
                    | SiteRoute::Login
                    | SiteRoute::Search { .. }
                    | SiteRoute::Compare { .. }
            );
            assert!(live, "{target} should route to a live page");
            assert_eq!(
                table.classify(target),
                crate::cache::RouteClass::Fresh,
                "{target}"
            );
        }
    }

    #[test]
    fn profile_builds_absolute_urls() {
        let profile = SiteProfile::new("Aitoonic", "https://aitoonic.com/");
        assert_eq!(profile.url("/ai/x"), "https://aitoonic.com/ai/x");
        assert_eq!(profile.title("About Us"), "About Us | Aitoonic");
    }
}
