use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{
        HeaderValue, Method, StatusCode, Uri,
        header::{CACHE_CONTROL, CONTENT_TYPE},
        uri::PathAndQuery,
    },
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{any, get},
};
use time::OffsetDateTime;

use crate::{
    application::{
        admin::AdminCatalogService,
        context::CatalogStores,
        error::{ErrorReport, HttpError},
        render::{RenderedPage, SiteProfile, SiteRenderer},
        repos::HealthRepo,
        sitemap::{SitemapError, SitemapSection, SitemapService},
    },
    cache::{
        Clock, DispatchBody, Dispatched, RenderDispatcher, ResponseCache, RouteTable, TtlPolicy,
    },
    config::{CacheSettings, SiteSettings},
    presentation::views::{LayoutChrome, TemplateRenderError, render_document},
};

use super::{
    RENDER_CACHE_HEADER, admin, db_health_response, json_message, method_not_allowed,
    middleware::{log_responses, set_request_context},
};

const SITEMAP_CACHE_CONTROL: &str = "public, max-age=3600, stale-while-revalidate=86400";
const ROBOTS_CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(Clone)]
pub struct HttpState {
    pub dispatcher: Arc<RenderDispatcher>,
    pub site: Arc<SiteRenderer>,
    pub admin: Arc<AdminCatalogService>,
    pub sitemap: Arc<SitemapService>,
    pub chrome: Arc<LayoutChrome>,
    pub health: Arc<dyn HealthRepo>,
}

impl HttpState {
    /// Assemble the renderer, dispatcher and sitemap service over `stores`.
    pub fn new(
        stores: &CatalogStores,
        site: &SiteSettings,
        cache: &CacheSettings,
        clock: Arc<dyn Clock>,
        year: i32,
    ) -> Self {
        let renderer = Arc::new(SiteRenderer::new(
            stores.catalog(),
            stores.admin(),
            SiteProfile::new(site.brand.clone(), &site.public_url),
        ));
        let dispatcher = RenderDispatcher::new(
            RouteTable::default(),
            TtlPolicy::new(cache.static_ttl, cache.dynamic_ttl),
            Arc::new(ResponseCache::new()),
            renderer.clone(),
            clock,
        );

        Self {
            dispatcher: Arc::new(dispatcher),
            site: renderer,
            admin: Arc::new(stores.admin()),
            sitemap: Arc::new(stores.sitemap(&site.public_url)),
            chrome: Arc::new(LayoutChrome::new(site.brand.clone(), year)),
            health: stores.health.clone(),
        }
    }
}

pub fn build_router(state: HttpState) -> Router {
    // Every page route goes through the dispatcher via the fallback; the
    // explicit routes are machine-facing endpoints and admin form posts.
    Router::new()
        .route("/robots.txt", any(robots_txt))
        .route("/sitemap.xml", any(sitemap))
        .route("/api/sitemap/{file}", any(section_sitemap))
        .route("/_health/db", get(public_health))
        .route(
            "/admin/tools",
            get(render_page).post(admin::save_tool),
        )
        .route(
            "/admin/categories",
            get(render_page).post(admin::save_category),
        )
        .route(
            "/admin/agents",
            get(render_page).post(admin::save_agent),
        )
        .fallback(render_page)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

fn is_read(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

async fn render_page(State(state): State<HttpState>, method: Method, uri: Uri) -> Response {
    if !is_read(&method) {
        return method_not_allowed();
    }

    let target = uri.path_and_query().map(PathAndQuery::as_str).unwrap_or("/");
    let dispatched = state.dispatcher.handle(target).await;
    dispatched_response(&state.chrome, dispatched)
}

fn dispatched_response(chrome: &LayoutChrome, dispatched: Dispatched) -> Response {
    let Dispatched {
        outcome,
        cache_control,
        body,
        ..
    } = dispatched;

    let mut response = match body {
        DispatchBody::Page(page) => match document_response(chrome, &page) {
            Ok(response) => response,
            Err(err) => HttpError::from(err).into_response(),
        },
        DispatchBody::Failure => HttpError::new(
            "infra::http::public::render_page",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "renderer failed",
        )
        .into_response(),
    };

    let failed = response.status().is_server_error();
    let headers = response.headers_mut();
    if failed {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    } else {
        headers.insert(CACHE_CONTROL, cache_control);
    }
    headers.insert(RENDER_CACHE_HEADER, HeaderValue::from_static(outcome.as_str()));
    response
}

/// Wrap a rendered page body in the site document shell.
pub(super) fn document_response(
    chrome: &LayoutChrome,
    page: &RenderedPage,
) -> Result<Response, TemplateRenderError> {
    let html = render_document(&page.head, chrome, &page.body)?;
    Ok((page.status, Html(html)).into_response())
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}

async fn sitemap(State(state): State<HttpState>, method: Method) -> Response {
    if !is_read(&method) {
        return method_not_allowed();
    }

    match state.sitemap.sitemap_xml(OffsetDateTime::now_utc()).await {
        Ok(body) => xml_response(body),
        Err(err) => sitemap_error_response("infra::http::public::sitemap", &err),
    }
}

async fn section_sitemap(
    State(state): State<HttpState>,
    method: Method,
    Path(file): Path<String>,
) -> Response {
    if !is_read(&method) {
        return method_not_allowed();
    }

    let Some(section) = SitemapSection::from_file_name(&file) else {
        return json_message(StatusCode::NOT_FOUND, "Sitemap not found");
    };

    match state.sitemap.section_xml(section).await {
        Ok(body) => xml_response(body),
        Err(err) => sitemap_error_response("infra::http::public::section_sitemap", &err),
    }
}

async fn robots_txt(State(state): State<HttpState>, method: Method) -> Response {
    if !is_read(&method) {
        return method_not_allowed();
    }

    plain_response(state.sitemap.robots_txt())
}

fn sitemap_error_response(source: &'static str, err: &SitemapError) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let mut response = json_message(status, "Error generating sitemap");
    ErrorReport::from_error(source, status, err).attach(&mut response);
    response
}

fn xml_response(body: String) -> Response {
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(SITEMAP_CACHE_CONTROL));
    response
}

fn plain_response(body: String) -> Response {
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(ROBOTS_CACHE_CONTROL));
    response
}
