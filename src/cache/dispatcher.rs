//! Per-request render dispatch.

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode};
use tracing::{debug, error};

use super::{
    clock::Clock,
    policy::TtlPolicy,
    routes::{RouteClass, RouteTable},
    store::{CacheEntry, ResponseCache, is_fresh},
};
use crate::application::render::{RenderedPage, Renderer};

/// How a request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Fresh route; cache never consulted.
    Bypass,
    /// Served from a fresh cache entry.
    Hit,
    /// No entry existed; rendered.
    Miss,
    /// Entry existed but had expired; re-rendered.
    Stale,
}

impl CacheOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheOutcome::Bypass => "bypass",
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Stale => "stale",
        }
    }
}

#[derive(Debug, Clone)]
pub enum DispatchBody {
    Page(Arc<RenderedPage>),
    /// The renderer failed; the HTTP layer answers with a generic 500.
    Failure,
}

#[derive(Debug, Clone)]
pub struct Dispatched {
    pub class: RouteClass,
    pub outcome: CacheOutcome,
    pub status: StatusCode,
    pub cache_control: HeaderValue,
    pub body: DispatchBody,
}

impl Dispatched {
    pub fn page(&self) -> Option<&Arc<RenderedPage>> {
        match &self.body {
            DispatchBody::Page(page) => Some(page),
            DispatchBody::Failure => None,
        }
    }

    fn from_entry(class: RouteClass, entry: CacheEntry) -> Self {
        Self {
            class,
            outcome: CacheOutcome::Hit,
            status: entry.page.status,
            cache_control: entry.cache_control,
            body: DispatchBody::Page(entry.page),
        }
    }
}

pub struct RenderDispatcher {
    routes: RouteTable,
    policy: TtlPolicy,
    cache: Arc<ResponseCache>,
    renderer: Arc<dyn Renderer>,
    clock: Arc<dyn Clock>,
}

impl RenderDispatcher {
    pub fn new(
        routes: RouteTable,
        policy: TtlPolicy,
        cache: Arc<ResponseCache>,
        renderer: Arc<dyn Renderer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            routes,
            policy,
            cache,
            renderer,
            clock,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn classify(&self, target: &str) -> RouteClass {
        self.routes.classify(target)
    }

    /// Serve `target` (path plus optional query) from cache or by rendering.
    pub async fn handle(&self, target: &str) -> Dispatched {
        let class = self.routes.classify(target);

        if class == RouteClass::Fresh {
            return self.render(target, class, CacheOutcome::Bypass).await;
        }

        let prior = self.cache.get(target);
        let outcome = match prior {
            Some(entry) if is_fresh(&entry, self.clock.now(), self.policy.ttl(class)) => {
                record_outcome(class, CacheOutcome::Hit);
                debug!(
                    target = "aitoonic::cache::dispatcher",
                    path = target,
                    class = class.as_str(),
                    "served from cache"
                );
                return Dispatched::from_entry(class, entry);
            }
            Some(_) => CacheOutcome::Stale,
            None => CacheOutcome::Miss,
        };

        self.render(target, class, outcome).await
    }

    async fn render(&self, target: &str, class: RouteClass, outcome: CacheOutcome) -> Dispatched {
        record_outcome(class, outcome);
        let cache_control = self.policy.cache_control(class);

        match self.renderer.render(target).await {
            Ok(page) => {
                let page = Arc::new(page);
                let status = page.status;

                if class != RouteClass::Fresh && status == StatusCode::OK {
                    self.cache.put(
                        target,
                        CacheEntry {
                            page: Arc::clone(&page),
                            cache_control: cache_control.clone(),
                            stored_at: self.clock.now(),
                        },
                    );
                }

                let cache_control = if status == StatusCode::OK {
                    cache_control
                } else {
                    HeaderValue::from_static("no-store")
                };

                Dispatched {
                    class,
                    outcome,
                    status,
                    cache_control,
                    body: DispatchBody::Page(page),
                }
            }
            Err(err) => {
                metrics::counter!("aitoonic_render_failures_total", "class" => class.as_str())
                    .increment(1);
                error!(
                    target = "aitoonic::cache::dispatcher",
                    path = target,
                    class = class.as_str(),
                    error = %err,
                    "render failed"
                );
                Dispatched {
                    class,
                    outcome,
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    cache_control: HeaderValue::from_static("no-store"),
                    body: DispatchBody::Failure,
                }
            }
        }
    }
}

fn record_outcome(class: RouteClass, outcome: CacheOutcome) {
    metrics::counter!(
        "aitoonic_render_requests_total",
        "class" => class.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
