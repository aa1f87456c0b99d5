//! Static export of pre-renderable pages to a directory tree.

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::catalog::CatalogSnapshot;
use crate::application::render::Renderer;
use crate::presentation::views::{LayoutChrome, agent_href, category_href, render_document, tool_href};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to prepare output directory `{path}`: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub written: Vec<String>,
    pub failed: Vec<String>,
}

/// Static routes followed by every tool, category and agent detail route.
pub fn export_routes<'a>(
    static_paths: impl IntoIterator<Item = &'a str>,
    snapshot: &CatalogSnapshot,
) -> Vec<String> {
    let mut routes: Vec<String> = static_paths.into_iter().map(str::to_string).collect();
    routes.extend(snapshot.tools.iter().map(|tool| tool_href(&tool.name)));
    routes.extend(
        snapshot
            .categories
            .iter()
            .map(|category| category_href(&category.name)),
    );
    routes.extend(snapshot.agents.iter().map(|agent| agent_href(&agent.name)));
    routes
}

/// `/` maps to `index.html`; every other route to `<route>/index.html`.
///
/// Returns `None` for routes with empty, `.` or `..` segments, which would
/// otherwise land outside their own directory.
pub fn output_path(root: &Path, route: &str) -> Option<PathBuf> {
    let relative = route.trim_matches('/');
    if relative.is_empty() {
        return Some(root.join("index.html"));
    }

    let mut path = root.to_path_buf();
    for segment in relative.split('/') {
        if matches!(segment, "" | "." | "..") || segment.contains('\\') {
            return None;
        }
        path.push(segment);
    }
    path.push("index.html");
    Some(path)
}

pub struct StaticExporter<'a> {
    renderer: &'a dyn Renderer,
    chrome: &'a LayoutChrome,
    output_dir: &'a Path,
}

impl<'a> StaticExporter<'a> {
    pub fn new(renderer: &'a dyn Renderer, chrome: &'a LayoutChrome, output_dir: &'a Path) -> Self {
        Self {
            renderer,
            chrome,
            output_dir,
        }
    }

    /// Render and write each route. A failing route is logged and skipped.
    pub async fn export(&self, routes: &[String]) -> Result<ExportReport, ExportError> {
        tokio::fs::create_dir_all(self.output_dir)
            .await
            .map_err(|source| ExportError::OutputDir {
                path: self.output_dir.to_path_buf(),
                source,
            })?;

        let mut report = ExportReport::default();
        for route in routes {
            match self.export_route(route).await {
                Ok(path) => {
                    info!(
                        target = "aitoonic::application::export",
                        route = %route,
                        path = %path.display(),
                        "page exported"
                    );
                    report.written.push(route.clone());
                }
                Err(reason) => {
                    error!(
                        target = "aitoonic::application::export",
                        route = %route,
                        error = %reason,
                        "page export failed"
                    );
                    report.failed.push(route.clone());
                }
            }
        }

        if report.failed.is_empty() {
            info!(
                target = "aitoonic::application::export",
                written = report.written.len(),
                "static export complete"
            );
        } else {
            warn!(
                target = "aitoonic::application::export",
                written = report.written.len(),
                failed = report.failed.len(),
                "static export finished with failures"
            );
        }

        Ok(report)
    }

    async fn export_route(&self, route: &str) -> Result<PathBuf, String> {
        let page = self
            .renderer
            .render(route)
            .await
            .map_err(|err| err.to_string())?;
        if page.status != StatusCode::OK {
            return Err(format!("renderer answered {}", page.status));
        }

        let html =
            render_document(&page.head, self.chrome, &page.body).map_err(|err| err.to_string())?;

        let path = output_path(self.output_dir, route)
            .ok_or_else(|| "route does not map to a file inside the output directory".to_string())?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| err.to_string())?;
        }
        tokio::fs::write(&path, html)
            .await
            .map_err(|err| err.to_string())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_route_maps_to_top_level_index() {
        let root = Path::new("/tmp/out");
        assert_eq!(output_path(root, "/"), Some(root.join("index.html")));
        assert_eq!(
            output_path(root, "/ai/writer"),
            Some(root.join("ai").join("writer").join("index.html"))
        );
    }

    #[test]
    fn dot_segments_have_no_output_path() {
        let root = Path::new("/tmp/out");
        for route in ["/ai/..", "/ai/.", "/category/../..", "/ai//x", "/ai/a\\b"] {
            assert_eq!(output_path(root, route), None, "{route}");
        }
    }

    #[test]
    fn routes_list_static_pages_first() {
        let routes = export_routes(["/", "/about"], &CatalogSnapshot::default());
        assert_eq!(routes, ["/", "/about"]);
    }
}
