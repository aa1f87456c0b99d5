//! Page rendering contract consumed by the render dispatcher.

pub mod site;

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

use crate::presentation::head::HeadMetadata;

pub use site::{SiteProfile, SiteRenderer, SiteRoute};

/// A rendered page body plus the metadata for its document head.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub status: StatusCode,
    pub body: String,
    pub head: HeadMetadata,
}

impl RenderedPage {
    pub fn ok(body: String, head: HeadMetadata) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            head,
        }
    }

    pub fn not_found(body: String, head: HeadMetadata) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body,
            head: head.noindex(),
        }
    }

    /// Bare page with default head metadata.
    pub fn html(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            head: HeadMetadata::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render template `{template}`")]
    Template {
        template: &'static str,
        #[source]
        source: askama::Error,
    },
    #[error("renderer unavailable: {reason}")]
    Unavailable { reason: String },
}

impl RenderError {
    pub fn template(template: &'static str, source: askama::Error) -> Self {
        Self::Template { template, source }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Produces a page for a request target (path plus optional query).
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, target: &str) -> Result<RenderedPage, RenderError>;
}
