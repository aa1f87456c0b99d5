//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{AgentStatus, PricingType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithCount {
    pub category: CategoryRecord,
    pub tool_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub plan: String,
    pub price: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub url: String,
    pub category_id: Uuid,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub favicon_url: Option<String>,
    pub rating: Option<f32>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub how_to_use: Option<String>,
    pub features: Vec<Feature>,
    pub use_cases: Vec<UseCase>,
    pub pricing: Vec<PricingPlan>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl ToolRecord {
    /// Price of the first plan with currency symbols stripped, `0` when unpriced.
    pub fn entry_price(&self) -> String {
        self.pricing
            .first()
            .map(|plan| plan.price.replace('$', "").trim().to_string())
            .filter(|price| !price.is_empty())
            .unwrap_or_else(|| "0".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub capabilities: Vec<String>,
    pub agent_features: Vec<String>,
    pub api_endpoint: Option<String>,
    pub pricing_type: PricingType,
    pub status: AgentStatus,
    pub is_featured: bool,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
