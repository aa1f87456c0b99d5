//! Document head metadata produced by page renderers.

use serde_json::Value;

pub const ROBOTS_INDEX: &str = "index, follow";
pub const ROBOTS_NOINDEX: &str = "noindex, nofollow";

/// Everything the document shell needs to emit `<head>` for a page.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadMetadata {
    pub title: String,
    pub description: String,
    pub robots: &'static str,
    pub canonical: Option<String>,
    pub og_type: &'static str,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    /// Serialized JSON-LD documents, already safe for a `<script>` body.
    pub json_ld: Vec<String>,
}

impl HeadMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            robots: ROBOTS_INDEX,
            canonical: None,
            og_type: "website",
            image: None,
            image_alt: None,
            json_ld: Vec::new(),
        }
    }

    pub fn with_canonical(self, canonical: impl Into<String>) -> Self {
        Self {
            canonical: Some(canonical.into()),
            ..self
        }
    }

    pub fn with_og_type(self, og_type: &'static str) -> Self {
        Self { og_type, ..self }
    }

    pub fn with_image(self, image: Option<String>, alt: Option<String>) -> Self {
        Self {
            image,
            image_alt: alt,
            ..self
        }
    }

    pub fn noindex(self) -> Self {
        Self {
            robots: ROBOTS_NOINDEX,
            ..self
        }
    }

    pub fn with_json_ld(mut self, document: &Value) -> Self {
        self.json_ld.push(script_safe_json(document));
        self
    }

    pub fn twitter_card(&self) -> &'static str {
        if self.image.is_some() {
            "summary_large_image"
        } else {
            "summary"
        }
    }
}

impl Default for HeadMetadata {
    fn default() -> Self {
        Self::new("", "")
    }
}

fn script_safe_json(document: &Value) -> String {
    document.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn noindex_overrides_robots() {
        let head = HeadMetadata::new("Missing", "gone").noindex();
        assert_eq!(head.robots, ROBOTS_NOINDEX);
    }

    #[test]
    fn json_ld_cannot_close_script_tag() {
        let head = HeadMetadata::default().with_json_ld(&json!({ "name": "</script>" }));
        assert_eq!(head.json_ld.len(), 1);
        assert!(!head.json_ld[0].contains("</script>"));
    }

    #[test]
    fn twitter_card_depends_on_image() {
        let plain = HeadMetadata::new("t", "d");
        assert_eq!(plain.twitter_card(), "summary");

        let pictured = plain.with_image(Some("https://cdn/x.png".into()), None);
        assert_eq!(pictured.twitter_card(), "summary_large_image");
    }
}
