//! URL slugs for catalog entries.
//!
//! Slugs are derived from display names rather than stored: the name is
//! lowercased and every run of whitespace becomes a single `-`. Stores match a
//! requested slug against the same derivation of each stored name, so names
//! that already contain hyphens resolve too.

/// Derive the public slug for a catalog name.
pub fn slug_from_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalize a slug taken from a request path for comparison.
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().trim_matches('/').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_collapses_whitespace() {
        assert_eq!(slug_from_name("Chat GPT"), "chat-gpt");
        assert_eq!(slug_from_name("  Mid   Journey\tPro "), "mid-journey-pro");
        assert_eq!(slug_from_name("Claude"), "claude");
    }

    #[test]
    fn slug_keeps_punctuation() {
        assert_eq!(slug_from_name("Copy.ai Writer"), "copy.ai-writer");
    }

    #[test]
    fn hyphenated_names_keep_their_hyphens() {
        assert_eq!(slug_from_name("GPT-4 Turbo"), "gpt-4-turbo");
    }

    #[test]
    fn normalize_slug_lowercases_request_segments() {
        assert_eq!(normalize_slug("Chat-GPT/"), "chat-gpt");
    }

    #[test]
    fn empty_name_yields_empty_slug() {
        assert_eq!(slug_from_name("   "), "");
    }
}
