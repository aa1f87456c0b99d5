//! Parsing helpers for admin form submissions.
//!
//! Structured list fields are edited as plain text, one entry per line:
//!
//! - features and use cases: `Title | Description`
//! - pricing plans: `Plan | Price | feature one; feature two`
//! - capabilities and agent features: one item per line

use std::fmt;

use crate::domain::entities::{Feature, PricingPlan, UseCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level validation failures collected while parsing a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|err| err.message.as_str())
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self.0.iter().map(|err| err.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Trim a value; blank becomes `None`.
pub fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn required(
    value: &str,
    field: &'static str,
    message: &str,
    errors: &mut FieldErrors,
) -> String {
    match clean(value) {
        Some(value) => value,
        None => {
            errors.push(field, message);
            String::new()
        }
    }
}

pub fn checkbox(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("on" | "true" | "1"))
}

pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines().filter_map(clean).collect()
}

fn split_pair(line: &str) -> (String, String) {
    match line.split_once('|') {
        Some((title, description)) => (title.trim().to_string(), description.trim().to_string()),
        None => (line.trim().to_string(), String::new()),
    }
}

pub fn parse_features(text: &str) -> Vec<Feature> {
    parse_lines(text)
        .iter()
        .map(|line| {
            let (title, description) = split_pair(line);
            Feature { title, description }
        })
        .collect()
}

pub fn parse_use_cases(text: &str) -> Vec<UseCase> {
    parse_lines(text)
        .iter()
        .map(|line| {
            let (title, description) = split_pair(line);
            UseCase { title, description }
        })
        .collect()
}

pub fn parse_pricing(text: &str) -> Vec<PricingPlan> {
    parse_lines(text)
        .iter()
        .map(|line| {
            let mut parts = line.splitn(3, '|').map(str::trim);
            let plan = parts.next().unwrap_or_default().to_string();
            let price = parts.next().unwrap_or_default().to_string();
            let features = parts
                .next()
                .map(|list| list.split(';').filter_map(clean).collect())
                .unwrap_or_default();
            PricingPlan {
                plan,
                price,
                features,
            }
        })
        .collect()
}

pub fn format_features(features: &[Feature]) -> String {
    features
        .iter()
        .map(|f| format!("{} | {}", f.title, f.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_use_cases(use_cases: &[UseCase]) -> String {
    use_cases
        .iter()
        .map(|u| format!("{} | {}", u.title, u.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_pricing(plans: &[PricingPlan]) -> String {
    plans
        .iter()
        .map(|p| format!("{} | {} | {}", p.plan, p.price, p.features.join("; ")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_trims_and_drops_blank() {
        assert_eq!(clean("  hi "), Some("hi".to_string()));
        assert_eq!(clean("   "), None);
    }

    #[test]
    fn features_split_on_first_pipe() {
        let parsed = parse_features("Fast | Renders in ms\n\n  Cheap  \nA | b | c");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].title, "Fast");
        assert_eq!(parsed[0].description, "Renders in ms");
        assert_eq!(parsed[1].description, "");
        assert_eq!(parsed[2].description, "b | c");
    }

    #[test]
    fn pricing_lines_carry_feature_lists() {
        let plans = parse_pricing("Pro | $20 | API access; Priority support;\nFree | $0");
        assert_eq!(plans[0].plan, "Pro");
        assert_eq!(plans[0].price, "$20");
        assert_eq!(plans[0].features, ["API access", "Priority support"]);
        assert!(plans[1].features.is_empty());
    }

    #[test]
    fn pricing_survives_a_format_parse_cycle() {
        let original = parse_pricing("Team | $99 | Seats; SSO");
        assert_eq!(parse_pricing(&format_pricing(&original)), original);
    }

    #[test]
    fn checkbox_accepts_browser_on_value() {
        assert!(checkbox(Some("on")));
        assert!(!checkbox(None));
        assert!(!checkbox(Some("")));
    }
}
