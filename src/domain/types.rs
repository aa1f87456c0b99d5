//! Shared domain enumerations aligned with persisted text columns.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    Inactive,
}

impl AgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Active => "active",
            AgentStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for AgentStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AgentStatus::Active),
            "inactive" => Ok(AgentStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "unknown agent status `{other}`"
            ))),
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    #[default]
    Free,
    Freemium,
    Paid,
    Subscription,
}

impl PricingType {
    pub const ALL: [PricingType; 4] = [
        PricingType::Free,
        PricingType::Freemium,
        PricingType::Paid,
        PricingType::Subscription,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PricingType::Free => "free",
            PricingType::Freemium => "freemium",
            PricingType::Paid => "paid",
            PricingType::Subscription => "subscription",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PricingType::Free => "Free",
            PricingType::Freemium => "Freemium",
            PricingType::Paid => "Paid",
            PricingType::Subscription => "Subscription",
        }
    }
}

impl FromStr for PricingType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "free" => Ok(PricingType::Free),
            "freemium" => Ok(PricingType::Freemium),
            "paid" => Ok(PricingType::Paid),
            "subscription" => Ok(PricingType::Subscription),
            other => Err(DomainError::validation(format!(
                "unknown pricing type `{other}`"
            ))),
        }
    }
}

impl fmt::Display for PricingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_type_defaults_to_free_for_blank_input() {
        assert_eq!("".parse::<PricingType>().unwrap(), PricingType::Free);
        assert_eq!(" Paid ".parse::<PricingType>().unwrap(), PricingType::Paid);
        assert!("lifetime".parse::<PricingType>().is_err());
    }

    #[test]
    fn agent_status_round_trips_through_text() {
        for status in [AgentStatus::Active, AgentStatus::Inactive] {
            assert_eq!(status.as_str().parse::<AgentStatus>().unwrap(), status);
        }
    }
}
