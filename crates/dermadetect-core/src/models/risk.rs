use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Risk bucket assigned to a triage session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Only high-risk cases go through the referral wizard.
    pub fn requires_enrichment(&self) -> bool {
        matches!(self, RiskLevel::High)
    }

    pub fn title(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Not Serious",
            RiskLevel::Medium => "Needs Attention",
            RiskLevel::High => "Very Serious",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low risk, monitor for changes",
            RiskLevel::Medium => "Moderate risk factors present",
            RiskLevel::High => "High-risk characteristics detected",
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::Low => &[
                "Continue regular skin monitoring",
                "Maintain good skin hygiene",
                "Use sunscreen protection",
            ],
            RiskLevel::Medium => &[
                "Schedule follow-up in 2-4 weeks",
                "Monitor for any changes",
                "Keep detailed records",
            ],
            RiskLevel::High => &[
                "Seek immediate medical attention",
                "Prepare detailed medical history",
                "Bring all previous records",
            ],
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(CoreError::InvalidRiskLevel(other.to_string())),
        }
    }
}
