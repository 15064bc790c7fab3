use serde::{Deserialize, Serialize};

use crate::models::scoring::PointWeights;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPreset {
    VersionA,
    VersionB,
    Custom,
}

impl ScoringPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPreset::VersionA => "version_a",
            ScoringPreset::VersionB => "version_b",
            ScoringPreset::Custom => "custom",
        }
    }

    /// Built-in table for the preset, `None` for custom tables.
    pub fn weights(&self) -> Option<PointWeights> {
        match self {
            ScoringPreset::VersionA => Some(PointWeights::version_a()),
            ScoringPreset::VersionB => Some(PointWeights::version_b()),
            ScoringPreset::Custom => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    pub preset: ScoringPreset,
    pub weights: PointWeights,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            preset: ScoringPreset::VersionA,
            weights: PointWeights::version_a(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRulesUpdate {
    #[serde(default)]
    pub preset: Option<ScoringPreset>,
    #[serde(default)]
    pub weights: Option<PointWeights>,
}
