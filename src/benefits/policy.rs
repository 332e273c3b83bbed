use serde::{Deserialize, Serialize};

/// Benefit policy configuration.
///
/// The default reproduces the institutional ladder literally, including the
/// unmatched score of 241.
///
/// Example YAML:
/// ```yaml
/// policy:
///   level3_boundary: inclusive
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// How the Level 3 lower bound treats 241 (default: exclusive)
    #[serde(default)]
    pub level3_boundary: Level3Boundary,
}

/// Lower boundary of the Level 3 rung.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Level3Boundary {
    /// `score > 241`: 241 matches no rung.
    #[default]
    Exclusive,
    /// `score >= 241`: 241 is Level 3.
    Inclusive,
}

impl PolicyConfig {
    pub fn inclusive() -> Self {
        Self {
            level3_boundary: Level3Boundary::Inclusive,
        }
    }
}
