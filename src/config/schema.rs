use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::benefits::PolicyConfig;

/// Example YAML:
/// ```yaml
/// store_path: /srv/uts/records.json
/// policy:
///   level3_boundary: exclusive
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Record file (default: ~/.config/exam-benefits/records.json)
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    #[serde(default)]
    pub policy: PolicyConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benefits::Level3Boundary;

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
store_path: /tmp/records.json
policy:
  level3_boundary: inclusive
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/records.json")));
        assert_eq!(config.policy.level3_boundary, Level3Boundary::Inclusive);
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "queries: []\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            store_path: Some(PathBuf::from("records.json")),
            policy: PolicyConfig::inclusive(),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
