//! Engine policy configuration
//!
//! Policy knobs that differ between deployments. Every field has a default
//! matching the platform's server rules, so an empty TOML document is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{EngineError, Result};
use crate::identifiers::ContentType;

/// Policy configuration for the resolvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Top of the reward scale
    pub max_reward_level: u8,
    /// Ceiling applied to user-authored showcase content
    pub by_user_reward_level: u8,
    /// Root types whose positive reward level collapses to 1
    pub collapsed_root_types: Vec<ContentType>,
    /// Types no non-owner may edit or delete, whatever their rank
    pub moderator_locked_types: Vec<ContentType>,
    /// Only one reward interface may be open at a time
    pub single_flight_rewards: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_reward_level: Self::DEFAULT_MAX_REWARD_LEVEL,
            by_user_reward_level: Self::DEFAULT_MAX_REWARD_LEVEL,
            collapsed_root_types: vec![ContentType::Video, ContentType::Url],
            moderator_locked_types: vec![ContentType::AiStory],
            single_flight_rewards: true,
        }
    }
}

impl EngineConfig {
    /// Reward scale used by the platform
    pub const DEFAULT_MAX_REWARD_LEVEL: u8 = 5;

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_reward_level == 0 {
            return Err(EngineError::config("max_reward_level must be positive"));
        }
        if self.by_user_reward_level == 0 || self.by_user_reward_level > self.max_reward_level {
            return Err(EngineError::config(format!(
                "by_user_reward_level must be within 1..={}",
                self.max_reward_level
            )));
        }
        if let Some(bad) = self
            .collapsed_root_types
            .iter()
            .find(|t| !t.is_root_type())
        {
            return Err(EngineError::config(format!(
                "{bad} cannot be a comment root"
            )));
        }
        Ok(())
    }

    /// Whether a positive root reward level of this type collapses to 1
    pub fn collapses_root(&self, root_type: ContentType) -> bool {
        self.collapsed_root_types.contains(&root_type)
    }

    /// Whether non-owners are locked out of editing and deleting this type
    pub fn is_moderator_locked(&self, content_type: ContentType) -> bool {
        self.moderator_locked_types.contains(&content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.collapses_root(ContentType::Video));
        assert!(!config.collapses_root(ContentType::Subject));
        assert!(config.is_moderator_locked(ContentType::AiStory));
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            by_user_reward_level = 3
            moderator_locked_types = ["ai-story", "mission-pass"]
            "#,
        )
        .unwrap();
        assert_eq!(config.by_user_reward_level, 3);
        assert!(config.is_moderator_locked(ContentType::MissionPass));
        assert!(config.single_flight_rewards);
    }

    #[test]
    fn test_validation_failures() {
        assert!(matches!(
            EngineConfig::from_toml_str("by_user_reward_level = 0"),
            Err(EngineError::Config { .. })
        ));
        assert!(EngineConfig::from_toml_str("by_user_reward_level = 6").is_err());
        assert!(EngineConfig::from_toml_str("max_reward_level = 0").is_err());
        assert!(EngineConfig::from_toml_str(r#"collapsed_root_types = ["reply"]"#).is_err());
        assert!(EngineConfig::from_toml_str("unknown_knob = true").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "single_flight_rewards = false").unwrap();

        let config = EngineConfig::load_from_file(file.path()).unwrap();
        assert!(!config.single_flight_rewards);

        let missing = EngineConfig::load_from_file(Path::new("/nonexistent/veil.toml"));
        assert!(matches!(missing, Err(EngineError::Config { .. })));
    }
}
