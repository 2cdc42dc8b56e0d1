//! Schema loader configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GROUP_TABLE_PREFIX, DEFAULT_MAX_ARTIFACT_BYTES, DEFAULT_SYSTEM_SCHEMA,
};
use crate::error::{StrataError, StrataResult};

/// Configuration for loading a metadata artifact and traversing group trees.
///
/// # Example
///
/// ```rust
/// use strata_common::config::LoaderConfig;
///
/// let config = LoaderConfig::default();
/// assert_eq!(config.system_schema, "strata_information_schema");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Largest declared artifact length accepted before decoding.
    #[serde(default = "default_max_artifact_bytes")]
    pub max_artifact_bytes: usize,

    /// Schema whose tables are excluded from physical-key ordinal maps.
    #[serde(default = "default_system_schema")]
    pub system_schema: String,

    /// Prefix of generated group storage table names.
    #[serde(default = "default_group_table_prefix")]
    pub group_table_prefix: String,
}

fn default_max_artifact_bytes() -> usize {
    DEFAULT_MAX_ARTIFACT_BYTES
}

fn default_system_schema() -> String {
    DEFAULT_SYSTEM_SCHEMA.to_string()
}

fn default_group_table_prefix() -> String {
    DEFAULT_GROUP_TABLE_PREFIX.to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_artifact_bytes: default_max_artifact_bytes(),
            system_schema: default_system_schema(),
            group_table_prefix: default_group_table_prefix(),
        }
    }
}

impl LoaderConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> StrataResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| StrataError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save(&self, path: &Path) -> StrataResult<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Converts configuration to a TOML string.
    pub fn to_toml(&self) -> StrataResult<String> {
        toml::to_string_pretty(self).map_err(|e| StrataError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> StrataResult<()> {
        if self.max_artifact_bytes == 0 {
            return Err(StrataError::InvalidConfig {
                message: "max_artifact_bytes must be positive".to_string(),
            });
        }

        if u32::try_from(self.max_artifact_bytes).is_err() {
            return Err(StrataError::InvalidConfig {
                message: "max_artifact_bytes must fit the 4-byte length prefix".to_string(),
            });
        }

        if self.group_table_prefix.is_empty() {
            return Err(StrataError::InvalidConfig {
                message: "group_table_prefix must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LoaderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = LoaderConfig {
            max_artifact_bytes: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StrataError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: LoaderConfig = toml::from_str("system_schema = \"sys\"").unwrap();
        assert_eq!(config.system_schema, "sys");
        assert_eq!(config.max_artifact_bytes, DEFAULT_MAX_ARTIFACT_BYTES);
        assert_eq!(config.group_table_prefix, DEFAULT_GROUP_TABLE_PREFIX);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("strata.toml");

        let config = LoaderConfig {
            max_artifact_bytes: 1024,
            system_schema: "internal".to_string(),
            group_table_prefix: "_g_".to_string(),
        };

        config.save(&path).unwrap();

        let loaded = LoaderConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
