use crate::core::ConfigProvider;
use crate::core::registry::DEFAULT_MAX_CREDITS;
use crate::utils::error::{CampusError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_APP_NAME: &str = "Campus Course Registration Management";
const DEFAULT_APP_VERSION: &str = "1.0.0";
const DEFAULT_DATA_PATH: &str = "data/";
const DEFAULT_BACKUP_PATH: &str = "backup/";

/// Application configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub paths: PathsSection,
    pub registry: RegistrySection,
    pub backup: BackupSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub version: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            version: DEFAULT_APP_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub data: String,
    pub backup: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            data: DEFAULT_DATA_PATH.to_string(),
            backup: DEFAULT_BACKUP_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    pub max_credits: u32,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            max_credits: DEFAULT_MAX_CREDITS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSection {
    pub auto_enabled: bool,
    pub keep: Option<usize>,
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            auto_enabled: true,
            keep: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CampusError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text. Missing sections fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CampusError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CampusError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("app.name", &self.app.name)?;
        validate_path("paths.data", &self.paths.data)?;
        validate_path("paths.backup", &self.paths.backup)?;
        validate_range("registry.max_credits", self.registry.max_credits, 1, 60)?;
        if let Some(keep) = self.backup.keep {
            validate_range("backup.keep", keep, 1, 1000)?;
        }
        Ok(())
    }

    pub fn auto_backup_enabled(&self) -> bool {
        self.backup.auto_enabled
    }
}

impl ConfigProvider for AppConfig {
    fn data_path(&self) -> &str {
        &self.paths.data
    }

    fn backup_path(&self) -> &str {
        &self.paths.backup
    }

    fn max_credits(&self) -> u32 {
        self.registry.max_credits
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
