use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::EndpointConfig;
use crate::platform::AppPaths;

pub const ENV_PREFIX: &str = "SALES_ASSISTANT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub inference: InferenceConfig,
    pub ui: UIConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Name the assistant logs under.
    pub agent_name: String,
    pub model_id: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub content_type: String,
    pub accept: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIConfig {
    pub title: String,
    pub assistant_label: String,
    pub theme: String,
    pub show_timestamps: bool,
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inference: InferenceConfig {
                agent_name: "SalesAssistantAgent".to_string(),
                model_id: "anthropic.claude-v3.sonnet".to_string(),
                region: "us-east-1".to_string(),
                profile: None,
                content_type: "text/plain".to_string(),
                accept: "text/plain".to_string(),
            },
            ui: UIConfig {
                title: "Bank Sales Assistant".to_string(),
                assistant_label: "Assistant".to_string(),
                theme: "dark".to_string(), // dark, light
                show_timestamps: true,
                tick_rate_ms: 250,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_name: "sales-assistant.log".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Loads the layered configuration. When no explicit file is given and the
    /// default config file is missing, the defaults are written there first.
    pub async fn load(paths: &AppPaths, config_file: Option<&Path>) -> Result<Self> {
        let config_file = match config_file {
            Some(path) => path.to_path_buf(),
            None => {
                let default_file = paths.config_file();
                if !default_file.exists() {
                    info!("Config file not found, creating default configuration");
                    Self::default().save(&default_file).await?;
                }
                default_file
            }
        };

        info!("Loading configuration from: {:?}", config_file);
        Self::load_from(&config_file)
    }

    /// Defaults, then the TOML file (optional), then `SALES_ASSISTANT_*`
    /// environment variables, with `__` separating sections.
    pub fn load_from(config_file: &Path) -> Result<Self> {
        Self::load_from_env(config_file, None)
    }

    /// Same as [`AppConfig::load_from`], but reads the environment layer from
    /// `env` instead of the process environment when given.
    pub fn load_from_env(config_file: &Path, env: Option<Map<String, String>>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())?;

        let config: AppConfig = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(config_file)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, config_file: &Path) -> Result<()> {
        info!("Saving configuration to: {:?}", config_file);

        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(config_file, self.to_toml()?).await?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(config::ConfigError::Message(e.to_string())))
    }

    pub fn validate(&self) -> Result<()> {
        // Endpoint problems report the same way as a failed client build
        self.to_endpoint_config().validate()?;

        if !matches!(self.ui.theme.as_str(), "dark" | "light") {
            return Err(Error::validation(format!("Unknown theme: {}", self.ui.theme)));
        }
        if self.ui.tick_rate_ms < 10 || self.ui.tick_rate_ms > 5000 {
            return Err(Error::validation("Tick rate must be between 10 and 5000 ms"));
        }

        if self.logging.file_name.is_empty() {
            return Err(Error::validation("logging.file_name must not be empty"));
        }

        Ok(())
    }

    /// Command-line flags win over every other layer.
    pub fn apply_overrides(
        &mut self,
        model_id: Option<String>,
        region: Option<String>,
        profile: Option<String>,
    ) {
        if let Some(model_id) = model_id {
            self.inference.model_id = model_id;
        }
        if let Some(region) = region {
            self.inference.region = region;
        }
        if profile.is_some() {
            self.inference.profile = profile;
        }
    }

    pub fn to_endpoint_config(&self) -> EndpointConfig {
        EndpointConfig {
            model_id: self.inference.model_id.clone(),
            region: self.inference.region.clone(),
            profile: self.inference.profile.clone(),
            content_type: self.inference.content_type.clone(),
            accept: self.inference.accept.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.inference.model_id, "anthropic.claude-v3.sonnet");
        assert_eq!(config.inference.region, "us-east-1");
        assert_eq!(config.inference.content_type, "text/plain");
        assert_eq!(config.ui.title, "Bank Sales Assistant");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.inference.model_id = "  ".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = AppConfig::default();
        config.apply_overrides(None, Some(String::new()), None);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let mut config = AppConfig::default();
        config.ui.theme = "neon".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ui.tick_rate_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config =
            AppConfig::load_from_env(&dir.path().join("absent.toml"), Some(Map::new())).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[inference]\nmodel_id = \"anthropic.claude-3-haiku\"\nregion = \"eu-west-1\"\n\n[ui]\nshow_timestamps = false\n",
        )
        .unwrap();

        let config = AppConfig::load_from_env(&path, Some(Map::new())).unwrap();
        assert_eq!(config.inference.model_id, "anthropic.claude-3-haiku");
        assert_eq!(config.inference.region, "eu-west-1");
        assert!(!config.ui.show_timestamps);
        // untouched keys keep their defaults
        assert_eq!(config.inference.accept, "text/plain");
        assert_eq!(config.ui.tick_rate_ms, 250);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ntheme = \"neon\"\n").unwrap();

        let result = AppConfig::load_from_env(&path, Some(Map::new()));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[inference]\nmodel_id = \"anthropic.claude-3-haiku\"\nregion = \"eu-west-1\"\n",
        )
        .unwrap();

        let mut env = Map::new();
        env.insert(
            "SALES_ASSISTANT_INFERENCE__MODEL_ID".to_string(),
            "meta.llama3".to_string(),
        );
        env.insert("SALES_ASSISTANT_UI__TICK_RATE_MS".to_string(), "500".to_string());

        let config = AppConfig::load_from_env(&path, Some(env)).unwrap();
        assert_eq!(config.inference.model_id, "meta.llama3");
        assert_eq!(config.ui.tick_rate_ms, 500);
        // file value without an env counterpart survives
        assert_eq!(config.inference.region, "eu-west-1");
        assert_eq!(config.ui.title, "Bank Sales Assistant");
    }

    #[test]
    fn test_empty_env_endpoint_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let mut env = Map::new();
        env.insert("SALES_ASSISTANT_INFERENCE__REGION".to_string(), "  ".to_string());

        let result = AppConfig::load_from_env(&dir.path().join("absent.toml"), Some(env));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.inference.profile = Some("sales".to_string());
        config.save(&path).await.unwrap();

        let loaded = AppConfig::load_from_env(&path, Some(Map::new())).unwrap();
        assert_eq!(loaded.inference.profile.as_deref(), Some("sales"));
    }

    #[test]
    fn test_overrides_and_endpoint() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("meta.llama3".to_string()), None, Some("dev".to_string()));

        let endpoint = config.to_endpoint_config();
        assert_eq!(endpoint.model_id, "meta.llama3");
        assert_eq!(endpoint.region, "us-east-1");
        assert_eq!(endpoint.profile.as_deref(), Some("dev"));
    }
}
