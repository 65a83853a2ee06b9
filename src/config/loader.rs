use std::{collections::HashMap, env, fs, path::PathBuf};

use super::app_config::{
    AppConfig, PartialAppConfig, CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_BASE_BRANCH,
    ENV_MAX_QUESTIONS, ENV_MIN_QUESTIONS, ENV_STORAGE_DIR,
};
use crate::errors::ConfigError;

const CONFIG_TEMPLATE: &str = r#"# vibedebt configuration.
# Every value here can be overridden per invocation via environment
# variables: VIBEDEBT_MIN_QUESTIONS, VIBEDEBT_MAX_QUESTIONS,
# VIBEDEBT_STORAGE_DIR, VIBEDEBT_BASE_BRANCH.

[quiz]
# min_questions = 2
# max_questions = 10

[storage]
# dir = "./VibeDebt"

[git]
# base_branch = "main"
"#;

/// Configuration loader responsible for locating the config file, seeding
/// it with a commented template on first run, and merging it with the
/// environment.
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader that uses the user configuration directory.
    pub fn new() -> Self {
        Self { base_path: None }
    }

    /// Create a loader rooted at a custom directory (for testing).
    pub fn with_base_path(base_path: PathBuf) -> Self {
        Self {
            base_path: Some(base_path),
        }
    }

    /// Load the complete application configuration.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let config_path = self.config_file_path()?;
        self.initialize_config(&config_path)?;

        let partial = self.load_partial_config(&config_path)?;
        let env_map = collect_env_vars();

        AppConfig::from_partial_and_env(partial, env_map)
    }

    fn config_file_path(&self) -> Result<PathBuf, ConfigError> {
        let base = match &self.base_path {
            Some(path) => path.clone(),
            None => dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(CONFIG_DIR_NAME),
        };
        Ok(base.join(CONFIG_FILE_NAME))
    }

    /// Seed the config directory and template file on first run.
    fn initialize_config(&self, config_path: &PathBuf) -> Result<(), ConfigError> {
        if config_path.exists() {
            return Ok(());
        }
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::FileWrite(parent.display().to_string(), e))?;
        }
        tracing::info!("Writing default config to {}", config_path.display());
        fs::write(config_path, CONFIG_TEMPLATE)
            .map_err(|e| ConfigError::FileWrite(config_path.display().to_string(), e))
    }

    fn load_partial_config(
        &self,
        config_path: &PathBuf,
    ) -> Result<Option<PartialAppConfig>, ConfigError> {
        if !config_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::FileRead(config_path.display().to_string(), e))?;
        let partial = toml::from_str::<PartialAppConfig>(&content)
            .map_err(|e| ConfigError::TomlParse(config_path.display().to_string(), e))?;
        Ok(Some(partial))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the recognized environment overrides into an explicit map. This
/// is the only place the process environment is read.
fn collect_env_vars() -> HashMap<String, String> {
    let mut env_map = HashMap::new();
    for key in [
        ENV_MIN_QUESTIONS,
        ENV_MAX_QUESTIONS,
        ENV_STORAGE_DIR,
        ENV_BASE_BRANCH,
    ] {
        if let Ok(value) = env::var(key) {
            env_map.insert(key.to_string(), value);
        }
    }
    env_map
}
