use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;

use super::loader::ConfigLoader;
use crate::errors::ConfigError;

// Configuration file location (under the user config dir) and name.
pub const CONFIG_DIR_NAME: &str = "vibedebt";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Defaults applied when neither file nor environment supplies a value.
pub const DEFAULT_MIN_QUESTIONS: u32 = 2;
pub const DEFAULT_MAX_QUESTIONS: u32 = 10;
pub const DEFAULT_STORAGE_DIR: &str = "./VibeDebt";

// Environment overrides, collected into an explicit map by the loader so
// nothing below this layer ever reads process-wide state.
pub const ENV_MIN_QUESTIONS: &str = "VIBEDEBT_MIN_QUESTIONS";
pub const ENV_MAX_QUESTIONS: &str = "VIBEDEBT_MAX_QUESTIONS";
pub const ENV_STORAGE_DIR: &str = "VIBEDEBT_STORAGE_DIR";
pub const ENV_BASE_BRANCH: &str = "VIBEDEBT_BASE_BRANCH";

/// Main application configuration, fully resolved.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub quiz: QuizConfig,
    pub storage: StorageConfig,
    /// Optional override for base-branch detection.
    pub base_branch: Option<String>,
}

/// Question-count bounds for the planner.
#[derive(Debug, Clone, Copy)]
pub struct QuizConfig {
    pub min_questions: u32,
    pub max_questions: u32,
}

/// Where per-branch record files live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

/// Partial configuration as read from the TOML file. Every field is
/// optional; the resolver fills the gaps from the environment map and the
/// built-in defaults.
#[derive(Deserialize, Debug, Default)]
pub struct PartialAppConfig {
    pub quiz: Option<PartialQuizConfig>,
    pub storage: Option<PartialStorageConfig>,
    pub git: Option<PartialGitConfig>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialQuizConfig {
    pub min_questions: Option<u32>,
    pub max_questions: Option<u32>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialStorageConfig {
    pub dir: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialGitConfig {
    pub base_branch: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quiz: QuizConfig {
                min_questions: DEFAULT_MIN_QUESTIONS,
                max_questions: DEFAULT_MAX_QUESTIONS,
            },
            storage: StorageConfig {
                dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            },
            base_branch: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the user config file and the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load_config()
    }

    /// Load configuration rooted at a custom directory (for testing).
    pub fn load_with_base_path(base_path: PathBuf) -> Result<Self, ConfigError> {
        ConfigLoader::with_base_path(base_path).load_config()
    }

    /// Resolve the final configuration from an optional partial file config
    /// and an explicit environment map. Environment wins over file, file
    /// wins over defaults.
    pub fn from_partial_and_env(
        partial: Option<PartialAppConfig>,
        env_map: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        let quiz = partial.quiz.unwrap_or_default();
        let storage = partial.storage.unwrap_or_default();
        let git = partial.git.unwrap_or_default();

        let min_questions = match env_map.get(ENV_MIN_QUESTIONS) {
            Some(raw) => parse_count(ENV_MIN_QUESTIONS, raw)?,
            None => quiz.min_questions.unwrap_or(DEFAULT_MIN_QUESTIONS),
        };
        let max_questions = match env_map.get(ENV_MAX_QUESTIONS) {
            Some(raw) => parse_count(ENV_MAX_QUESTIONS, raw)?,
            None => quiz.max_questions.unwrap_or(DEFAULT_MAX_QUESTIONS),
        };

        if min_questions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_questions".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if max_questions < min_questions {
            return Err(ConfigError::InvalidValue {
                field: "max_questions".to_string(),
                reason: format!(
                    "must be >= min_questions ({} < {})",
                    max_questions, min_questions
                ),
            });
        }

        let dir = env_map
            .get(ENV_STORAGE_DIR)
            .cloned()
            .or(storage.dir)
            .unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string());

        let base_branch = env_map
            .get(ENV_BASE_BRANCH)
            .cloned()
            .or(git.base_branch)
            .filter(|b| !b.trim().is_empty());

        Ok(Self {
            quiz: QuizConfig {
                min_questions,
                max_questions,
            },
            storage: StorageConfig {
                dir: PathBuf::from(dir),
            },
            base_branch,
        })
    }
}

fn parse_count(field: &str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not a non-negative integer", raw),
        })
}
