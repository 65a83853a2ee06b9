pub mod app_config;
pub mod loader;

pub use app_config::{AppConfig, PartialAppConfig, QuizConfig, StorageConfig};
pub use loader::ConfigLoader;
