pub mod analysis;
pub mod args;
pub mod config;
pub mod errors;
pub mod generator;
pub mod git_module;
pub mod handlers;
pub mod planner;
pub mod session;
pub mod storage;
pub mod types;

// Re-export commonly used items for convenience
pub use config::AppConfig;
pub use errors::AppError;
