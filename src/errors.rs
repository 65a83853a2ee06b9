use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Git error: {0}")]
    Git(#[from] GitError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("I/O error while {0}: {1}")]
    IO(String, #[source] std::io::Error),
    #[error("Application error: {0}")]
    Generic(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to write to path '{0}': {1}")]
    FileWrite(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
    #[error("Other config error: {0}")]
    Other(String),
}

/// Errors raised while talking to git or while establishing the branch
/// context for a run. The first three variants are the context errors from
/// which a run cannot recover; they are reported to the caller before any
/// quiz starts.
#[derive(Debug)]
pub enum GitError {
    BranchUnidentifiable,
    SameAsBase {
        branch: String,
    },
    NoChanges {
        base: String,
        head: String,
    },
    CommandFailed {
        command: String,
        status_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    Other(String),
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::BranchUnidentifiable => write!(
                f,
                "Could not identify the current branch (detached HEAD or not a git repository)."
            ),
            GitError::SameAsBase { branch } => write!(
                f,
                "Current branch '{}' is the base branch itself; nothing to quiz on.",
                branch
            ),
            GitError::NoChanges { base, head } => {
                write!(f, "No changed files between '{}' and '{}'.", base, head)
            }
            GitError::CommandFailed {
                command,
                status_code,
                stdout,
                stderr,
            } => {
                write!(f, "Git command '{}' failed", command)?;
                if let Some(c) = status_code {
                    write!(f, " with exit code {}", c)?;
                }
                if !stdout.is_empty() {
                    write!(f, "\nStdout:\n{}", stdout)?;
                }
                if !stderr.is_empty() {
                    write!(f, "\nStderr:\n{}", stderr)?;
                }
                Ok(())
            }
            GitError::Other(s) => write!(f, "Git error: {}", s),
        }
    }
}

impl std::error::Error for GitError {}

/// Contract violations inside a quiz session. These are defects, not
/// recoverable conditions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Question {index} has already been scored")]
    AlreadyScored { index: usize },
    #[error("Session is not in progress")]
    NotInProgress,
    #[error("Question index {index} out of range (total {total})")]
    IndexOutOfRange { index: usize, total: usize },
    #[error("Category distribution sums to {actual}, expected {expected}")]
    DistributionMismatch { expected: u32, actual: u32 },
    #[error("Generator returned {actual} '{category}' questions, plan requires {expected}")]
    PlanMismatch {
        category: String,
        expected: u32,
        actual: u32,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create record directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write record '{path}': {source}")]
    WriteRecord {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read record '{path}': {source}")]
    ReadRecord {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to delete record '{path}': {source}")]
    DeleteRecord {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize record for '{path}': {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Record '{path}' is not valid JSON: {source}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IO("I/O operation failed".to_string(), err)
    }
}
