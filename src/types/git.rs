use serde::{Deserialize, Serialize};

/// The kind of change a file underwent between the merge base and the
/// branch tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// One file touched in the diff. Constructed once from parsed git output
/// and immutable afterwards.
///
/// For renamed files the record is keyed by the old path and `new_path`
/// carries the destination. Binary files contribute 0/0 line counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    pub change_type: ChangeType,
    pub lines_added: u32,
    pub lines_removed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, change_type: ChangeType) -> Self {
        Self {
            path: path.into(),
            change_type,
            lines_added: 0,
            lines_removed: 0,
            new_path: None,
        }
    }

    /// Total lines touched (added + removed).
    pub fn magnitude(&self) -> u32 {
        self.lines_added + self.lines_removed
    }
}

/// One commit on the branch, from the oneline log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCommit {
    pub sha: String,
    pub message: String,
}

/// Aggregate counters over the full set of changed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub files_changed: usize,
    pub lines_added: u32,
    pub lines_removed: u32,
    pub net_change: i64,
}

impl DiffStats {
    /// Total changed lines, the planner's sizing input.
    pub fn total_lines(&self) -> u32 {
        self.lines_added + self.lines_removed
    }
}

/// The structured result of extracting a branch diff.
#[derive(Debug, Clone)]
pub struct GitDiff {
    pub files: Vec<ChangedFile>,
    pub commits: Vec<BranchCommit>,
    pub stats: DiffStats,
}
