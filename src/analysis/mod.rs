//! Diff classification and scoring: partitions changed files into
//! categories, ranks the most important files, computes a 0-100 complexity
//! score, and infers an advisory intent label for the branch.

pub mod heuristics;

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{
    CategorizedChange, ChangeCategory, ChangeType, ChangedFile, DiffStats, DiffSummary, GitDiff,
};

/// Heuristic scoring constants. These are tuned values, not invariants;
/// changing any of them is a behavior change guarded by golden tests.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub file_count_weight: f64,
    pub line_volume_divisor: f64,
    pub extension_weight: f64,
    pub churn_weight: f64,
    pub factor_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            file_count_weight: 2.5,
            line_volume_divisor: 20.0,
            extension_weight: 5.0,
            churn_weight: 15.0,
            factor_cap: 25.0,
        }
    }
}

/// How many key files a summary keeps.
const KEY_FILE_LIMIT: usize = 5;

/// A modified file above this many touched lines is treated as a logic
/// change regardless of its add/remove balance.
const NONTRIVIAL_CHANGE_LINES: u32 = 50;

/// Balanced add/remove band treated as a refactoring signal.
const REFACTOR_RATIO_LOW: f64 = 0.5;
const REFACTOR_RATIO_HIGH: f64 = 1.5;

/// Key-file ranking weights: being source code and being a brand-new file
/// both outweigh raw change volume up to a point.
const SOURCE_FILE_BONUS: u64 = 50;
const ADDED_FILE_BONUS: u64 = 25;

/// Assign one category to a single file. First matching rule wins; path
/// heuristics outrank change types so a deleted test file still counts as
/// testing, not deletion.
pub fn classify_file(file: &ChangedFile) -> ChangeCategory {
    if heuristics::is_config_path(&file.path) {
        return ChangeCategory::Configuration;
    }
    if heuristics::is_test_path(&file.path) {
        return ChangeCategory::Testing;
    }
    if heuristics::is_doc_path(&file.path) {
        return ChangeCategory::Documentation;
    }
    match file.change_type {
        ChangeType::Deleted => ChangeCategory::Deletion,
        ChangeType::Added => ChangeCategory::NewFeature,
        ChangeType::Modified | ChangeType::Renamed => classify_modification(file),
    }
}

/// Rules 6 and 7: large modifications are logic changes; smaller ones with
/// a balanced add/remove ratio look like refactoring.
fn classify_modification(file: &ChangedFile) -> ChangeCategory {
    if file.magnitude() > NONTRIVIAL_CHANGE_LINES {
        return ChangeCategory::ModifiedLogic;
    }
    if file.lines_added > 0 && file.lines_removed > 0 {
        let ratio = file.lines_removed as f64 / file.lines_added as f64;
        if (REFACTOR_RATIO_LOW..=REFACTOR_RATIO_HIGH).contains(&ratio) {
            return ChangeCategory::Refactoring;
        }
    }
    ChangeCategory::ModifiedLogic
}

fn describe(category: ChangeCategory, count: usize) -> String {
    let what = match category {
        ChangeCategory::NewFeature => "newly added",
        ChangeCategory::ModifiedLogic => "with modified logic",
        ChangeCategory::Refactoring => "refactored",
        ChangeCategory::Deletion => "deleted",
        ChangeCategory::Configuration => "configuration or build",
        ChangeCategory::Documentation => "documentation",
        ChangeCategory::Testing => "test",
    };
    if count == 1 {
        format!("1 {} file", what)
    } else {
        format!("{} {} files", count, what)
    }
}

/// Partition the changed files into category groups. Every file lands in
/// exactly one group; group order follows the category enum for
/// determinism.
pub fn categorize_changes(files: &[ChangedFile]) -> Vec<CategorizedChange> {
    let mut groups: BTreeMap<ChangeCategory, Vec<String>> = BTreeMap::new();
    for file in files {
        groups
            .entry(classify_file(file))
            .or_default()
            .push(file.path.clone());
    }

    groups
        .into_iter()
        .map(|(category, files)| CategorizedChange {
            description: describe(category, files.len()),
            category,
            files,
        })
        .collect()
}

/// Rank files by importance: source-code bonus, change magnitude, and a
/// bonus for brand-new files. Returns the top paths, most important first.
pub fn rank_key_files(files: &[ChangedFile]) -> Vec<String> {
    let mut scored: Vec<(u64, &str)> = files
        .iter()
        .map(|file| {
            let mut score = file.magnitude() as u64;
            if heuristics::is_source_path(&file.path) {
                score += SOURCE_FILE_BONUS;
            }
            if file.change_type == ChangeType::Added {
                score += ADDED_FILE_BONUS;
            }
            (score, file.path.as_str())
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(KEY_FILE_LIMIT)
        .map(|(_, path)| path.to_string())
        .collect()
}

/// Complexity score 0-100: four independently capped factors (file count,
/// line volume, extension diversity, churn) summed and clamped.
pub fn complexity_score(files: &[ChangedFile], stats: &DiffStats, weights: &ScoringWeights) -> u8 {
    let cap = weights.factor_cap;

    let file_factor = (files.len() as f64 * weights.file_count_weight).min(cap);
    let line_factor = (stats.total_lines() as f64 / weights.line_volume_divisor).min(cap);

    let extensions: BTreeSet<String> = files
        .iter()
        .filter_map(|f| {
            f.path
                .rsplit('/')
                .next()
                .and_then(|name| name.rsplit_once('.'))
                .map(|(_, ext)| ext.to_ascii_lowercase())
        })
        .collect();
    let ext_factor = (extensions.len() as f64 * weights.extension_weight).min(cap);

    // Zero added lines short-circuits the ratio; churn is meaningless.
    let churn_factor = if stats.lines_added > 0 {
        (stats.lines_removed as f64 / stats.lines_added as f64 * weights.churn_weight).min(cap)
    } else {
        0.0
    };

    let total = file_factor + line_factor + ext_factor + churn_factor;
    total.round().clamp(0.0, 100.0) as u8
}

/// Best-effort intent label from branch-name prefix conventions, falling
/// back to the dominant change category. Advisory text only; nothing
/// downstream depends on it numerically.
pub fn infer_intent(branch: &str, changes: &[CategorizedChange]) -> String {
    let prefix = branch
        .split(['/', '-', '_'])
        .next()
        .unwrap_or(branch)
        .to_ascii_lowercase();

    let from_prefix = match prefix.as_str() {
        "feat" | "feature" => Some("adds a feature"),
        "fix" | "bugfix" | "hotfix" => Some("fixes a bug"),
        "refactor" | "refactoring" => Some("restructures code"),
        "docs" | "doc" => Some("updates documentation"),
        "test" | "tests" => Some("extends test coverage"),
        "chore" => Some("performs maintenance chores"),
        _ => None,
    };
    if let Some(intent) = from_prefix {
        return intent.to_string();
    }

    let dominant = changes
        .iter()
        .max_by_key(|c| c.files.len())
        .map(|c| c.category.label());
    match dominant {
        Some(label) => format!("primarily {} changes", label),
        None => "unclear intent".to_string(),
    }
}

fn build_overview(stats: &DiffStats, changes: &[CategorizedChange]) -> String {
    format!(
        "{} files changed (+{}/-{}) across {} change group{}",
        stats.files_changed,
        stats.lines_added,
        stats.lines_removed,
        changes.len(),
        if changes.len() == 1 { "" } else { "s" }
    )
}

/// Build the complete diff summary for a branch. Deterministic: the same
/// diff always yields the same groupings and scores.
pub fn summarize_diff(branch: &str, diff: &GitDiff) -> DiffSummary {
    let weights = ScoringWeights::default();
    summarize_diff_with_weights(branch, diff, &weights)
}

pub fn summarize_diff_with_weights(
    branch: &str,
    diff: &GitDiff,
    weights: &ScoringWeights,
) -> DiffSummary {
    let changes = categorize_changes(&diff.files);
    let key_files = rank_key_files(&diff.files);
    let score = complexity_score(&diff.files, &diff.stats, weights);
    let inferred_intent = infer_intent(branch, &changes);

    tracing::debug!(
        "Classified {} files into {} groups, complexity {}",
        diff.files.len(),
        changes.len(),
        score
    );

    DiffSummary {
        overview: build_overview(&diff.stats, &changes),
        inferred_intent,
        key_files,
        stats: diff.stats,
        files_changed: diff.files.iter().map(|f| f.path.clone()).collect(),
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git_module::parser::compute_stats;
    use crate::types::BranchCommit;

    fn file(path: &str, change_type: ChangeType, added: u32, removed: u32) -> ChangedFile {
        ChangedFile {
            path: path.to_string(),
            change_type,
            lines_added: added,
            lines_removed: removed,
            new_path: None,
        }
    }

    fn diff_of(files: Vec<ChangedFile>) -> GitDiff {
        let stats = compute_stats(&files);
        GitDiff {
            files,
            commits: Vec::<BranchCommit>::new(),
            stats,
        }
    }

    #[test]
    fn test_path_heuristics_outrank_change_type() {
        // A deleted test file is testing, not deletion.
        let f = file("tests/old_test.rs", ChangeType::Deleted, 0, 120);
        assert_eq!(classify_file(&f), ChangeCategory::Testing);
        // An added config file is configuration, not new-feature.
        let f = file("Cargo.toml", ChangeType::Added, 12, 0);
        assert_eq!(classify_file(&f), ChangeCategory::Configuration);
    }

    #[test]
    fn test_modification_rules() {
        // Large modification => modified logic.
        let f = file("src/app.rs", ChangeType::Modified, 80, 10);
        assert_eq!(classify_file(&f), ChangeCategory::ModifiedLogic);
        // Small balanced modification => refactoring.
        let f = file("src/app.rs", ChangeType::Modified, 12, 10);
        assert_eq!(classify_file(&f), ChangeCategory::Refactoring);
        // Small one-sided modification => modified logic.
        let f = file("src/app.rs", ChangeType::Modified, 20, 1);
        assert_eq!(classify_file(&f), ChangeCategory::ModifiedLogic);
    }

    #[test]
    fn test_partition_invariant() {
        let files = vec![
            file("src/a.rs", ChangeType::Added, 100, 0),
            file("src/b.rs", ChangeType::Modified, 60, 20),
            file("tests/c.rs", ChangeType::Modified, 30, 5),
            file("README.md", ChangeType::Modified, 10, 2),
            file("Cargo.toml", ChangeType::Modified, 2, 1),
            file("src/dead.rs", ChangeType::Deleted, 0, 200),
        ];
        let groups = categorize_changes(&files);

        let mut seen: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.files.iter().map(String::as_str))
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
        assert!(groups.iter().all(|g| !g.files.is_empty()));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let files = vec![
            file("src/a.rs", ChangeType::Added, 40, 0),
            file("src/b.rs", ChangeType::Modified, 10, 9),
            file("docs/guide.md", ChangeType::Modified, 5, 5),
        ];
        let diff = diff_of(files);
        let first = summarize_diff("feat/login", &diff);
        let second = summarize_diff("feat/login", &diff);
        assert_eq!(first.changes, second.changes);
        assert_eq!(first.key_files, second.key_files);

        let weights = ScoringWeights::default();
        assert_eq!(
            complexity_score(&diff.files, &diff.stats, &weights),
            complexity_score(&diff.files, &diff.stats, &weights)
        );
    }

    #[test]
    fn test_key_file_ranking_prefers_source_and_new_files() {
        let files = vec![
            file("README.md", ChangeType::Modified, 100, 0),
            file("src/engine.rs", ChangeType::Added, 40, 0),
            file("src/tweak.rs", ChangeType::Modified, 3, 1),
        ];
        let ranked = rank_key_files(&files);
        // 40 + 50 + 25 = 115 beats the 100-line doc (100 + 0).
        assert_eq!(ranked[0], "src/engine.rs");
        assert!(ranked.contains(&"README.md".to_string()));
    }

    #[test]
    fn test_key_file_ranking_caps_at_limit() {
        let files: Vec<ChangedFile> = (0..10)
            .map(|i| file(&format!("src/f{}.rs", i), ChangeType::Modified, 10, 0))
            .collect();
        assert_eq!(rank_key_files(&files).len(), 5);
    }

    #[test]
    fn test_complexity_score_caps_and_zero_denominator() {
        let weights = ScoringWeights::default();

        // Pure deletion: lines_added = 0 short-circuits churn to 0.
        let files = vec![file("src/dead.rs", ChangeType::Deleted, 0, 400)];
        let stats = compute_stats(&files);
        // file: 2.5, lines: 400/20 = 20, ext: 5, churn: 0 => 28 (rounded).
        assert_eq!(complexity_score(&files, &stats, &weights), 28);

        // A huge diff clamps to 100.
        let files: Vec<ChangedFile> = (0..30)
            .map(|i| file(&format!("src/f{}.ext{}", i, i), ChangeType::Modified, 200, 500))
            .collect();
        let stats = compute_stats(&files);
        assert_eq!(complexity_score(&files, &stats, &weights), 100);
    }

    #[test]
    fn test_intent_from_branch_prefix() {
        assert_eq!(infer_intent("feat/login", &[]), "adds a feature");
        assert_eq!(infer_intent("fix-null-deref", &[]), "fixes a bug");
        assert_eq!(infer_intent("refactor/session", &[]), "restructures code");
    }

    #[test]
    fn test_intent_falls_back_to_dominant_category() {
        let files = vec![
            file("docs/a.md", ChangeType::Modified, 5, 0),
            file("docs/b.md", ChangeType::Modified, 5, 0),
            file("src/c.rs", ChangeType::Modified, 80, 0),
        ];
        let changes = categorize_changes(&files);
        assert_eq!(
            infer_intent("my-branch", &changes),
            "primarily documentation changes"
        );
    }
}
