//! Parsing of the structured diff texts git produces: numstat,
//! name-status, and the oneline commit log.
//!
//! Numstat alone cannot tell an added or renamed file from a modified one,
//! so it only contributes line counts and defaults everything to
//! `Modified`. Name-status is authoritative for the change type and, for
//! renames, the destination path. The merge is keyed by path. Malformed
//! lines are skipped, never fatal.

use std::collections::HashMap;

use super::DiffInputs;
use crate::types::{BranchCommit, ChangeType, ChangedFile, DiffStats, GitDiff};

/// Rewrite numstat rename notation back to the old path so the merge key
/// lines up with the name-status `R` entry. git prints renames either as
/// `old => new` or with a shared prefix/suffix as `a/{old => new}/d`; the
/// latter collapses to `a/old/d` (an empty side drops its separator).
fn numstat_old_path(path: &str) -> String {
    if let (Some(start), Some(end)) = (path.find('{'), path.rfind('}')) {
        if start < end {
            if let Some((old, _)) = path[start + 1..end].split_once(" => ") {
                let joined = format!("{}{}{}", &path[..start], old, &path[end + 1..]);
                return joined.replace("//", "/");
            }
        }
    }
    if let Some((old, _)) = path.split_once(" => ") {
        return old.to_string();
    }
    path.to_string()
}

/// Parse `git diff --numstat` output: `added<TAB>removed<TAB>path`.
/// Binary files report `-` for both counts and contribute 0/0. Rename
/// paths are normalized to the old path.
pub fn parse_numstat(text: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, '\t');
        let (added, removed, path) = match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(r), Some(p)) if !p.is_empty() => (a, r, p),
            _ => {
                tracing::debug!("Skipping malformed numstat line: {:?}", line);
                continue;
            }
        };

        let mut file = ChangedFile::new(numstat_old_path(path), ChangeType::Modified);
        // "-" means binary: counts stay 0/0.
        file.lines_added = added.parse().unwrap_or(0);
        file.lines_removed = removed.parse().unwrap_or(0);
        files.push(file);
    }
    files
}

/// Parse `git diff --name-status` output: `STATUS<TAB>path`, or
/// `R<score><TAB>old<TAB>new` for renames. Rename records are keyed by the
/// old path. Unknown status codes default to `Modified`.
pub fn parse_name_status(text: &str) -> Vec<ChangedFile> {
    let mut files = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split('\t');
        let status = match parts.next() {
            Some(s) if !s.is_empty() => s,
            _ => continue,
        };
        let first_path = match parts.next() {
            Some(p) if !p.is_empty() => p,
            _ => {
                tracing::debug!("Skipping malformed name-status line: {:?}", line);
                continue;
            }
        };

        if status.starts_with('R') {
            let Some(new_path) = parts.next().filter(|p| !p.is_empty()) else {
                tracing::debug!("Rename entry without destination: {:?}", line);
                continue;
            };
            let mut file = ChangedFile::new(first_path, ChangeType::Renamed);
            file.new_path = Some(new_path.to_string());
            files.push(file);
            continue;
        }

        let change_type = match status.chars().next() {
            Some('A') => ChangeType::Added,
            Some('D') => ChangeType::Deleted,
            Some('M') => ChangeType::Modified,
            _ => ChangeType::Modified,
        };
        files.push(ChangedFile::new(first_path, change_type));
    }
    files
}

/// Parse `git log --oneline` output: `sha<SPACE>message`. Lines without a
/// space carry no message and are discarded.
pub fn parse_commit_log(text: &str) -> Vec<BranchCommit> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let (sha, message) = line.split_once(' ')?;
            Some(BranchCommit {
                sha: sha.to_string(),
                message: message.trim().to_string(),
            })
        })
        .collect()
}

/// Merge the two file lists by path: line counts from numstat, change type
/// (and rename destination) from name-status. Files seen by only one
/// source are still kept.
pub fn merge_file_lists(
    numstat: Vec<ChangedFile>,
    name_status: Vec<ChangedFile>,
) -> Vec<ChangedFile> {
    let mut by_path: HashMap<String, ChangedFile> = name_status
        .into_iter()
        .map(|f| (f.path.clone(), f))
        .collect();

    let mut merged = Vec::new();
    for mut file in numstat {
        if let Some(status_entry) = by_path.remove(&file.path) {
            file.change_type = status_entry.change_type;
            file.new_path = status_entry.new_path;
        }
        merged.push(file);
    }
    // Entries only name-status saw (0/0 counts).
    merged.extend(by_path.into_values());
    merged.sort_by(|a, b| a.path.cmp(&b.path));
    merged
}

/// Sum the per-file counts into aggregate stats. Pure fold.
pub fn compute_stats(files: &[ChangedFile]) -> DiffStats {
    let lines_added: u32 = files.iter().map(|f| f.lines_added).sum();
    let lines_removed: u32 = files.iter().map(|f| f.lines_removed).sum();
    DiffStats {
        files_changed: files.len(),
        lines_added,
        lines_removed,
        net_change: lines_added as i64 - lines_removed as i64,
    }
}

/// Full extraction over the collected diff texts.
pub fn parse_diff_inputs(inputs: &DiffInputs) -> GitDiff {
    let files = merge_file_lists(
        parse_numstat(&inputs.numstat),
        parse_name_status(&inputs.name_status),
    );
    let stats = compute_stats(&files);
    GitDiff {
        stats,
        commits: parse_commit_log(&inputs.commit_log),
        files,
    }
}
